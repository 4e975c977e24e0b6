//! Reactive primitives for the router's observable state.
//!
//! [`Signal<T>`] holds a value and notifies registered subscribers when it
//! changes. It is the channel through which the hosting view layer observes
//! the router's resolved path, parameters, and active view.
//!
//! Signals are single-threaded: the value is shared via `Rc<RefCell<T>>` and
//! all reads, writes, and notifications happen on the UI thread. Cloning a
//! `Signal` is cheap and every clone observes the same value.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type Subscriber<T> = Rc<dyn Fn(&T)>;

/// A reactive cell that notifies subscribers on every write.
///
/// # Example
///
/// ```
/// use waypoint::reactive::Signal;
///
/// let count = Signal::new(0);
/// assert_eq!(count.get(), 0);
///
/// count.set(42);
/// assert_eq!(count.get(), 42);
///
/// count.update(|n| *n += 1);
/// assert_eq!(count.get(), 43);
/// ```
pub struct Signal<T: 'static> {
	value: Rc<RefCell<T>>,
	subscribers: Rc<RefCell<Vec<Subscriber<T>>>>,
}

impl<T: 'static> Clone for Signal<T> {
	fn clone(&self) -> Self {
		Self {
			value: Rc::clone(&self.value),
			subscribers: Rc::clone(&self.subscribers),
		}
	}
}

impl<T: 'static> Signal<T> {
	/// Creates a new signal holding `value`.
	pub fn new(value: T) -> Self {
		Self {
			value: Rc::new(RefCell::new(value)),
			subscribers: Rc::new(RefCell::new(Vec::new())),
		}
	}

	/// Returns a clone of the current value.
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.value.borrow().clone()
	}

	/// Reads the current value through a closure, without cloning it.
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		f(&self.value.borrow())
	}

	/// Replaces the value and notifies all subscribers.
	pub fn set(&self, value: T) {
		*self.value.borrow_mut() = value;
		self.notify();
	}

	/// Mutates the value in place and notifies all subscribers once.
	pub fn update(&self, f: impl FnOnce(&mut T)) {
		f(&mut self.value.borrow_mut());
		self.notify();
	}

	/// Registers a callback invoked with the new value after every write.
	///
	/// Subscribers must not write back into the signal they observe; doing so
	/// from inside the callback would re-enter the value cell while it is
	/// borrowed for the notification.
	pub fn subscribe(&self, f: impl Fn(&T) + 'static) {
		self.subscribers.borrow_mut().push(Rc::new(f));
	}

	fn notify(&self) {
		// Snapshot the list so a subscriber may register further subscribers.
		let subscribers: Vec<Subscriber<T>> = self.subscribers.borrow().iter().cloned().collect();
		for subscriber in subscribers {
			subscriber(&self.value.borrow());
		}
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Signal")
			.field("value", &self.value.borrow())
			.field("subscribers", &self.subscribers.borrow().len())
			.finish()
	}
}

//! View registration surface.
//!
//! The router never renders anything itself; it resolves which registered
//! view should be displayed and hands that decision to the hosting view
//! layer through the [`crate::reactive::Signal`] fields. Views are opaque to
//! the router except for the two traits defined here.

use std::rc::Rc;

use crate::router::gate::Proceed;

/// A shared handle to a registered view.
///
/// The router compares handles by identity (`Rc::ptr_eq`) to decide whether
/// a navigation actually changes the displayed view.
pub type ViewHandle = Rc<dyn ViewComponent>;

/// A view that can be registered with the router.
///
/// Implementations carry whatever rendering machinery the host framework
/// uses; the router only needs a diagnostic name and the optional
/// leave-guard capability.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use waypoint::component::{ViewComponent, ViewHandle};
///
/// struct Home;
///
/// impl ViewComponent for Home {
///     fn name(&self) -> &'static str {
///         "Home"
///     }
/// }
///
/// let home: ViewHandle = Rc::new(Home);
/// assert_eq!(home.name(), "Home");
/// ```
pub trait ViewComponent {
	/// Returns the view's name for diagnostics.
	fn name(&self) -> &'static str;

	/// Capability query: returns the view's leave guard, if it has one.
	///
	/// The default is `None`, meaning the view always permits leaving.
	fn as_leavable(&self) -> Option<&dyn LeavableView> {
		None
	}
}

/// The leave-guard capability.
///
/// A view implementing this trait is consulted before the router navigates
/// away from it. The hook receives a single-shot [`Proceed`] continuation;
/// the navigation is committed if and only if `proceed` is called, which
/// may happen synchronously, or later (e.g. after a confirmation dialog),
/// or never (the navigation is then abandoned).
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use waypoint::component::{LeavableView, ViewComponent};
/// use waypoint::router::Proceed;
///
/// struct Editor {
///     dirty: Cell<bool>,
/// }
///
/// impl ViewComponent for Editor {
///     fn name(&self) -> &'static str {
///         "Editor"
///     }
///
///     fn as_leavable(&self) -> Option<&dyn LeavableView> {
///         Some(self)
///     }
/// }
///
/// impl LeavableView for Editor {
///     fn before_leave(&self, proceed: Proceed) {
///         if !self.dirty.get() {
///             proceed.proceed();
///         }
///         // A dirty editor drops `proceed` here and the navigation is
///         // abandoned; a real view would stash it behind a dialog.
///     }
/// }
/// ```
pub trait LeavableView {
	/// Invoked when the router wants to navigate away from this view.
	fn before_leave(&self, proceed: Proceed);
}

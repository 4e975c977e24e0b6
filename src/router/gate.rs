//! The navigation gate: a two-state machine guarding pending navigations.
//!
//! The gate is Idle until a navigation needs the active view's permission to
//! leave. It then holds the pending target and waits for the view to fire
//! the [`Proceed`] continuation, whether synchronously or later or never.
//! While a guard is pending, newer navigation requests *replace* the held
//! target (latest wins); nothing is queued, and a target whose `Proceed` is
//! never fired is simply abandoned.

use std::cell::{Cell, RefCell};

use crate::debug_log;

/// How a committed navigation interacts with the location backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NavigationKind {
	/// Mount-time resolution; no history write.
	Initial,
	/// Explicit or intercepted navigation; writes a history entry.
	Push,
	/// Back/forward traversal; the platform already moved, no write.
	Pop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
	Idle,
	AwaitingGuard,
}

/// A pending navigation held while a leave guard is in flight.
#[derive(Debug, Clone)]
pub(crate) struct PendingNavigation {
	pub target: String,
	pub kind: NavigationKind,
}

/// The gate itself. One per router instance.
#[derive(Debug)]
pub(crate) struct NavigationGate {
	state: Cell<GateState>,
	pending: RefCell<Option<PendingNavigation>>,
}

impl NavigationGate {
	pub fn new() -> Self {
		Self {
			state: Cell::new(GateState::Idle),
			pending: RefCell::new(None),
		}
	}

	pub fn is_awaiting(&self) -> bool {
		self.state.get() == GateState::AwaitingGuard
	}

	/// Holds `pending` as the navigation to commit when the guard releases.
	/// Any previously held target is discarded.
	pub fn hold(&self, pending: PendingNavigation) {
		debug_log!("gate: awaiting guard for '{}'", pending.target);
		self.state.set(GateState::AwaitingGuard);
		*self.pending.borrow_mut() = Some(pending);
	}

	/// Releases the gate, returning the held target. Returns `None` when the
	/// gate is already Idle (a stale continuation fired after another one
	/// already released it).
	pub fn release(&self) -> Option<PendingNavigation> {
		if self.state.get() != GateState::AwaitingGuard {
			return None;
		}
		self.state.set(GateState::Idle);
		self.pending.borrow_mut().take()
	}
}

/// The single-shot continuation handed to a leave guard.
///
/// Calling [`proceed`](Proceed::proceed) consumes the handle and commits
/// whatever navigation the gate currently holds; under the latest-wins
/// policy that may be a newer target than the one that triggered this
/// particular guard invocation. Dropping the handle without calling it
/// abandons the navigation; the router stays on the current view.
pub struct Proceed {
	commit: Box<dyn FnOnce()>,
}

impl Proceed {
	pub(crate) fn new(commit: impl FnOnce() + 'static) -> Self {
		Self {
			commit: Box::new(commit),
		}
	}

	/// Permits the pending navigation.
	pub fn proceed(self) {
		(self.commit)();
	}
}

impl std::fmt::Debug for Proceed {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Proceed").finish_non_exhaustive()
	}
}

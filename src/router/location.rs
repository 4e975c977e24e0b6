//! Location synchronization: reading the current location and committing
//! accepted navigations, over one of two interchangeable backends.
//!
//! The history backend reads the platform's path+query at startup and pushes
//! a history entry per committed navigation (skipping the write when the
//! path is unchanged). The memory backend starts from an injected path and
//! only ever mutates its own in-process entry stack, for embedding several
//! independent routers or non-browser hosts.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::platform::{self, Scroll};

use super::error::RouterError;

/// A navigation target split into its components.
///
/// Resolution sees only `path`; the reactive path signal reports
/// `path` + `query`; the anchor step consumes `fragment`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Target {
	pub path: String,
	/// Query string including the leading `?`, or empty.
	pub query: String,
	/// Fragment without the leading `#`; `Some("")` for a bare `#`.
	pub fragment: Option<String>,
}

impl Target {
	/// Splits a raw target string (`/path?query#fragment`) into components.
	pub fn split(raw: &str) -> Self {
		let (rest, fragment) = match raw.split_once('#') {
			Some((rest, fragment)) => (rest, Some(fragment.to_string())),
			None => (raw, None),
		};
		let (path, query) = match rest.split_once('?') {
			Some((path, query)) => (path.to_string(), format!("?{}", query)),
			None => (rest.to_string(), String::new()),
		};
		Self {
			path,
			query,
			fragment,
		}
	}

	/// The string reported through the reactive path signal and committed to
	/// the location backend: path with the query string appended.
	pub fn display(&self) -> String {
		format!("{}{}", self.path, self.query)
	}

	/// Re-joins all three components into a raw target string.
	pub fn rejoin(&self) -> String {
		match &self.fragment {
			Some(fragment) => format!("{}{}#{}", self.path, self.query, fragment),
			None => self.display(),
		}
	}

	/// Classifies the fragment into a scroll request: `#` scrolls to the
	/// top, `#name` scrolls the element with that id into view, no fragment
	/// means no scroll.
	pub fn anchor(&self) -> Option<Scroll> {
		match self.fragment.as_deref() {
			None => None,
			Some("") => Some(Scroll::Top),
			Some(name) => Some(Scroll::Element(name.to_string())),
		}
	}
}

/// The state payload attached to each history entry, so back/forward can
/// restore the parameter map without re-matching ambiguity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct HistoryState {
	pub path: String,
	pub params: HashMap<String, String>,
}

#[derive(Debug)]
enum Backend {
	History {
		/// Last path committed, to suppress duplicate history writes.
		last_committed: RefCell<String>,
	},
	Memory {
		entries: RefCell<Vec<String>>,
	},
}

/// The location synchronization layer. One per router instance.
#[derive(Debug)]
pub(crate) struct LocationSync {
	backend: Backend,
}

impl LocationSync {
	/// Creates the backend selected by `memory_mode`.
	///
	/// `initial_path` seeds the memory backend (defaulting to `/`) and, when
	/// given, overrides the platform read in history mode as well.
	pub fn new(memory_mode: bool, initial_path: Option<String>) -> Self {
		if memory_mode {
			let initial = initial_path.unwrap_or_else(|| "/".to_string());
			Self {
				backend: Backend::Memory {
					entries: RefCell::new(vec![initial]),
				},
			}
		} else {
			let initial = initial_path.unwrap_or_else(|| {
				format!("{}{}", platform::current_path(), platform::current_search())
			});
			Self {
				backend: Backend::History {
					last_committed: RefCell::new(initial),
				},
			}
		}
	}

	pub fn is_memory(&self) -> bool {
		matches!(self.backend, Backend::Memory { .. })
	}

	/// The target the router should resolve at mount time.
	pub fn initial_target(&self) -> String {
		match &self.backend {
			Backend::History { last_committed } => last_committed.borrow().clone(),
			Backend::Memory { entries } => entries
				.borrow()
				.last()
				.cloned()
				.unwrap_or_else(|| "/".to_string()),
		}
	}

	/// Commits an accepted navigation.
	///
	/// With `write` set, the history backend pushes one entry per changed
	/// path (an unchanged path is not re-pushed) and the memory backend
	/// appends to its stack. Without it (mount-time resolution and
	/// back/forward traversals) only the backend's notion of "current"
	/// is updated.
	pub fn commit(
		&self,
		target: &Target,
		state: &HistoryState,
		write: bool,
	) -> Result<(), RouterError> {
		let display = target.display();
		match &self.backend {
			Backend::History { last_committed } => {
				let changed = *last_committed.borrow() != display;
				if write && changed {
					let payload = serde_json::to_string(state)
						.map_err(|e| RouterError::NavigationFailed(e.to_string()))?;
					platform::push_state(&display, &payload)
						.map_err(RouterError::NavigationFailed)?;
				}
				*last_committed.borrow_mut() = display;
			}
			Backend::Memory { entries } => {
				let mut entries = entries.borrow_mut();
				if write {
					entries.push(display);
				} else {
					entries.pop();
					entries.push(display);
				}
			}
		}
		Ok(())
	}

	/// The memory backend's entry stack, newest last. Empty in history mode.
	#[cfg(test)]
	pub fn entries(&self) -> Vec<String> {
		match &self.backend {
			Backend::History { .. } => Vec::new(),
			Backend::Memory { entries } => entries.borrow().clone(),
		}
	}
}

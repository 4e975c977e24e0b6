//! Error types for router operations.
//!
//! Expected conditions (an unresolvable path, a blocked navigation) are
//! not errors: the router logs and carries on. `RouterError` covers only
//! caller contract violations and platform write failures.

use thiserror::Error;

/// Error type for router operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
	/// The navigation target does not start with `/`.
	#[error("invalid navigation target '{0}': paths must begin with '/'")]
	InvalidTarget(String),
	/// The platform history write failed.
	#[error("navigation failed: {0}")]
	NavigationFailed(String),
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	fn test_error_display() {
		assert_eq!(
			RouterError::InvalidTarget("about".to_string()).to_string(),
			"invalid navigation target 'about': paths must begin with '/'"
		);
		assert_eq!(
			RouterError::NavigationFailed("boom".to_string()).to_string(),
			"navigation failed: boom"
		);
	}
}

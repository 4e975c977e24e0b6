//! Path pattern compilation and matching.
//!
//! A pattern is a `/`-delimited template. Literal segments match byte-exact;
//! segments prefixed with `:` are named parameters capturing zero or more
//! non-`/` characters. Parameters are optional-by-default: `/user/:id`
//! matches `/user`, `/user/` and `/user/42`, binding `id` to `""`, `""` and
//! `"42"` respectively. Everything else about matching is strict: anchored,
//! case-sensitive, no trailing-slash normalization, and a pattern with `N`
//! segments never matches a path with more than `N` segments.

use std::collections::HashMap;

use regex::RegexBuilder;

use crate::warn_log;

/// Maximum allowed length for a pattern string in bytes.
const MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed number of path segments in a pattern.
const MAX_PATH_SEGMENTS: usize = 32;

/// Maximum allowed size for a compiled pattern regex (in bytes).
const MAX_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// A compiled path pattern.
///
/// Compilation never fails: a pattern that cannot be compiled (over the size
/// limits, or producing an invalid regex) simply never matches anything. A
/// warning is logged when that happens, since there is no registration-time
/// validation pass to reject it.
#[derive(Debug, Clone)]
pub struct PathPattern {
	/// The original pattern string.
	pattern: String,
	/// Compiled matcher; `None` means the pattern is malformed and matches
	/// nothing.
	regex: Option<regex::Regex>,
	/// Parameter names in the order they appear in the pattern.
	param_names: Vec<String>,
	/// Whether the pattern declares no parameters.
	is_exact: bool,
}

impl PathPattern {
	/// Compiles a pattern string.
	pub fn compile(pattern: &str) -> Self {
		let (regex_str, param_names) = Self::build_regex(pattern);

		let regex = if pattern.len() > MAX_PATTERN_LENGTH {
			warn_log!(
				"route pattern ignored: length {} exceeds {} bytes",
				pattern.len(),
				MAX_PATTERN_LENGTH
			);
			None
		} else if pattern.split('/').count() > MAX_PATH_SEGMENTS {
			warn_log!(
				"route pattern '{}' ignored: more than {} segments",
				pattern,
				MAX_PATH_SEGMENTS
			);
			None
		} else {
			match RegexBuilder::new(&regex_str)
				.size_limit(MAX_REGEX_SIZE)
				.build()
			{
				Ok(re) => Some(re),
				Err(e) => {
					warn_log!("route pattern '{}' failed to compile: {}", pattern, e);
					None
				}
			}
		};

		let is_exact = param_names.is_empty();
		Self {
			pattern: pattern.to_string(),
			regex,
			param_names,
			is_exact,
		}
	}

	/// Translates the pattern into an anchored regex with one positional
	/// capture group per parameter.
	///
	/// A parameter in final position compiles to `(?:/([^/]*))?` so that a
	/// path supplying one fewer trailing segment still matches, binding the
	/// parameter to the empty string. Parameters elsewhere require their
	/// segment to be present (though possibly empty). An empty trailing
	/// pattern segment is a literal, so `/users/` only matches `/users/`.
	fn build_regex(pattern: &str) -> (String, Vec<String>) {
		let segments: Vec<&str> = pattern.split('/').collect();
		let mut out = String::from("^");
		let mut names = Vec::new();

		for (i, segment) in segments.iter().enumerate() {
			if i == 0 {
				// Text before the first '/' (empty for well-formed patterns).
				out.push_str(&regex::escape(segment));
				continue;
			}
			match segment.strip_prefix(':') {
				Some(name) => {
					names.push(name.to_string());
					if i == segments.len() - 1 {
						out.push_str("(?:/([^/]*))?");
					} else {
						out.push_str("/([^/]*)");
					}
				}
				None => {
					out.push('/');
					out.push_str(&regex::escape(segment));
				}
			}
		}

		out.push('$');
		(out, names)
	}

	/// Returns the original pattern string.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Returns the parameter names in declaration order.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Returns whether the pattern declares no parameters.
	pub fn is_exact(&self) -> bool {
		self.is_exact
	}

	/// Attempts to match a path against this pattern.
	///
	/// On success returns the extracted parameters; values are the raw
	/// (undecoded) captured text, possibly empty. A malformed pattern
	/// returns `None` for every path.
	pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
		let regex = self.regex.as_ref()?;
		let caps = regex.captures(path)?;

		Some(
			self.param_names
				.iter()
				.enumerate()
				.map(|(i, name)| {
					let value = caps.get(i + 1).map(|m| m.as_str()).unwrap_or("");
					(name.clone(), value.to_string())
				})
				.collect(),
		)
	}
}

impl PartialEq for PathPattern {
	fn eq(&self, other: &Self) -> bool {
		self.pattern == other.pattern
	}
}

impl Eq for PathPattern {}

impl std::fmt::Display for PathPattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.pattern)
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[test]
	fn test_exact_pattern() {
		let pattern = PathPattern::compile("/about");
		assert!(pattern.is_exact());
		assert!(pattern.matches("/about").is_some());
		assert!(pattern.matches("/about/").is_none());
		assert!(pattern.matches("/abouts").is_none());
	}

	#[test]
	fn test_trailing_slash_is_literal() {
		let pattern = PathPattern::compile("/users/");
		assert!(pattern.is_exact());
		assert!(pattern.matches("/users/").is_some());
		assert!(pattern.matches("/users").is_none());
	}

	#[rstest]
	#[case("/user", "")]
	#[case("/user/", "")]
	#[case("/user/42", "42")]
	fn test_trailing_param_is_optional(#[case] path: &str, #[case] expected: &str) {
		let pattern = PathPattern::compile("/user/:id");
		let params = pattern.matches(path).unwrap();
		assert_eq!(params.get("id"), Some(&expected.to_string()));
	}

	#[test]
	fn test_extra_segments_do_not_match() {
		let pattern = PathPattern::compile("/user/:id");
		assert!(pattern.matches("/user/1/profile").is_none());
	}

	#[test]
	fn test_segment_count_mismatch() {
		let pattern = PathPattern::compile("/a/:x/b/:y");
		assert!(pattern.matches("/a/1/b/2/extra").is_none());
		// Only the *trailing* parameter may be omitted.
		assert!(pattern.matches("/a").is_none());
		assert!(pattern.matches("/a/1").is_none());
	}

	#[test]
	fn test_one_missing_trailing_segment() {
		let pattern = PathPattern::compile("/blog/:category/:post");
		let params = pattern.matches("/blog/tech").unwrap();
		assert_eq!(params.get("category"), Some(&"tech".to_string()));
		assert_eq!(params.get("post"), Some(&"".to_string()));
	}

	#[test]
	fn test_missing_literal_tail_does_not_match() {
		let pattern = PathPattern::compile("/user/:id/posts");
		assert!(pattern.matches("/user/1").is_none());
		assert!(pattern.matches("/user/1/posts").is_some());
	}

	#[test]
	fn test_root_param() {
		let pattern = PathPattern::compile("/:id");
		assert_eq!(
			pattern.matches("/").unwrap().get("id"),
			Some(&"".to_string())
		);
		assert_eq!(
			pattern.matches("/anything").unwrap().get("id"),
			Some(&"anything".to_string())
		);
		assert!(pattern.matches("/a/b").is_none());
	}

	#[rstest]
	#[case("/user/test%20user", "test%20user")]
	#[case("/user/test-user", "test-user")]
	#[case("/user/test_user", "test_user")]
	#[case("/user/test.user", "test.user")]
	#[case("/user/test@user", "test@user")]
	fn test_param_values_are_raw(#[case] path: &str, #[case] expected: &str) {
		let pattern = PathPattern::compile("/user/:id");
		let params = pattern.matches(path).unwrap();
		assert_eq!(params.get("id"), Some(&expected.to_string()));
	}

	#[test]
	fn test_multiple_params() {
		let pattern = PathPattern::compile("/users/:user_id/posts/:post_id");
		let params = pattern.matches("/users/42/posts/123").unwrap();
		assert_eq!(params.get("user_id"), Some(&"42".to_string()));
		assert_eq!(params.get("post_id"), Some(&"123".to_string()));
		assert_eq!(pattern.param_names(), &["user_id", "post_id"]);
	}

	#[test]
	fn test_literal_special_chars_escaped() {
		let pattern = PathPattern::compile("/api/v1.0");
		assert!(pattern.matches("/api/v1.0").is_some());
		assert!(pattern.matches("/api/v1X0").is_none());
	}

	#[test]
	fn test_matching_is_case_sensitive() {
		let pattern = PathPattern::compile("/About");
		assert!(pattern.matches("/About").is_some());
		assert!(pattern.matches("/about").is_none());
	}

	#[test]
	fn test_overlong_pattern_never_matches() {
		let long = format!("/{}", "a".repeat(1025));
		let pattern = PathPattern::compile(&long);
		assert!(pattern.matches(&long).is_none());
	}

	#[test]
	fn test_excessive_segments_never_match() {
		let deep = format!("/{}", vec!["seg"; 40].join("/"));
		let pattern = PathPattern::compile(&deep);
		assert!(pattern.matches(&deep).is_none());
	}

	#[test]
	fn test_pattern_display_and_eq() {
		let p1 = PathPattern::compile("/user/:id");
		let p2 = PathPattern::compile("/user/:id");
		let p3 = PathPattern::compile("/user/:uid");
		assert_eq!(format!("{}", p1), "/user/:id");
		assert_eq!(p1, p2);
		assert_ne!(p1, p3);
	}
}

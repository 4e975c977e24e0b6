//! Route table: declaration list, compilation, and two-pass resolution.

use std::collections::HashMap;

use crate::component::ViewHandle;

use super::pattern::PathPattern;

/// A single route declaration: a path pattern and the view it displays.
#[derive(Clone)]
pub struct RouteDefinition {
	/// The `/`-delimited pattern; `:name` segments are parameters.
	pub pattern: String,
	/// The view displayed when the pattern matches.
	pub view: ViewHandle,
}

impl RouteDefinition {
	/// Creates a route declaration.
	pub fn new(pattern: impl Into<String>, view: ViewHandle) -> Self {
		Self {
			pattern: pattern.into(),
			view,
		}
	}
}

impl std::fmt::Debug for RouteDefinition {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteDefinition")
			.field("pattern", &self.pattern)
			.field("view", &self.view.name())
			.finish()
	}
}

/// A compiled route: the declaration plus its matcher.
#[derive(Debug, Clone)]
pub(crate) struct CompiledRoute {
	pub def: RouteDefinition,
	pub pattern: PathPattern,
}

/// The outcome of a successful resolution.
#[derive(Clone)]
pub(crate) struct ResolvedRoute {
	pub view: ViewHandle,
	pub params: HashMap<String, String>,
}

/// An ordered, compiled snapshot of the declared routes.
///
/// The table is immutable for the lifetime of one mount; replacing the
/// route list builds a fresh table (recompiling every matcher). Resolution
/// is a pure function of the table and the path.
#[derive(Debug, Default)]
pub(crate) struct RouteTable {
	routes: Vec<CompiledRoute>,
}

impl RouteTable {
	/// Compiles a declaration list into a table.
	pub fn compile(defs: Vec<RouteDefinition>) -> Self {
		let routes = defs
			.into_iter()
			.map(|def| {
				let pattern = PathPattern::compile(&def.pattern);
				CompiledRoute { def, pattern }
			})
			.collect();
		Self { routes }
	}

	pub fn len(&self) -> usize {
		self.routes.len()
	}

	/// Resolves a path in two passes.
	///
	/// Pass 1 tries only exact (parameterless) routes, in declaration order;
	/// pass 2 tries the parameterized routes, in declaration order. Exact
	/// routes therefore can never be shadowed by an earlier catch-all, while
	/// overlapping parameterized patterns tie-break on declaration order.
	pub fn resolve(&self, path: &str) -> Option<ResolvedRoute> {
		for route in self.routes.iter().filter(|r| r.pattern.is_exact()) {
			if route.pattern.matches(path).is_some() {
				return Some(ResolvedRoute {
					view: route.def.view.clone(),
					params: HashMap::new(),
				});
			}
		}

		for route in self.routes.iter().filter(|r| !r.pattern.is_exact()) {
			if let Some(params) = route.pattern.matches(path) {
				return Some(ResolvedRoute {
					view: route.def.view.clone(),
					params,
				});
			}
		}

		None
	}

	/// The designated fallback: the first declared route, with each of its
	/// declared parameters bound to the empty string so that the parameter
	/// map still mirrors the pattern that produced the active view.
	pub fn fallback(&self) -> Option<ResolvedRoute> {
		self.routes.first().map(|route| ResolvedRoute {
			view: route.def.view.clone(),
			params: route
				.pattern
				.param_names()
				.iter()
				.map(|name| (name.clone(), String::new()))
				.collect(),
		})
	}

	/// The pattern string of the first declared route, for diagnostics.
	pub fn first_pattern(&self) -> Option<&str> {
		self.routes.first().map(|r| r.def.pattern.as_str())
	}
}

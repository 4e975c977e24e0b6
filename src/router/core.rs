//! The router controller.
//!
//! This module provides the main [`Router`] struct: it receives navigation
//! requests (explicit [`push`](Router::push) calls, intercepted platform
//! navigations, back/forward traversals), consults the active view's leave
//! guard through the navigation gate, resolves the target against the route
//! table, publishes the outcome through reactive signals, commits it to the
//! location backend, and schedules anchor scrolling.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::component::ViewHandle;
use crate::platform;
use crate::reactive::Signal;
use crate::{debug_log, error_log, info_log, warn_log};

use super::error::RouterError;
use super::gate::{NavigationGate, NavigationKind, PendingNavigation, Proceed};
use super::location::{HistoryState, LocationSync, Target};
use super::table::{ResolvedRoute, RouteDefinition, RouteTable};

/// Per-instance router configuration.
///
/// Everything the router needs is passed here explicitly; there are no
/// process-wide defaults, so multiple routers can coexist without
/// interfering.
#[derive(Debug, Default)]
pub struct RouterConfig {
	routes: Vec<RouteDefinition>,
	redirects: HashMap<String, String>,
	memory_mode: bool,
	initial_path: Option<String>,
	default_route: Option<String>,
}

impl RouterConfig {
	/// Creates an empty configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a route. Declaration order matters: it is the tie-break
	/// among overlapping parameterized patterns, and the first declared
	/// route doubles as the fallback for unresolvable paths.
	pub fn route(mut self, pattern: impl Into<String>, view: ViewHandle) -> Self {
		self.routes.push(RouteDefinition::new(pattern, view));
		self
	}

	/// Appends a batch of route declarations.
	pub fn routes(mut self, defs: impl IntoIterator<Item = RouteDefinition>) -> Self {
		self.routes.extend(defs);
		self
	}

	/// Declares a redirect from an exact source path to a destination path.
	///
	/// Sources are matched by exact string comparison only, with no
	/// parameter substitution. Callers must not declare redirect cycles;
	/// the router performs no cycle detection.
	pub fn redirect(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
		self.redirects.insert(from.into(), to.into());
		self
	}

	/// Selects the memory-backed location backend: the router starts from
	/// [`initial_path`](Self::initial_path) (default `/`) and never touches
	/// platform history.
	pub fn memory_mode(mut self, memory_mode: bool) -> Self {
		self.memory_mode = memory_mode;
		self
	}

	/// Overrides the startup location read. Seeds the memory backend; in
	/// history mode it substitutes for the platform location (useful for
	/// tests and embedding).
	pub fn initial_path(mut self, path: impl Into<String>) -> Self {
		self.initial_path = Some(path.into());
		self
	}

	/// Overrides the target resolved at mount time, regardless of what the
	/// location backend reports.
	pub fn default_route(mut self, path: impl Into<String>) -> Self {
		self.default_route = Some(path.into());
		self
	}
}

struct RouterInner {
	table: RefCell<RouteTable>,
	redirects: HashMap<String, String>,
	gate: NavigationGate,
	location: LocationSync,
	current_path: Signal<String>,
	current_params: Signal<HashMap<String, String>>,
	active_view: Signal<Option<ViewHandle>>,
}

/// The router instance.
///
/// Cloning is cheap and every clone drives the same instance, which is how
/// the router moves into event callbacks and guard continuations.
///
/// Path reporting policy: after following a redirect, the reactive path
/// reports the **destination** path (the one whose view is displayed), not
/// the path that triggered the redirect.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use waypoint::component::{ViewComponent, ViewHandle};
/// use waypoint::router::{Router, RouterConfig};
///
/// struct Home;
/// impl ViewComponent for Home {
///     fn name(&self) -> &'static str {
///         "Home"
///     }
/// }
///
/// struct User;
/// impl ViewComponent for User {
///     fn name(&self) -> &'static str {
///         "User"
///     }
/// }
///
/// let router = Router::new(
///     RouterConfig::new()
///         .memory_mode(true)
///         .route("/", Rc::new(Home) as ViewHandle)
///         .route("/user/:id", Rc::new(User) as ViewHandle),
/// );
///
/// router.push("/user/42").unwrap();
/// assert_eq!(router.current_path().get(), "/user/42");
/// assert_eq!(
///     router.current_params().with(|p| p.get("id").cloned()),
///     Some("42".to_string())
/// );
/// ```
#[derive(Clone)]
pub struct Router {
	inner: Rc<RouterInner>,
}

impl std::fmt::Debug for Router {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Router")
			.field("routes", &self.inner.table.borrow().len())
			.field("memory_mode", &self.inner.location.is_memory())
			.field("awaiting_guard", &self.inner.gate.is_awaiting())
			.finish()
	}
}

impl Router {
	/// Mounts a router: compiles the route table, reads (or takes) the
	/// initial location, and resolves it immediately. The initial
	/// resolution never writes a history entry.
	pub fn new(config: RouterConfig) -> Self {
		let location = LocationSync::new(config.memory_mode, config.initial_path);
		let start = config
			.default_route
			.unwrap_or_else(|| location.initial_target());

		let router = Self {
			inner: Rc::new(RouterInner {
				table: RefCell::new(RouteTable::compile(config.routes)),
				redirects: config.redirects,
				gate: NavigationGate::new(),
				location,
				current_path: Signal::new(String::new()),
				current_params: Signal::new(HashMap::new()),
				active_view: Signal::new(None),
			}),
		};

		if let Err(e) = router.request(&start, NavigationKind::Initial) {
			error_log!("initial navigation to '{}' failed: {}", start, e);
		}
		router
	}

	/// Programmatic navigation. `path` must begin with `/` and may carry a
	/// query string and a fragment (`/search?q=x#results`).
	///
	/// Expected conditions are not errors: an unresolvable path falls back
	/// to the first declared route (with a logged warning), and a
	/// navigation blocked by a leave guard returns `Ok` while the guard
	/// decides.
	pub fn push(&self, path: &str) -> Result<(), RouterError> {
		if !path.starts_with('/') {
			return Err(RouterError::InvalidTarget(path.to_string()));
		}
		self.request(path, NavigationKind::Push)
	}

	/// The resolved path signal (query string appended, fragment dropped).
	pub fn current_path(&self) -> &Signal<String> {
		&self.inner.current_path
	}

	/// The extracted parameter map signal. Values are raw, undecoded
	/// strings, possibly empty.
	pub fn current_params(&self) -> &Signal<HashMap<String, String>> {
		&self.inner.current_params
	}

	/// The active view signal. `None` only before the first successful
	/// resolution (i.e. when no routes are registered).
	pub fn active_view(&self) -> &Signal<Option<ViewHandle>> {
		&self.inner.active_view
	}

	/// Returns the number of registered routes.
	pub fn route_count(&self) -> usize {
		self.inner.table.borrow().len()
	}

	/// Whether a navigation is currently held behind a leave guard.
	pub fn is_navigation_pending(&self) -> bool {
		self.inner.gate.is_awaiting()
	}

	/// Returns the installation surface for host wiring.
	pub fn handle(&self) -> RouterHandle {
		RouterHandle {
			router: self.clone(),
		}
	}

	/// Replaces the route list: recompiles every matcher and re-resolves
	/// the current path against the new table (without a history write).
	pub fn replace_routes(&self, routes: Vec<RouteDefinition>) {
		*self.inner.table.borrow_mut() = RouteTable::compile(routes);
		info_log!(
			"route table replaced ({} routes)",
			self.inner.table.borrow().len()
		);

		let current = self.inner.current_path.get();
		let target = if current.is_empty() {
			self.inner.location.initial_target()
		} else {
			current
		};
		if let Err(e) = self.request(&target, NavigationKind::Pop) {
			error_log!("re-resolution of '{}' failed: {}", target, e);
		}
	}

	/// The synchronous interception decision: should a platform navigation
	/// to `url` be taken over by this router?
	///
	/// Returns the in-app target to push when the destination is
	/// same-origin and resolves to a registered route (exact or
	/// parameterized; redirects are applied first, the fallback does not
	/// count). Cross-origin and unresolvable destinations return `None`
	/// and are left to the platform's default behavior.
	pub fn should_intercept(&self, url: &str) -> Option<String> {
		let raw = if url.starts_with('/') && !url.starts_with("//") {
			url.to_string()
		} else {
			let origin = platform::origin();
			if origin.is_empty() {
				return None;
			}
			let rest = url.strip_prefix(&origin)?;
			if rest.is_empty() {
				"/".to_string()
			} else if rest.starts_with('/') {
				rest.to_string()
			} else {
				return None;
			}
		};

		let mut target = Target::split(&raw);
		self.apply_redirect(&mut target);

		if self.inner.table.borrow().resolve(&target.path).is_some() {
			debug_log!("intercepting navigation to '{}'", target.rejoin());
			Some(target.rejoin())
		} else {
			debug_log!("declining to intercept '{}'", url);
			None
		}
	}

	/// Subscribes to the platform's back/forward notifications and, where
	/// available, its navigation interception hook, so that same-origin
	/// link clicks and programmatic navigations route through this
	/// instance. The listeners live for the lifetime of the page.
	#[cfg(target_arch = "wasm32")]
	pub fn listen(&self) {
		let router = self.clone();
		if let Err(e) = platform::setup_popstate_listener(move |target| {
			if let Err(err) = router.request(&target, NavigationKind::Pop) {
				error_log!("back/forward navigation to '{}' failed: {}", target, err);
			}
		}) {
			warn_log!("popstate listener unavailable: {}", e);
		}

		let router = self.clone();
		if let Err(e) = platform::setup_navigate_listener(move |url| {
			match router.should_intercept(&url) {
				Some(target) => {
					if let Err(err) = router.push(&target) {
						error_log!("intercepted navigation to '{}' failed: {}", target, err);
					}
					true
				}
				None => false,
			}
		}) {
			info_log!("navigation interception unavailable: {}", e);
		}
	}

	/// Non-WASM version of [`listen`](Self::listen): there is no platform
	/// to subscribe to, so this is a no-op.
	#[cfg(not(target_arch = "wasm32"))]
	pub fn listen(&self) {}

	/// Rewrites `target` through the redirect map (exact source path match
	/// only). A destination's own query/fragment, when present, wins over
	/// the request's.
	fn apply_redirect(&self, target: &mut Target) {
		if let Some(dest) = self.inner.redirects.get(&target.path) {
			debug_log!("redirecting '{}' to '{}'", target.path, dest);
			let dest = Target::split(dest);
			target.path = dest.path;
			if !dest.query.is_empty() {
				target.query = dest.query;
			}
			if dest.fragment.is_some() {
				target.fragment = dest.fragment;
			}
		}
	}

	/// The navigation pipeline entry point: redirect, guard check, commit.
	fn request(&self, raw: &str, kind: NavigationKind) -> Result<(), RouterError> {
		let mut target = Target::split(raw);
		self.apply_redirect(&mut target);

		// What would be displayed, for comparison against the active view.
		let target_view = {
			let table = self.inner.table.borrow();
			table
				.resolve(&target.path)
				.or_else(|| table.fallback())
				.map(|r| r.view)
		};

		let active = self.inner.active_view.get();
		let needs_guard = match (&active, &target_view) {
			(Some(active), Some(next)) => {
				!Rc::ptr_eq(active, next) && active.as_leavable().is_some()
			}
			_ => false,
		};

		if !needs_guard {
			return self.commit(&target, kind);
		}

		self.inner.gate.hold(PendingNavigation {
			target: target.rejoin(),
			kind,
		});

		let router = self.clone();
		let proceed = Proceed::new(move || {
			if let Some(pending) = router.inner.gate.release() {
				let target = Target::split(&pending.target);
				if let Err(e) = router.commit(&target, pending.kind) {
					error_log!("deferred navigation to '{}' failed: {}", pending.target, e);
				}
			}
		});

		// `needs_guard` established both the active view and its hook.
		if let Some(view) = active {
			if let Some(hook) = view.as_leavable() {
				hook.before_leave(proceed);
			}
		}
		Ok(())
	}

	/// Resolves and applies a permitted navigation: route table (with
	/// first-route fallback), location backend, reactive signals, anchor
	/// step.
	fn commit(&self, target: &Target, kind: NavigationKind) -> Result<(), RouterError> {
		let resolution: Option<ResolvedRoute> = {
			let table = self.inner.table.borrow();
			match table.resolve(&target.path) {
				Some(resolved) => Some(resolved),
				None => {
					let fallback = table.fallback();
					if fallback.is_some() {
						warn_log!(
							"no route matches '{}'; falling back to the first declared route '{}'",
							target.path,
							table.first_pattern().unwrap_or("?")
						);
					} else {
						warn_log!("no routes registered; navigation to '{}' ignored", target.path);
					}
					fallback
				}
			}
		};
		let Some(resolution) = resolution else {
			return Ok(());
		};

		let state = HistoryState {
			path: target.display(),
			params: resolution.params.clone(),
		};
		self.inner
			.location
			.commit(target, &state, kind == NavigationKind::Push)?;

		self.inner.current_path.set(target.display());
		self.inner.current_params.set(resolution.params);
		self.inner.active_view.set(Some(resolution.view));

		if let Some(scroll) = target.anchor() {
			platform::schedule_after_render(move || platform::perform_scroll(&scroll));
		}
		Ok(())
	}
}

/// The installation surface handed to host frameworks.
///
/// Exposes the navigation triple ([`push`](RouterHandle::push), the
/// current route, the current parameters) plus the active view, under the
/// accessor names hosts conventionally wire up (e.g. as a `$router`-style
/// global property).
#[derive(Clone)]
pub struct RouterHandle {
	router: Router,
}

impl RouterHandle {
	/// Programmatic navigation; see [`Router::push`].
	pub fn push(&self, path: &str) -> Result<(), RouterError> {
		self.router.push(path)
	}

	/// The current resolved path (query string appended).
	pub fn route(&self) -> String {
		self.router.inner.current_path.get()
	}

	/// The current parameter map.
	pub fn params(&self) -> HashMap<String, String> {
		self.router.inner.current_params.get()
	}

	/// The currently active view, if any.
	pub fn component(&self) -> Option<ViewHandle> {
		self.router.inner.active_view.get()
	}
}

impl std::fmt::Debug for RouterHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouterHandle")
			.field("route", &self.route())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use crate::component::ViewComponent;

	use super::*;

	struct TestView(&'static str);

	impl ViewComponent for TestView {
		fn name(&self) -> &'static str {
			self.0
		}
	}

	fn view(name: &'static str) -> ViewHandle {
		Rc::new(TestView(name))
	}

	fn memory_router() -> Router {
		Router::new(
			RouterConfig::new()
				.memory_mode(true)
				.route("/", view("Home"))
				.route("/about", view("About"))
				.route("/user/:id", view("User")),
		)
	}

	#[test]
	fn test_mount_resolves_initial_path() {
		let router = memory_router();
		assert_eq!(router.current_path().get(), "/");
		assert_eq!(
			router.active_view().with(|v| v.as_ref().unwrap().name()),
			"Home"
		);
	}

	#[test]
	fn test_push_requires_leading_slash() {
		let router = memory_router();
		let result = router.push("about");
		assert!(matches!(result, Err(RouterError::InvalidTarget(_))));
		// State untouched.
		assert_eq!(router.current_path().get(), "/");
	}

	#[test]
	fn test_push_updates_signals() {
		let router = memory_router();
		router.push("/user/42").unwrap();

		assert_eq!(router.current_path().get(), "/user/42");
		assert_eq!(
			router.current_params().with(|p| p.get("id").cloned()),
			Some("42".to_string())
		);
		assert_eq!(
			router.active_view().with(|v| v.as_ref().unwrap().name()),
			"User"
		);
	}

	#[test]
	fn test_default_route_overrides_start() {
		let router = Router::new(
			RouterConfig::new()
				.memory_mode(true)
				.default_route("/about")
				.route("/", view("Home"))
				.route("/about", view("About")),
		);
		assert_eq!(
			router.active_view().with(|v| v.as_ref().unwrap().name()),
			"About"
		);
	}

	#[test]
	fn test_redirect_reports_destination_path() {
		let router = Router::new(
			RouterConfig::new()
				.memory_mode(true)
				.redirect("/about-us", "/about")
				.route("/", view("Home"))
				.route("/about", view("About")),
		);

		router.push("/about-us").unwrap();
		assert_eq!(router.current_path().get(), "/about");
		assert_eq!(
			router.active_view().with(|v| v.as_ref().unwrap().name()),
			"About"
		);
	}

	#[test]
	fn test_unresolvable_path_falls_back_to_first_route() {
		let router = memory_router();
		router.push("/does-not-exist").unwrap();

		assert_eq!(
			router.active_view().with(|v| v.as_ref().unwrap().name()),
			"Home"
		);
		assert_eq!(router.current_path().get(), "/does-not-exist");
	}

	#[test]
	fn test_route_count_and_replace_routes() {
		let router = memory_router();
		assert_eq!(router.route_count(), 3);

		router.replace_routes(vec![RouteDefinition::new("/", view("OnlyHome"))]);
		assert_eq!(router.route_count(), 1);
		// The current path re-resolved against the new table.
		assert_eq!(
			router.active_view().with(|v| v.as_ref().unwrap().name()),
			"OnlyHome"
		);
	}

	#[test]
	fn test_handle_exposes_navigation_triple() {
		let router = memory_router();
		let handle = router.handle();

		handle.push("/user/7").unwrap();
		assert_eq!(handle.route(), "/user/7");
		assert_eq!(handle.params().get("id"), Some(&"7".to_string()));
		assert_eq!(handle.component().unwrap().name(), "User");
	}

	#[test]
	fn test_query_string_is_kept_in_path() {
		let router = memory_router();
		router.push("/user/42?tab=posts").unwrap();

		assert_eq!(router.current_path().get(), "/user/42?tab=posts");
		assert_eq!(
			router.current_params().with(|p| p.get("id").cloned()),
			Some("42".to_string())
		);
	}

	#[test]
	fn test_empty_route_table_ignores_navigation() {
		let router = Router::new(RouterConfig::new().memory_mode(true));
		router.push("/anywhere").unwrap();
		assert!(router.active_view().with(|v| v.is_none()));
	}
}

//! waypoint: a tiny client-side router.
//!
//! Given the browser's current location (or an injected virtual one),
//! waypoint decides which registered view should be displayed and with
//! which extracted parameters, keeps that decision synchronized with
//! browser history (or an in-memory stack), and mediates navigation
//! attempts through optional per-view leave guards.
//!
//! ## Architecture
//!
//! - [`router::PathPattern`]: compiles `/`-delimited patterns (`:name`
//!   segments are optional-by-default parameters) into matchers.
//! - [`router`]: the route table (two-pass resolution: exact routes always
//!   beat parameterized ones), the navigation gate, location
//!   synchronization, and the orchestrating [`router::Router`].
//! - [`reactive`]: the [`reactive::Signal`] cells through which the host
//!   view layer observes the resolved path, parameters, and active view.
//! - [`component`]: the view registration traits, including the
//!   [`component::LeavableView`] leave-guard capability.
//! - [`platform`]: the browser bindings (wasm32) and their in-process
//!   double (native).
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use waypoint::component::{ViewComponent, ViewHandle};
//! use waypoint::router::{Router, RouterConfig};
//!
//! struct Home;
//! impl ViewComponent for Home {
//!     fn name(&self) -> &'static str {
//!         "Home"
//!     }
//! }
//!
//! struct User;
//! impl ViewComponent for User {
//!     fn name(&self) -> &'static str {
//!         "User"
//!     }
//! }
//!
//! let router = Router::new(
//!     RouterConfig::new()
//!         .memory_mode(true)
//!         .route("/", Rc::new(Home) as ViewHandle)
//!         .route("/user/:id", Rc::new(User) as ViewHandle)
//!         .redirect("/profile", "/user"),
//! );
//!
//! router.push("/user/42").unwrap();
//! assert_eq!(router.current_path().get(), "/user/42");
//!
//! // Parameters are optional-by-default: `/user` matches `/user/:id`
//! // with `id` bound to the empty string.
//! router.push("/user").unwrap();
//! assert_eq!(
//!     router.current_params().with(|p| p.get("id").cloned()),
//!     Some(String::new())
//! );
//! ```
//!
//! On wasm32, call [`router::Router::listen`] after mounting to subscribe
//! to back/forward navigation and to the Navigation API's interception
//! hook, so same-origin link clicks route through the instance instead of
//! reloading the page.

#![warn(missing_docs)]

pub mod component;
pub mod logging;
pub mod platform;
pub mod reactive;
pub mod router;

pub use component::{LeavableView, ViewComponent, ViewHandle};
pub use reactive::Signal;
pub use router::{
	PathPattern, Proceed, RouteDefinition, Router, RouterConfig, RouterError, RouterHandle,
};

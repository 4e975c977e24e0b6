//! Platform abstraction for location, history, and scrolling.
//!
//! The router talks to the host platform exclusively through this module.
//! On wasm32 the functions bind to the browser's Location/History APIs via
//! `web-sys`; on native targets they operate on an in-process double that
//! records every write so tests can assert on commit behavior.

/// A scroll request produced by anchor handling.
///
/// `Element` carries the target element id; `Top` scrolls the viewport to
/// the origin (an empty `#` fragment).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scroll {
	/// Scroll the viewport to the top of the page.
	Top,
	/// Scroll the element with the given id into view.
	Element(String),
}

#[cfg(target_arch = "wasm32")]
mod wasm {
	use wasm_bindgen::JsCast;
	use wasm_bindgen::JsValue;
	use wasm_bindgen::closure::Closure;

	use super::Scroll;

	fn window() -> Result<web_sys::Window, String> {
		web_sys::window().ok_or_else(|| "no window object".to_string())
	}

	/// Returns the current location's path component.
	pub fn current_path() -> String {
		web_sys::window()
			.and_then(|w| w.location().pathname().ok())
			.unwrap_or_else(|| "/".to_string())
	}

	/// Returns the current location's query string (including the leading `?`),
	/// or an empty string.
	pub fn current_search() -> String {
		web_sys::window()
			.and_then(|w| w.location().search().ok())
			.unwrap_or_default()
	}

	/// Returns the current location's origin (scheme + host + port).
	pub fn origin() -> String {
		web_sys::window()
			.and_then(|w| w.location().origin().ok())
			.unwrap_or_default()
	}

	/// Pushes a new history entry for `url` carrying `state_json` as its
	/// serialized state payload. Does not reload the page.
	pub fn push_state(url: &str, state_json: &str) -> Result<(), String> {
		let w = window()?;
		let history = w
			.history()
			.map_err(|_| "history API unavailable".to_string())?;
		history
			.push_state_with_url(&JsValue::from_str(state_json), "", Some(url))
			.map_err(|e| format!("pushState failed: {:?}", e))
	}

	/// Executes a scroll request. Best effort: a missing element is ignored.
	pub fn perform_scroll(scroll: &Scroll) {
		let Some(w) = web_sys::window() else {
			return;
		};
		match scroll {
			Scroll::Top => w.scroll_to_with_x_and_y(0.0, 0.0),
			Scroll::Element(id) => {
				if let Some(el) = w.document().and_then(|d| d.get_element_by_id(id)) {
					el.scroll_into_view();
				}
			}
		}
	}

	/// Runs `f` after the next rendering settle tick (requestAnimationFrame).
	pub fn schedule_after_render(f: impl FnOnce() + 'static) {
		let Some(w) = web_sys::window() else {
			return;
		};
		let closure = Closure::once(f);
		if w
			.request_animation_frame(closure.as_ref().unchecked_ref())
			.is_ok()
		{
			// The callback fires once; the browser owns it from here.
			closure.forget();
		}
	}

	/// Subscribes to back/forward navigation. The callback receives the new
	/// location's path+query. The listener lives for the lifetime of the page.
	pub fn setup_popstate_listener(on_popstate: impl Fn(String) + 'static) -> Result<(), String> {
		let w = window()?;
		let closure = Closure::<dyn FnMut(web_sys::PopStateEvent)>::new(
			move |_event: web_sys::PopStateEvent| {
				on_popstate(format!("{}{}", current_path(), current_search()));
			},
		);
		w.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
			.map_err(|e| format!("failed to attach popstate listener: {:?}", e))?;
		closure.forget();
		Ok(())
	}

	/// Subscribes to the Navigation API's `navigate` event, when the browser
	/// provides it. The callback receives the destination URL and returns
	/// whether the navigation was taken over; if so the platform default is
	/// suppressed.
	///
	/// The Navigation API has no `web-sys` binding yet, so the `navigation`
	/// object and the event's `destination.url` are reached through
	/// `js_sys::Reflect`.
	pub fn setup_navigate_listener(
		on_navigate: impl Fn(String) -> bool + 'static,
	) -> Result<(), String> {
		let w = window()?;
		let navigation = js_sys::Reflect::get(w.as_ref(), &JsValue::from_str("navigation"))
			.map_err(|_| "Navigation API unavailable".to_string())?;
		if navigation.is_undefined() || navigation.is_null() {
			return Err("Navigation API unavailable".to_string());
		}
		let target: web_sys::EventTarget = navigation
			.dyn_into()
			.map_err(|_| "navigation is not an EventTarget".to_string())?;
		let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
			let url = js_sys::Reflect::get(event.as_ref(), &JsValue::from_str("destination"))
				.and_then(|dest| js_sys::Reflect::get(&dest, &JsValue::from_str("url")))
				.ok()
				.and_then(|u| u.as_string());
			if let Some(url) = url {
				if on_navigate(url) {
					event.prevent_default();
				}
			}
		});
		target
			.add_event_listener_with_callback("navigate", closure.as_ref().unchecked_ref())
			.map_err(|e| format!("failed to attach navigate listener: {:?}", e))?;
		closure.forget();
		Ok(())
	}
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
	use std::cell::RefCell;

	use super::Scroll;

	/// A history write captured by the native platform double.
	#[derive(Debug, Clone, PartialEq, Eq)]
	pub struct RecordedPush {
		/// The URL passed to the history write.
		pub url: String,
		/// The serialized state payload.
		pub state: String,
	}

	struct PlatformState {
		path: String,
		search: String,
		origin: String,
		pushes: Vec<RecordedPush>,
		scrolls: Vec<Scroll>,
	}

	impl Default for PlatformState {
		fn default() -> Self {
			Self {
				path: "/".to_string(),
				search: String::new(),
				origin: "http://localhost".to_string(),
				pushes: Vec::new(),
				scrolls: Vec::new(),
			}
		}
	}

	thread_local! {
		static STATE: RefCell<PlatformState> = RefCell::new(PlatformState::default());
	}

	/// Returns the current location's path component.
	pub fn current_path() -> String {
		STATE.with(|s| s.borrow().path.clone())
	}

	/// Returns the current location's query string (including the leading `?`),
	/// or an empty string.
	pub fn current_search() -> String {
		STATE.with(|s| s.borrow().search.clone())
	}

	/// Returns the current location's origin (scheme + host + port).
	pub fn origin() -> String {
		STATE.with(|s| s.borrow().origin.clone())
	}

	/// Records a history write and moves the double's location to `url`.
	pub fn push_state(url: &str, state_json: &str) -> Result<(), String> {
		STATE.with(|s| {
			let mut s = s.borrow_mut();
			let (path, search) = match url.split_once('?') {
				Some((p, q)) => (p.to_string(), format!("?{}", q)),
				None => (url.to_string(), String::new()),
			};
			s.path = path;
			s.search = search;
			s.pushes.push(RecordedPush {
				url: url.to_string(),
				state: state_json.to_string(),
			});
		});
		Ok(())
	}

	/// Records a scroll request.
	pub fn perform_scroll(scroll: &Scroll) {
		STATE.with(|s| s.borrow_mut().scrolls.push(scroll.clone()));
	}

	/// Runs `f` immediately; native targets have no rendering tick to wait for.
	pub fn schedule_after_render(f: impl FnOnce() + 'static) {
		f();
	}

	/// Moves the double's location. Test hook.
	pub fn set_location(path: &str, search: &str) {
		STATE.with(|s| {
			let mut s = s.borrow_mut();
			s.path = path.to_string();
			s.search = search.to_string();
		});
	}

	/// Sets the double's origin. Test hook.
	pub fn set_origin(origin: &str) {
		STATE.with(|s| s.borrow_mut().origin = origin.to_string());
	}

	/// Returns every history write recorded since the last reset.
	pub fn recorded_pushes() -> Vec<RecordedPush> {
		STATE.with(|s| s.borrow().pushes.clone())
	}

	/// Returns every scroll request recorded since the last reset.
	pub fn scroll_requests() -> Vec<Scroll> {
		STATE.with(|s| s.borrow().scrolls.clone())
	}

	/// Restores the double to its initial state.
	pub fn reset() {
		STATE.with(|s| *s.borrow_mut() = PlatformState::default());
	}
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::*;
#[cfg(target_arch = "wasm32")]
pub use wasm::*;

//! JS binding: `new MenuSpy(element, options)`
//!
//! Owns the two browser registrations the tracker needs: a `resize` listener
//! and a self-re-arming `requestAnimationFrame` callback. Both are released by
//! `destroy()` (also run when the JS object is freed).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::{Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Window};

use crate::spy::config::SpyConfig;
use crate::spy::error::SpyError;
use crate::spy::frame::FrameControl;
use crate::spy::host::SpyHost;
use crate::spy::tracker::{ActivationCallback, MenuSpy, TrackedItem};
use crate::web::dom::DomHost;

type SharedSpy = Rc<RefCell<MenuSpy<DomHost>>>;
type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

impl From<SpyError> for JsValue {
    fn from(e: SpyError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

// =============================================================================
// Options
// =============================================================================

/// Split a JS options object into the serde config and the callback
fn parse_options(options: &JsValue) -> Result<(SpyConfig, Option<Function>), SpyError> {
    if options.is_undefined() || options.is_null() {
        return Ok((SpyConfig::default(), None));
    }
    if !options.is_object() {
        return Err(SpyError::Config("options must be an object".to_string()));
    }

    let key = JsValue::from_str("callback");
    let callback = Reflect::get(options, &key)
        .ok()
        .and_then(|value| value.dyn_into::<Function>().ok());

    // Functions don't deserialize; work on a shallow copy without them
    let copy = Object::assign(&Object::new(), options.unchecked_ref::<Object>());
    Reflect::delete_property(&copy, &key).map_err(|e| SpyError::Js(format!("{:?}", e)))?;

    let config: SpyConfig = serde_wasm_bindgen::from_value(copy.into())
        .map_err(|e| SpyError::Config(e.to_string()))?;
    config.validate()?;
    Ok((config, callback))
}

/// `{ entry, target, offset }` handed to the JS callback
fn item_to_js(item: &TrackedItem<Element>) -> JsValue {
    let obj = Object::new();
    let fields: [(&str, JsValue); 3] = [
        ("entry", item.entry.clone().into()),
        ("target", item.target.clone().into()),
        ("offset", JsValue::from_f64(item.offset)),
    ];
    for (name, value) in fields {
        // Setting a data property on a fresh plain object cannot throw
        let _ = Reflect::set(&obj, &JsValue::from_str(name), &value);
    }
    obj.into()
}

fn js_callback(function: Function) -> ActivationCallback<Element> {
    Box::new(move |item| {
        if let Err(e) = function.call1(&JsValue::NULL, &item_to_js(item)) {
            web_sys::console::error_2(&JsValue::from_str("[MenuSpy] Callback threw"), &e);
        }
    })
}

// =============================================================================
// WebMenuSpy
// =============================================================================

#[wasm_bindgen(js_name = MenuSpy)]
pub struct WebMenuSpy {
    spy: SharedSpy,
    window: Window,
    frame_slot: FrameSlot,
    frame_id: Rc<Cell<Option<i32>>>,
    cancelled: Rc<Cell<bool>>,
    resize_listener: Option<Closure<dyn FnMut()>>,
}

#[wasm_bindgen(js_class = MenuSpy)]
impl WebMenuSpy {
    /// Start tracking `element`'s menu entries. A null element yields an
    /// inert instance with no listeners.
    #[wasm_bindgen(constructor)]
    pub fn new(element: Option<Element>, options: JsValue) -> Result<WebMenuSpy, JsValue> {
        let (config, callback) = parse_options(&options)?;
        let host = DomHost::from_window()?;
        let window = host.window().clone();

        let spy = MenuSpy::try_new(host, element, config, callback.map(js_callback))?;
        let inert = spy.is_inert();

        let mut handle = WebMenuSpy {
            spy: Rc::new(RefCell::new(spy)),
            window,
            frame_slot: Rc::new(RefCell::new(None)),
            frame_id: Rc::new(Cell::new(None)),
            cancelled: Rc::new(Cell::new(false)),
            resize_listener: None,
        };

        if !inert {
            handle.listen_resize()?;
            handle.start_frames()?;
        }
        Ok(handle)
    }

    /// Rebuild items now; returns `{ tracked, dropped, elapsedUs }`
    #[wasm_bindgen(js_name = refresh)]
    pub fn js_refresh(&self) -> JsValue {
        match self.spy.try_borrow_mut() {
            Ok(mut spy) => serde_wasm_bindgen::to_value(&spy.refresh()).unwrap_or(JsValue::NULL),
            Err(_) => {
                web_sys::console::warn_1(&JsValue::from_str(
                    "[MenuSpy] refresh() ignored inside the activation callback",
                ));
                JsValue::NULL
            }
        }
    }

    /// Remove listeners, stop the frame loop and clear the highlight
    #[wasm_bindgen(js_name = destroy)]
    pub fn js_destroy(&mut self) {
        self.teardown();
    }

    /// Id of the active target, or undefined.
    ///
    /// The tracker is busy while the activation callback runs; reads from
    /// inside it warn and return undefined. Use the callback's `item.target`.
    #[wasm_bindgen(js_name = activeId)]
    pub fn active_id(&self) -> Option<String> {
        let spy = self.read("activeId")?;
        spy.active_target().map(|target| spy.host().element_id(target))
    }

    /// Tracked entry count; 0 when read from inside the callback
    #[wasm_bindgen(js_name = trackedCount)]
    pub fn tracked_count(&self) -> usize {
        self.read("trackedCount").map(|spy| spy.items().len()).unwrap_or(0)
    }

    /// false when read from inside the callback
    #[wasm_bindgen(js_name = isInert)]
    pub fn is_inert(&self) -> bool {
        self.read("isInert").map(|spy| spy.is_inert()).unwrap_or(false)
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        !self.cancelled.get() && self.frame_id.get().is_some()
    }
}

impl WebMenuSpy {
    fn read(&self, method: &str) -> Option<std::cell::Ref<'_, MenuSpy<DomHost>>> {
        match self.spy.try_borrow() {
            Ok(spy) => Some(spy),
            Err(_) => {
                web_sys::console::warn_1(&JsValue::from_str(&format!(
                    "[MenuSpy] {}() is unavailable inside the activation callback",
                    method
                )));
                None
            }
        }
    }

    fn report(context: &str, err: &JsValue) {
        web_sys::console::warn_2(&JsValue::from_str(&format!("[MenuSpy] {}", context)), err);
    }

    fn listen_resize(&mut self) -> Result<(), JsValue> {
        let spy = Rc::clone(&self.spy);
        let listener = Closure::wrap(Box::new(move || {
            if let Ok(mut spy) = spy.try_borrow_mut() {
                spy.notify_resize();
            }
        }) as Box<dyn FnMut()>);

        self.window
            .add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())?;
        self.resize_listener = Some(listener);
        Ok(())
    }

    fn start_frames(&self) -> Result<(), JsValue> {
        let spy = Rc::clone(&self.spy);
        let window = self.window.clone();
        // Weak: the slot owns the closure, the closure must not own the slot
        let slot = Rc::downgrade(&self.frame_slot);
        let frame_id = Rc::clone(&self.frame_id);
        let cancelled = Rc::clone(&self.cancelled);

        let tick = Closure::wrap(Box::new(move |_timestamp: f64| {
            frame_id.set(None);
            if cancelled.get() {
                return;
            }
            let control = match spy.try_borrow_mut() {
                Ok(mut spy) => spy.frame(),
                Err(_) => FrameControl::Continue,
            };
            // destroy() from inside the callback lands here
            if cancelled.get() {
                if let Ok(mut spy) = spy.try_borrow_mut() {
                    spy.destroy();
                }
                return;
            }
            if control == FrameControl::Stop {
                return;
            }
            let Some(slot) = slot.upgrade() else {
                return;
            };
            let slot = slot.borrow();
            if let Some(callback) = slot.as_ref() {
                match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                    Ok(id) => frame_id.set(Some(id)),
                    Err(e) => web_sys::console::error_2(
                        &JsValue::from_str("[MenuSpy] requestAnimationFrame failed"),
                        &e,
                    ),
                }
            }
        }) as Box<dyn FnMut(f64)>);

        let id = self
            .window
            .request_animation_frame(tick.as_ref().unchecked_ref())?;
        self.frame_id.set(Some(id));
        *self.frame_slot.borrow_mut() = Some(tick);
        Ok(())
    }

    fn teardown(&mut self) {
        if self.cancelled.replace(true) {
            return;
        }
        if let Some(id) = self.frame_id.take() {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                Self::report("cancelAnimationFrame failed", &e);
            }
        }
        if let Some(listener) = self.resize_listener.take() {
            if let Err(e) = self
                .window
                .remove_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())
            {
                Self::report("Failed to remove resize listener", &e);
            }
        }
        match self.spy.try_borrow_mut() {
            Ok(mut spy) => {
                spy.destroy();
                // No frame is pending now, so the closure can go
                self.frame_slot.borrow_mut().take();
            }
            // The running frame closure finishes the job; the slot is freed
            // with this handle
            Err(_) => {
                web_sys::console::warn_1(&JsValue::from_str(
                    "[MenuSpy] destroy() inside the activation callback finishes after this frame",
                ));
            }
        }
    }
}

impl Drop for WebMenuSpy {
    fn drop(&mut self) {
        self.teardown();
    }
}

// =============================================================================
// Tests
// =============================================================================

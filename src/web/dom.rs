//! DomHost: SpyHost over the live page
//!
//! DOM exceptions never escape: a bad selector selects nothing and a failed
//! class toggle is reported to the console.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlAnchorElement, HtmlElement, Window};

use crate::spy::error::SpyError;
use crate::spy::host::SpyHost;

pub struct DomHost {
    window: Window,
    document: Document,
}

impl DomHost {
    pub fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }

    /// Attach to the global `window`
    pub fn from_window() -> Result<Self, SpyError> {
        let window = web_sys::window().ok_or(SpyError::NoWindow)?;
        let document = window.document().ok_or(SpyError::NoDocument)?;
        Ok(Self::new(window, document))
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn report(context: &str, err: &JsValue) {
        web_sys::console::warn_2(&JsValue::from_str(&format!("[MenuSpy] {}", context)), err);
    }
}

impl SpyHost for DomHost {
    type Element = Element;

    fn element_height(&self, element: &Element) -> f64 {
        match element.dyn_ref::<HtmlElement>() {
            Some(html) => html.offset_height() as f64,
            None => element.client_height() as f64,
        }
    }

    fn offset_top(&self, element: &Element) -> f64 {
        element.get_bounding_client_rect().top() + self.scroll_top()
    }

    fn scroll_top(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_to(&self, y: f64) {
        self.window.scroll_to_with_x_and_y(0.0, y);
    }

    fn select_all(&self, container: &Element, selector: &str) -> Vec<Element> {
        let list = match container.query_selector_all(selector) {
            Ok(list) => list,
            Err(e) => {
                Self::report(&format!("Invalid menu item selector '{}'", selector), &e);
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn select_one(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn target_selector(&self, entry: &Element) -> Option<String> {
        entry.get_attribute("data-target")
    }

    fn link_hash(&self, entry: &Element) -> String {
        entry
            .dyn_ref::<HtmlAnchorElement>()
            .map(|anchor| anchor.hash())
            .unwrap_or_default()
    }

    fn element_id(&self, element: &Element) -> String {
        element.id()
    }

    fn parent(&self, element: &Element) -> Option<Element> {
        element.parent_element()
    }

    fn add_class(&self, element: &Element, class: &str) {
        if let Err(e) = element.class_list().add_1(class) {
            Self::report(&format!("Failed to add class '{}'", class), &e);
        }
    }

    fn remove_class(&self, element: &Element, class: &str) {
        if let Err(e) = element.class_list().remove_1(class) {
            Self::report(&format!("Failed to remove class '{}'", class), &e);
        }
    }

    fn can_replace_history(&self) -> bool {
        let Ok(history) = self.window.history() else {
            return false;
        };
        js_sys::Reflect::get(&history, &JsValue::from_str("replaceState"))
            .map(|f| f.is_function())
            .unwrap_or(false)
    }

    fn replace_hash(&self, hash: &str) {
        let result = self
            .window
            .history()
            .and_then(|history| history.replace_state_with_url(&JsValue::NULL, "", Some(hash)));
        if let Err(e) = result {
            Self::report("history.replaceState failed", &e);
        }
    }

    fn assign_hash(&self, hash: &str) {
        if let Err(e) = self.window.location().set_hash(hash) {
            Self::report("Failed to set location.hash", &e);
        }
    }

    fn now(&self) -> f64 {
        self.window
            .performance()
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }
}

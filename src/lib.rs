//! MenuSpy: Scroll-Position Navigation Highlighting
//!
//! A Rust/WASM scroll spy. Tracks the document scroll position against the
//! targets of a navigation menu and highlights the entry for the last
//! section scrolled into.
//!
//! # Architecture
//!
//! ## Core (`spy`, platform-agnostic)
//! - `tracker.rs` - MenuSpy: item list, resolution, activation transitions
//! - `config.rs` - Options, defaults and validation
//! - `host.rs` - SpyHost: geometry / scroll / navigation access trait
//! - `debounce.rs` - Debouncer: cancel-and-restart deferred calls
//! - `frame.rs` - FrameLoop: self-re-arming per-frame task
//! - `error.rs` - SpyError: configuration and host failures
//!
//! ## Browser (`web`)
//! - `dom.rs` - DomHost: SpyHost over `web_sys`
//! - `bindings.rs` - `MenuSpy` JS class (resize listener + rAF loop)
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { MenuSpy } from 'menuspy';
//!
//! await init();
//!
//! const spy = new MenuSpy(document.querySelector('#main-menu'), {
//!   activeClass: 'is-active',
//!   threshold: 20,
//!   hashTimeout: 300,
//!   callback: (item) => console.log('now reading', item.target.id),
//! });
//!
//! spy.activeId();  // "introduction"
//! spy.destroy();
//! ```

pub mod spy;
pub mod web;

// Public exports - Core
pub use spy::*;

// Public exports - Browser
pub use web::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook and logging for the browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console-logging")]
    {
        console_log::init_with_level(log::Level::Debug).ok();
    }
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("menuspy v{}", env!("CARGO_PKG_VERSION"))
}

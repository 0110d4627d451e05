//! Browser integration: `web_sys` host and the JS-facing `MenuSpy` class

pub mod bindings;
pub mod dom;

pub use bindings::WebMenuSpy;
pub use dom::DomHost;

pub mod config;
pub mod debounce;
pub mod error;
pub mod frame;
pub mod host;
pub mod tracker;

pub use config::*;
pub use debounce::*;
pub use error::*;
pub use frame::*;
pub use host::*;
pub use tracker::*;

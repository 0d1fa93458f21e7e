//! connection/mod.rs
//! Open-time detection and the per-connection context it produces.

pub mod context;
pub mod detect;

pub use context::ConnectionContext;
pub use detect::{detect, detect_with_params, Detection};

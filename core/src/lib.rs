//! pagecodec-core
//!
//! Page-level compression and prefix encryption for an embedded
//! database's pluggable storage layer. Pure Rust, no FFI.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod params;

pub mod compression;
pub mod crypto;
pub mod telemetry;

// Host facing layer
pub mod connection;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::compression::{lookup, CodecDescriptor, PageCodec, REGISTRY};
    pub use crate::connection::{detect, detect_with_params, ConnectionContext, Detection};
    pub use crate::crypto::AesPageCipher;
    pub use crate::params::{OpenParams, QueryParams, UriParams};
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::{status_of, PageCodecError, StatusCode};
}

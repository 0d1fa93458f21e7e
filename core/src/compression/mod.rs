//! compression/mod.rs
//! Page codecs and the registry that resolves algorithm names to them.
//!
//! - Each page is compressed independently; no state crosses page boundaries.
//! - BSR and NDSC formats are persisted on disk and decoded bit-exactly.
//! - zlib and lz4 are thin adapters over external engines (cargo features).

pub mod constants;
pub mod types;
pub mod registry;
pub mod codecs;

pub use constants::*;
pub use types::*;
pub use registry::*;

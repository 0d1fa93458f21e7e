//! telemetry/mod.rs
//! Per-connection counters and immutable snapshots.
//!
//! Counters live inside the connection context and are only touched by the
//! call that owns it, so no atomics or locks are involved.

pub mod counters;
pub mod snapshot;

pub use counters::*;
pub use snapshot::*;

//! telemetry/snapshot.rs
//! Immutable view of a connection's counters.

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;
use crate::utils::ratio;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub algorithm: String,
    pub encrypted: bool,
    pub counters: TelemetryCounters,
    /// Stored bytes per raw byte on the write path (lower is better).
    pub compression_ratio: f64,
}

impl TelemetrySnapshot {
    pub fn from(algorithm: &str, encrypted: bool, counters: &TelemetryCounters) -> Self {
        Self {
            algorithm: algorithm.to_owned(),
            encrypted,
            counters: counters.clone(),
            compression_ratio: ratio(counters.bytes_stored_out, counters.bytes_raw_in),
        }
    }

    /// Bytes saved on the write path; negative when pages grew.
    pub fn bytes_saved(&self) -> i64 {
        self.counters.bytes_raw_in as i64 - self.counters.bytes_stored_out as i64
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

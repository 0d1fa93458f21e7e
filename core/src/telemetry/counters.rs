//! telemetry/counters.rs
//! Mutable counters kept by one connection context.
//!
//! Summary: counts pages and bytes through compress/decompress. Converted
//! into an immutable `TelemetrySnapshot` on request.
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub pages_compressed: u64,
    pub pages_decompressed: u64,
    /// Raw page bytes handed to compress.
    pub bytes_raw_in: u64,
    /// Stored bytes produced by compress (after encryption).
    pub bytes_stored_out: u64,
    /// Stored bytes handed to decompress.
    pub bytes_stored_in: u64,
    /// Raw bytes produced by decompress.
    pub bytes_raw_out: u64,
    /// Bytes run through the AES prefix cipher, both directions.
    pub bytes_enciphered: u64,
    pub failures: u64,
}

impl TelemetryCounters {
    /// Record one successful compress call.
    pub fn add_compress(&mut self, raw_len: usize, stored_len: usize, enciphered: usize) {
        self.pages_compressed += 1;
        self.bytes_raw_in += raw_len as u64;
        self.bytes_stored_out += stored_len as u64;
        self.bytes_enciphered += enciphered as u64;
    }

    /// Record one successful decompress call.
    pub fn add_decompress(&mut self, stored_len: usize, raw_len: usize, enciphered: usize) {
        self.pages_decompressed += 1;
        self.bytes_stored_in += stored_len as u64;
        self.bytes_raw_out += raw_len as u64;
        self.bytes_enciphered += enciphered as u64;
    }

    pub fn add_failure(&mut self) {
        self.failures += 1;
    }

    pub fn merge(&mut self, other: &TelemetryCounters) {
        *self += other.clone();
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.pages_compressed   += rhs.pages_compressed;
        self.pages_decompressed += rhs.pages_decompressed;
        self.bytes_raw_in       += rhs.bytes_raw_in;
        self.bytes_stored_out   += rhs.bytes_stored_out;
        self.bytes_stored_in    += rhs.bytes_stored_in;
        self.bytes_raw_out      += rhs.bytes_raw_out;
        self.bytes_enciphered   += rhs.bytes_enciphered;
        self.failures           += rhs.failures;
    }
}

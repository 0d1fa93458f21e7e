//! crypto/types.rs
//! Sizes and errors for the page prefix cipher.

use thiserror::Error;

/// AES-128 key length in bytes.
pub const KEY_LEN_16: usize = 16;

/// AES block length in bytes.
pub const BLOCK_LEN: usize = 16;

/// At most this many leading blocks of a compressed page are transformed.
pub const MAX_BLOCKS: usize = 4;

/// Largest prefix the cipher ever touches (64 bytes).
pub const MAX_COVERED_LEN: usize = BLOCK_LEN * MAX_BLOCKS;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// The decrypt staging buffer could not grow.
    #[error("allocation of {requested} bytes for decrypt staging failed")]
    AllocationFailure { requested: usize },
}

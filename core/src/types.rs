use num_enum::TryFromPrimitive;
use thiserror::Error;

use crate::compression::CompressionError;
use crate::crypto::CryptoError;

/// Integer status handed back to the host: `0` ok, anything else an error.
#[repr(i32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum StatusCode {
    Ok      = 0,
    Error   = 1,
    NoMem   = 7,
    Corrupt = 11,
}

/// Unified error covering compression, crypto and allocation.
/// - `From<T>` impls let `?` cross the codec and cipher layers.
/// - `status()` maps every variant onto the host's integer contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageCodecError {
    #[error("allocation failure: {0} bytes")]
    AllocationFailure(usize),

    #[error("destination too small: need up to {need} bytes, have {have}")]
    BufferTooSmall { need: usize, have: usize },

    #[error("corrupt input: {0}")]
    CorruptInput(String),

    #[error("unsupported ndsc mode: {0}")]
    UnsupportedMode(i32),

    #[error("codec {codec} failed: {msg}")]
    CodecProcessFailed { codec: String, msg: String },
}

impl PageCodecError {
    pub fn status(&self) -> StatusCode {
        match self {
            PageCodecError::AllocationFailure(_) => StatusCode::NoMem,
            PageCodecError::CorruptInput(_) => StatusCode::Corrupt,
            PageCodecError::BufferTooSmall { .. }
            | PageCodecError::UnsupportedMode(_)
            | PageCodecError::CodecProcessFailed { .. } => StatusCode::Error,
        }
    }
}

impl From<CompressionError> for PageCodecError {
    fn from(e: CompressionError) -> Self {
        match e {
            CompressionError::BufferTooSmall { need, have } =>
                PageCodecError::BufferTooSmall { need, have },
            CompressionError::CorruptInput(msg) => PageCodecError::CorruptInput(msg),
            CompressionError::UnsupportedMode { mode } => PageCodecError::UnsupportedMode(mode),
            CompressionError::AllocationFailure { requested } =>
                PageCodecError::AllocationFailure(requested),
            CompressionError::CodecProcessFailed { codec, msg } =>
                PageCodecError::CodecProcessFailed { codec, msg },
        }
    }
}

impl From<CryptoError> for PageCodecError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::AllocationFailure { requested } =>
                PageCodecError::AllocationFailure(requested),
        }
    }
}

/// Status for a whole call result, as a host would see it.
pub fn status_of<T>(result: &Result<T, PageCodecError>) -> i32 {
    match result {
        Ok(_) => StatusCode::Ok as i32,
        Err(e) => e.status() as i32,
    }
}

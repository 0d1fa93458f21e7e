//! compression/types.rs
//! Codec capability trait, per-connection codec state and compression errors.

use thiserror::Error;

use crate::params::UriParams;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompressionError {
    #[error("destination too small: need up to {need} bytes, have {have}")]
    BufferTooSmall { need: usize, have: usize },

    #[error("corrupt input: {0}")]
    CorruptInput(String),

    #[error("unsupported ndsc mode: {mode} (expected 0..=8)")]
    UnsupportedMode { mode: i32 },

    #[error("allocation of {requested} bytes failed")]
    AllocationFailure { requested: usize },

    #[error("codec {codec} process failed: {msg}")]
    CodecProcessFailed { codec: String, msg: String },
}

impl CompressionError {
    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        CompressionError::CorruptInput(msg.into())
    }
}

/// Persistent encoder state owned by a connection.
/// BSR and NDSC need none; bindings that keep an engine alive store it here.
pub enum EncoderState {
    #[cfg(feature = "zlib")]
    Zlib(flate2::Compress),
}

/// Persistent decoder state owned by a connection.
pub enum DecoderState {
    #[cfg(feature = "zlib")]
    Zlib(flate2::Decompress),
}

/// Mutable codec-side state of one connection.
pub struct CodecState {
    /// Codec specific level, `LEVEL_UNSET` when the URI had none.
    pub level: i32,
    pub encoder: Option<EncoderState>,
    pub decoder: Option<DecoderState>,
}

impl CodecState {
    pub fn new(level: i32) -> Self {
        Self { level, encoder: None, decoder: None }
    }
}

impl std::fmt::Debug for CodecState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecState")
            .field("level", &self.level)
            .field("encoder", &self.encoder.is_some())
            .field("decoder", &self.decoder.is_some())
            .finish()
    }
}

/// Capability interface every page codec implements.
///
/// `compress` writes into `dst` and returns the number of bytes produced;
/// it must fail with `BufferTooSmall` rather than return a partial page.
/// `decompress` receives `dst` sized to the expected page length and returns
/// the number of bytes written.
///
/// Lifecycle hooks default to no-ops.
pub trait PageCodec {
    fn bound(&self, src_len: usize) -> usize;

    fn compress(&self, state: &mut CodecState, src: &[u8], dst: &mut [u8])
        -> Result<usize, CompressionError>;

    fn decompress(&self, state: &mut CodecState, src: &[u8], dst: &mut [u8])
        -> Result<usize, CompressionError>;

    fn compress_setup(&self, _state: &mut CodecState, _params: &dyn UriParams)
        -> Result<(), CompressionError>
    {
        Ok(())
    }

    fn compress_cleanup(&self, _state: &mut CodecState) -> Result<(), CompressionError> {
        Ok(())
    }

    fn decompress_setup(&self, _state: &mut CodecState, _params: &dyn UriParams)
        -> Result<(), CompressionError>
    {
        Ok(())
    }

    fn decompress_cleanup(&self, _state: &mut CodecState) -> Result<(), CompressionError> {
        Ok(())
    }
}

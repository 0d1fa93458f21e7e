//! codecs/lz4.rs
//! LZ4 block codec (fast and high-compression variants) via the lz4 crate.
//! Blocks carry no size prefix; the page size comes from the caller.

use ::lz4::block::{compress_to_buffer, decompress_to_buffer, CompressionMode};

use crate::compression::constants::{
    LZ4HC_DEFAULT_LEVEL, LZ4HC_MAX_LEVEL, LZ4HC_MIN_LEVEL, LZ4_MAX_INPUT_SIZE,
};
use crate::compression::types::{CodecState, CompressionError, PageCodec};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lz4Codec {
    pub high_compression: bool,
}

impl Lz4Codec {
    pub const fn fast() -> Self {
        Self { high_compression: false }
    }

    pub const fn high() -> Self {
        Self { high_compression: true }
    }

    fn mode(&self, level: i32) -> CompressionMode {
        if !self.high_compression {
            return CompressionMode::DEFAULT;
        }
        if (LZ4HC_MIN_LEVEL..=LZ4HC_MAX_LEVEL).contains(&level) {
            CompressionMode::HIGHCOMPRESSION(level)
        } else {
            CompressionMode::HIGHCOMPRESSION(LZ4HC_DEFAULT_LEVEL)
        }
    }

    fn name(&self) -> &'static str {
        if self.high_compression { "lz4hc" } else { "lz4" }
    }
}

impl PageCodec for Lz4Codec {
    /// Same as `LZ4_compressBound`.
    fn bound(&self, src_len: usize) -> usize {
        if src_len > LZ4_MAX_INPUT_SIZE {
            return 0;
        }
        src_len + src_len / 255 + 16
    }

    fn compress(&self, state: &mut CodecState, src: &[u8], dst: &mut [u8])
        -> Result<usize, CompressionError>
    {
        let bound = self.bound(src.len());
        let have = dst.len();
        compress_to_buffer(src, Some(self.mode(state.level)), false, dst).map_err(|e| {
            if have < bound {
                CompressionError::BufferTooSmall { need: bound, have }
            } else {
                CompressionError::CodecProcessFailed {
                    codec: self.name().into(),
                    msg: e.to_string(),
                }
            }
        })
    }

    fn decompress(&self, _state: &mut CodecState, src: &[u8], dst: &mut [u8])
        -> Result<usize, CompressionError>
    {
        let expected = i32::try_from(dst.len()).map_err(|_| CompressionError::CodecProcessFailed {
            codec: self.name().into(),
            msg: format!("page of {} bytes exceeds lz4 limits", dst.len()),
        })?;
        decompress_to_buffer(src, Some(expected), dst)
            .map_err(|e| CompressionError::corrupt(format!("{}: {}", self.name(), e)))
    }
}

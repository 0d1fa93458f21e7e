//! codecs/zlib.rs
//! zlib page codec via flate2.
//!
//! The encoder and decoder live for the whole connection: the setup hooks
//! create them, each page resets and reuses them, the cleanup hooks drop
//! them.

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};
use log::debug;

use crate::compression::constants::{ZLIB_MAX_LEVEL, ZLIB_MIN_LEVEL};
use crate::compression::types::{
    CodecState, CompressionError, DecoderState, EncoderState, PageCodec,
};
use crate::params::UriParams;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZlibCodec;

fn compression_for_level(level: i32) -> Compression {
    if (ZLIB_MIN_LEVEL..=ZLIB_MAX_LEVEL).contains(&level) {
        Compression::new(level as u32)
    } else {
        Compression::default()
    }
}

fn process_failed(msg: impl ToString) -> CompressionError {
    CompressionError::CodecProcessFailed { codec: "zlib".into(), msg: msg.to_string() }
}

impl PageCodec for ZlibCodec {
    fn bound(&self, src_len: usize) -> usize {
        src_len + (src_len >> 12) + (src_len >> 14) + 11
    }

    fn compress_setup(&self, state: &mut CodecState, _params: &dyn UriParams)
        -> Result<(), CompressionError>
    {
        let level = compression_for_level(state.level);
        debug!("zlib: encoder ready (level {})", level.level());
        state.encoder = Some(EncoderState::Zlib(Compress::new(level, true)));
        Ok(())
    }

    fn compress_cleanup(&self, state: &mut CodecState) -> Result<(), CompressionError> {
        state.encoder = None;
        Ok(())
    }

    fn decompress_setup(&self, state: &mut CodecState, _params: &dyn UriParams)
        -> Result<(), CompressionError>
    {
        state.decoder = Some(DecoderState::Zlib(Decompress::new(true)));
        Ok(())
    }

    fn decompress_cleanup(&self, state: &mut CodecState) -> Result<(), CompressionError> {
        state.decoder = None;
        Ok(())
    }

    fn compress(&self, state: &mut CodecState, src: &[u8], dst: &mut [u8])
        -> Result<usize, CompressionError>
    {
        let level = state.level;
        let encoder = match state.encoder.get_or_insert_with(|| {
            EncoderState::Zlib(Compress::new(compression_for_level(level), true))
        }) {
            EncoderState::Zlib(encoder) => encoder,
        };
        encoder.reset();

        match encoder.compress(src, dst, FlushCompress::Finish) {
            Ok(Status::StreamEnd) => Ok(encoder.total_out() as usize),
            Ok(_) => Err(CompressionError::BufferTooSmall {
                need: self.bound(src.len()),
                have: dst.len(),
            }),
            Err(e) => Err(process_failed(e)),
        }
    }

    fn decompress(&self, state: &mut CodecState, src: &[u8], dst: &mut [u8])
        -> Result<usize, CompressionError>
    {
        let decoder = match state
            .decoder
            .get_or_insert_with(|| DecoderState::Zlib(Decompress::new(true)))
        {
            DecoderState::Zlib(decoder) => decoder,
        };
        decoder.reset(true);

        match decoder.decompress(src, dst, FlushDecompress::Finish) {
            Ok(Status::StreamEnd) => Ok(decoder.total_out() as usize),
            Ok(_) => Err(process_failed(format!(
                "stream did not end within {} output bytes", dst.len()
            ))),
            Err(e) => Err(CompressionError::corrupt(e.to_string())),
        }
    }
}

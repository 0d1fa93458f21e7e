//! codecs/bsr.rs
//! Blank-space removal.
//!
//! Many database pages carry one large span of zero bytes. BSR drops the
//! single longest span and stores where it started:
//!
//! ```text
//! [X: u16 BE][src[..X]][src[X + zero_run..]]
//! ```
//!
//! Decompression needs the original page length from the caller; the bytes
//! between the head and the tail are refilled with zeros.

use byteorder::{BigEndian, ByteOrder};

use crate::compression::constants::{BSR_HEADER_LEN, BSR_MAX_OFFSET};
use crate::compression::types::{CodecState, CompressionError, PageCodec};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BsrCodec;

/// Longest run of zero bytes as `(start, len)`; `(0, 0)` when there is none.
///
/// The earliest run wins ties. Scanning stops once no remaining start
/// position could hold a longer run. Runs starting past `BSR_MAX_OFFSET`
/// are not addressable by the header and are skipped.
pub fn longest_zero_run(src: &[u8]) -> (usize, usize) {
    let mut best_start = 0;
    let mut best_len = 0;
    let mut limit = src.len();
    let mut i = 0;

    while i < limit {
        if src[i] == 0 {
            let start = i;
            i += 1;
            while i < src.len() && src[i] == 0 {
                i += 1;
            }
            let len = i - start;
            if len > best_len && start <= BSR_MAX_OFFSET {
                best_len = len;
                best_start = start;
                limit = src.len() - best_len;
            }
        }
        i += 1;
    }

    (best_start, best_len)
}

pub fn bound(src_len: usize) -> usize {
    src_len + BSR_HEADER_LEN
}

/// Compress `src` into `dst`, returning the compressed length.
pub fn compress_into(src: &[u8], dst: &mut [u8]) -> Result<usize, CompressionError> {
    let (start, zeros) = longest_zero_run(src);
    let out_len = BSR_HEADER_LEN + src.len() - zeros;
    if dst.len() < out_len {
        return Err(CompressionError::BufferTooSmall { need: out_len, have: dst.len() });
    }

    BigEndian::write_u16(&mut dst[..BSR_HEADER_LEN], start as u16);
    let head_end = BSR_HEADER_LEN + start;
    dst[BSR_HEADER_LEN..head_end].copy_from_slice(&src[..start]);
    dst[head_end..out_len].copy_from_slice(&src[start + zeros..]);

    Ok(out_len)
}

/// Rebuild a page of exactly `dst.len()` bytes.
pub fn decompress_into(src: &[u8], dst: &mut [u8]) -> Result<usize, CompressionError> {
    if src.len() < BSR_HEADER_LEN {
        return Err(CompressionError::corrupt(format!(
            "bsr stream of {} bytes has no header", src.len()
        )));
    }

    let head = BigEndian::read_u16(&src[..BSR_HEADER_LEN]) as usize;
    let body = &src[BSR_HEADER_LEN..];
    if head > body.len() {
        return Err(CompressionError::corrupt(format!(
            "bsr head {} exceeds body {}", head, body.len()
        )));
    }
    if body.len() > dst.len() {
        return Err(CompressionError::corrupt(format!(
            "bsr body {} exceeds page {}", body.len(), dst.len()
        )));
    }

    let tail = body.len() - head;
    let zeros_end = dst.len() - tail;
    dst[..head].copy_from_slice(&body[..head]);
    dst[head..zeros_end].fill(0);
    dst[zeros_end..].copy_from_slice(&body[head..]);

    Ok(dst.len())
}

impl PageCodec for BsrCodec {
    fn bound(&self, src_len: usize) -> usize {
        bound(src_len)
    }

    fn compress(&self, _state: &mut CodecState, src: &[u8], dst: &mut [u8])
        -> Result<usize, CompressionError>
    {
        compress_into(src, dst)
    }

    fn decompress(&self, _state: &mut CodecState, src: &[u8], dst: &mut [u8])
        -> Result<usize, CompressionError>
    {
        decompress_into(src, dst)
    }
}

//! codecs/ndsc.rs
//! NDSC: byte-oriented LZ compressor with a flag/command bitstream.
//!
//! Stream layout:
//! - A control byte precedes every group of up to 8 tokens. Its bits are
//!   read from the most significant bit down, one per token.
//! - Bit `0`: literal, one byte copied from the stream.
//! - Bit `1`: command `b0 b1`, `cmd = b0 >> 4`, `cnt = (b0 & 0xF) << 8 | b1`:
//!   - `cmd 0`  copy `cnt + 16` bytes verbatim (uncompressible span)
//!   - `cmd 1`  repeat the previous output byte `cnt + 3` times
//!   - `cmd 2`  read `b2`, copy `b2 + 16` bytes from `cnt + len` bytes back
//!   - `cmd 3..=15` copy `cmd` bytes from `cnt + cmd` bytes back
//!
//! The back-reference source always ends at or before the current output
//! position, so copies never overlap their destination.

use log::trace;

use crate::compression::constants::ndsc::{
    CMD_LONG, CMD_RUN, CMD_SPAN, DEFAULT_MODE, HASH_LEN, MAX_COUNT, MAX_LONG_MATCH, MAX_MODE,
    MAX_RUN, MAX_SHORT_MATCH, MAX_SPAN, MIN_LONG_MATCH, MIN_MATCH, MIN_MODE, MIN_RUN, MIN_SPAN,
    SPAN_THRESHOLD,
};
use crate::compression::types::{CodecState, CompressionError, PageCodec};

/// Slot marker for "no position recorded".
const EMPTY: usize = usize::MAX;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NdscCodec;

impl NdscCodec {
    /// Connection level to search mode; out-of-range levels fall back to the default.
    pub fn mode_for_level(level: i32) -> i32 {
        if (MIN_MODE..=MAX_MODE).contains(&level) {
            level
        } else {
            DEFAULT_MODE
        }
    }
}

/// Worst case output size: one control bit per input byte plus a spare byte.
pub fn bound(src_len: usize) -> usize {
    src_len * 9 / 8 + 1
}

// ---------------------------------------------------------------------------
// Encoder
// ---------------------------------------------------------------------------

/// Writes tokens into a caller buffer, reserving control bytes as it goes.
struct TokenWriter<'a> {
    dst: &'a mut [u8],
    pos: usize,
    ctrl_pos: usize,
    ctrl_used: u32,
}

impl<'a> TokenWriter<'a> {
    fn new(dst: &'a mut [u8]) -> Self {
        // ctrl_used == 8 forces a fresh control byte on the first token
        Self { dst, pos: 0, ctrl_pos: 0, ctrl_used: 8 }
    }

    fn overflow(&self, extra: usize) -> CompressionError {
        CompressionError::BufferTooSmall { need: self.pos + extra, have: self.dst.len() }
    }

    fn flag(&mut self, command: bool) -> Result<(), CompressionError> {
        if self.ctrl_used == 8 {
            if self.pos >= self.dst.len() {
                return Err(self.overflow(1));
            }
            self.ctrl_pos = self.pos;
            self.dst[self.pos] = 0;
            self.pos += 1;
            self.ctrl_used = 0;
        }
        if command {
            self.dst[self.ctrl_pos] |= 0x80 >> self.ctrl_used;
        }
        self.ctrl_used += 1;
        Ok(())
    }

    fn put(&mut self, bytes: &[u8]) -> Result<(), CompressionError> {
        let end = self.pos + bytes.len();
        if end > self.dst.len() {
            return Err(self.overflow(bytes.len()));
        }
        self.dst[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }

    fn literal(&mut self, byte: u8) -> Result<(), CompressionError> {
        self.flag(false)?;
        self.put(&[byte])
    }

    fn command(&mut self, cmd: u8, count: usize) -> Result<(), CompressionError> {
        debug_assert!(count <= MAX_COUNT);
        self.flag(true)?;
        self.put(&[(cmd << 4) | (count >> 8) as u8, count as u8])
    }

    fn span(&mut self, bytes: &[u8]) -> Result<(), CompressionError> {
        self.command(CMD_SPAN, bytes.len() - MIN_SPAN)?;
        self.put(bytes)
    }

    fn run(&mut self, len: usize) -> Result<(), CompressionError> {
        self.command(CMD_RUN, len - MIN_RUN)
    }

    fn back_reference(&mut self, distance: usize, len: usize) -> Result<(), CompressionError> {
        let count = distance - len;
        if len <= MAX_SHORT_MATCH {
            self.command(len as u8, count)
        } else {
            self.command(CMD_LONG, count)?;
            self.put(&[(len - MIN_LONG_MATCH) as u8])
        }
    }

    /// Emit bytes no token covered: spans while long enough, then literals.
    fn pending(&mut self, mut bytes: &[u8]) -> Result<(), CompressionError> {
        while bytes.len() >= SPAN_THRESHOLD {
            let take = bytes.len().min(MAX_SPAN);
            self.span(&bytes[..take])?;
            bytes = &bytes[take..];
        }
        for &b in bytes {
            self.literal(b)?;
        }
        Ok(())
    }

    fn finish(self) -> usize {
        self.pos
    }
}

/// Bucketed table of recent positions keyed by a 2-byte hash.
/// Each bucket keeps `depth` entries, newest first.
struct MatchTable {
    slots: Vec<usize>,
    depth: usize,
}

impl MatchTable {
    fn new(mode: i32) -> Result<Self, CompressionError> {
        let depth = 1usize << mode;
        let len = HASH_LEN * depth;
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(len)
            .map_err(|_| CompressionError::AllocationFailure {
                requested: len * std::mem::size_of::<usize>(),
            })?;
        slots.resize(len, EMPTY);
        Ok(Self { slots, depth })
    }

    #[inline]
    fn hash(a: u8, b: u8) -> usize {
        (((a as usize) << 4) ^ b as usize) & (HASH_LEN - 1)
    }

    /// Record `pos` and return the longest usable earlier match as
    /// `(distance, len)`.
    fn insert_and_find(&mut self, src: &[u8], pos: usize) -> Option<(usize, usize)> {
        let base = Self::hash(src[pos], src[pos + 1]) * self.depth;
        let bucket = &mut self.slots[base..base + self.depth];

        let mut best: Option<(usize, usize)> = None;
        let mut carried = pos;
        for slot in bucket.iter_mut() {
            let candidate = std::mem::replace(slot, carried);
            carried = candidate;
            if candidate == EMPTY {
                break;
            }

            let distance = pos - candidate;
            // older entries only get further away
            if distance > MAX_COUNT + MAX_LONG_MATCH {
                break;
            }

            let limit = (src.len() - pos).min(MAX_LONG_MATCH).min(distance);
            let len = src[candidate..candidate + limit]
                .iter()
                .zip(&src[pos..pos + limit])
                .take_while(|(a, b)| a == b)
                .count();

            if len < MIN_MATCH || distance - len > MAX_COUNT {
                continue;
            }
            if best.map_or(true, |(_, best_len)| len > best_len) {
                best = Some((distance, len));
            }
        }
        best
    }
}

/// Length of the run of `prev` starting at `pos`, capped at `MAX_RUN`.
fn run_length(src: &[u8], pos: usize, prev: u8) -> usize {
    src[pos..]
        .iter()
        .take(MAX_RUN)
        .take_while(|&&b| b == prev)
        .count()
}

/// Compress `src` into `dst` with the given search `mode` (0..=8).
///
/// Output always fits in `bound(src.len())`; a smaller `dst` may yield
/// `BufferTooSmall`, never a truncated stream.
pub fn compress_into(src: &[u8], dst: &mut [u8], mode: i32)
    -> Result<usize, CompressionError>
{
    if !(MIN_MODE..=MAX_MODE).contains(&mode) {
        return Err(CompressionError::UnsupportedMode { mode });
    }

    let mut table = MatchTable::new(mode)?;
    let mut out = TokenWriter::new(dst);
    let mut pending_start = 0;
    let mut pos = 0;

    while pos < src.len() {
        if pos > 0 {
            let run = run_length(src, pos, src[pos - 1]);
            if run >= MIN_RUN {
                out.pending(&src[pending_start..pos])?;
                out.run(run)?;
                pos += run;
                pending_start = pos;
                continue;
            }
        }

        if src.len() - pos >= MIN_MATCH {
            if let Some((distance, len)) = table.insert_and_find(src, pos) {
                out.pending(&src[pending_start..pos])?;
                out.back_reference(distance, len)?;
                pos += len;
                pending_start = pos;
                continue;
            }
        }

        pos += 1;
    }
    out.pending(&src[pending_start..])?;

    let written = out.finish();
    trace!("ndsc: {} -> {} bytes (mode {})", src.len(), written, mode);
    Ok(written)
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// Decompress `src` into exactly `dst.len()` bytes.
///
/// Every copy is checked against both buffers before it runs. The stream
/// must be consumed completely and fill `dst` exactly.
pub fn decompress_into(src: &[u8], dst: &mut [u8]) -> Result<usize, CompressionError> {
    let mut ip = 0;
    let mut op = 0;
    let mut ctrl = 0u8;
    let mut mask = 0u8;

    while ip < src.len() {
        if op >= dst.len() {
            return Err(CompressionError::corrupt(format!(
                "output full with {} input bytes left", src.len() - ip
            )));
        }

        if mask == 0 {
            ctrl = src[ip];
            ip += 1;
            mask = 0x80;
        }
        let is_command = ctrl & mask != 0;
        mask >>= 1;

        if !is_command {
            let byte = *src.get(ip)
                .ok_or_else(|| CompressionError::corrupt("literal past end of input"))?;
            dst[op] = byte;
            ip += 1;
            op += 1;
            continue;
        }

        if ip + 2 > src.len() {
            return Err(CompressionError::corrupt("truncated command"));
        }
        let cmd = src[ip] >> 4;
        let count = (((src[ip] & 0x0F) as usize) << 8) | src[ip + 1] as usize;
        ip += 2;

        match cmd {
            CMD_SPAN => {
                let len = count + MIN_SPAN;
                if ip + len > src.len() || op + len > dst.len() {
                    return Err(CompressionError::corrupt(format!(
                        "span of {} bytes out of range", len
                    )));
                }
                dst[op..op + len].copy_from_slice(&src[ip..ip + len]);
                ip += len;
                op += len;
            }
            CMD_RUN => {
                let len = count + MIN_RUN;
                if op == 0 || op + len > dst.len() {
                    return Err(CompressionError::corrupt(format!(
                        "run of {} bytes out of range at {}", len, op
                    )));
                }
                let byte = dst[op - 1];
                dst[op..op + len].fill(byte);
                op += len;
            }
            _ => {
                let len = if cmd == CMD_LONG {
                    let extra = *src.get(ip)
                        .ok_or_else(|| CompressionError::corrupt("truncated long reference"))?;
                    ip += 1;
                    extra as usize + MIN_LONG_MATCH
                } else {
                    cmd as usize
                };
                copy_back_reference(dst, op, count + len, len)?;
                op += len;
            }
        }
    }

    if op != dst.len() {
        return Err(CompressionError::corrupt(format!(
            "decoded {} bytes, expected {}", op, dst.len()
        )));
    }
    Ok(op)
}

fn copy_back_reference(dst: &mut [u8], op: usize, distance: usize, len: usize)
    -> Result<(), CompressionError>
{
    if distance > op || op + len > dst.len() {
        return Err(CompressionError::corrupt(format!(
            "reference {} back for {} bytes at {} out of range", distance, len, op
        )));
    }
    let from = op - distance;
    dst.copy_within(from..from + len, op);
    Ok(())
}

impl PageCodec for NdscCodec {
    fn bound(&self, src_len: usize) -> usize {
        bound(src_len)
    }

    fn compress(&self, state: &mut CodecState, src: &[u8], dst: &mut [u8])
        -> Result<usize, CompressionError>
    {
        compress_into(src, dst, Self::mode_for_level(state.level))
    }

    fn decompress(&self, _state: &mut CodecState, src: &[u8], dst: &mut [u8])
        -> Result<usize, CompressionError>
    {
        decompress_into(src, dst)
    }
}

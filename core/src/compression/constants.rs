//! compression/constants.rs
//! Format limits and default levels for the page codecs.

/// BSR: size of the big-endian offset header.
pub const BSR_HEADER_LEN: usize = 2;
/// BSR: largest offset the 2-byte header can address.
pub const BSR_MAX_OFFSET: usize = u16::MAX as usize;

/// NDSC format limits (see `codecs::ndsc` for the grammar).
pub mod ndsc {
    /// Hash buckets per table page (power of two).
    pub const HASH_LEN: usize = 4096;

    pub const MIN_MODE: i32     = 0;
    pub const DEFAULT_MODE: i32 = 4;
    pub const MAX_MODE: i32     = 8;

    /// Command nibbles.
    pub const CMD_SPAN: u8  = 0;
    pub const CMD_RUN: u8   = 1;
    pub const CMD_LONG: u8  = 2;

    /// 12-bit count field.
    pub const MAX_COUNT: usize = 0x0FFF;

    pub const MIN_MATCH: usize       = 3;
    pub const MAX_SHORT_MATCH: usize = 15;
    pub const MIN_LONG_MATCH: usize  = 16;
    pub const MAX_LONG_MATCH: usize  = 255 + MIN_LONG_MATCH;

    pub const MIN_RUN: usize = 3;
    pub const MAX_RUN: usize = MAX_COUNT + MIN_RUN;

    pub const MIN_SPAN: usize = 16;
    pub const MAX_SPAN: usize = MAX_COUNT + MIN_SPAN;

    /// Pending literals shorter than this are emitted one by one.
    pub const SPAN_THRESHOLD: usize = MIN_SPAN + 1;
}

/// zlib: accepted explicit levels; anything else uses the engine default.
pub const ZLIB_MIN_LEVEL: i32 = 0;
pub const ZLIB_MAX_LEVEL: i32 = 9;

/// lz4hc: accepted explicit levels and the fallback.
pub const LZ4HC_MIN_LEVEL: i32     = 1;
pub const LZ4HC_MAX_LEVEL: i32     = 12;
pub const LZ4HC_DEFAULT_LEVEL: i32 = 9;

/// LZ4 refuses inputs above this size.
pub const LZ4_MAX_INPUT_SIZE: usize = 0x7E00_0000;

//! constants.rs
//! Stable names and parameter keys shared by the registry, codecs and crypto.

/// Algorithm names, persisted verbatim into the database header.
/// Matching is exact and case-sensitive.
pub mod algorithm_names {
    pub const ZLIB: &str     = "zlib";
    pub const LZ4: &str      = "lz4";
    pub const LZ4HC: &str    = "lz4hc";
    pub const NDSC: &str     = "ndsc";
    pub const NDSC_MUX: &str = "ndsc-mux";
    pub const BSR: &str      = "bsr";
}

/// URI query parameters consumed at open time.
pub mod uri_keys {
    /// Algorithm name, consulted only when the file has no stored header.
    pub const ALGORITHM: &str = "zv";
    /// Presence enables AES-128 prefix encryption.
    pub const PASSWORD: &str  = "password";
    /// Codec specific compression level.
    pub const LEVEL: &str     = "level";
}

/// Level value meaning "codec default".
pub const LEVEL_UNSET: i32 = -1;

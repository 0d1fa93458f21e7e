//! params.rs
//! URI query parameters consumed at open time.
//!
//! The host owns URI parsing; codecs only need a lookup. `QueryParams` is a
//! small reader for `file:` URIs and `HashMap<String, String>` works for
//! hosts that already split their parameters.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{uri_keys, LEVEL_UNSET};

/// Read access to the query parameters of the file being opened.
pub trait UriParams {
    fn parameter(&self, key: &str) -> Option<&str>;

    /// Signed integer parameter, decimal or `0x` hex. Missing or
    /// unparsable values yield `default`.
    fn int64(&self, key: &str, default: i64) -> i64 {
        self.parameter(key).and_then(parse_i64).unwrap_or(default)
    }
}

fn parse_i64(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let magnitude = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<i64>().ok()?,
    };
    Some(if negative { -magnitude } else { magnitude })
}

/// Query parameters split out of a `file:` URI.
///
/// Keys and values are percent-decoded; the first occurrence of a key wins.
/// A file name without `?` has no parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(file_name: &str) -> Self {
        let query = match file_name.split_once('?') {
            Some((_, q)) => q,
            None => return Self::default(),
        };
        let query = query.split('#').next().unwrap_or("");

        let pairs = query
            .split('&')
            .filter(|p| !p.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((k, v)) => (percent_decode(k), percent_decode(v)),
                None => (percent_decode(pair), String::new()),
            })
            .collect();

        Self { pairs }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl UriParams for QueryParams {
    fn parameter(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl UriParams for HashMap<String, String> {
    fn parameter(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

fn percent_decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(b) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(b);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// The three values a connection is opened with.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenParams {
    /// `zv`: algorithm for a database without a stored header.
    pub algorithm: Option<String>,
    /// `password`: enables AES prefix encryption when present.
    pub password: Option<String>,
    /// `level`: codec specific, `-1` for the codec default.
    pub level: i32,
}

impl OpenParams {
    pub fn from_uri(params: &dyn UriParams) -> Self {
        Self {
            algorithm: params.parameter(uri_keys::ALGORITHM).map(str::to_owned),
            password: params.parameter(uri_keys::PASSWORD).map(str::to_owned),
            level: params.int64(uri_keys::LEVEL, LEVEL_UNSET as i64) as i32,
        }
    }
}

impl fmt::Debug for OpenParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenParams")
            .field("algorithm", &self.algorithm)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("level", &self.level)
            .finish()
    }
}

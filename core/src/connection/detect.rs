//! connection/detect.rs
//! Decide, at open time, whether a connection is compressed and with what.

use log::debug;

use crate::compression::registry::lookup;
use crate::connection::context::ConnectionContext;
use crate::constants::{uri_keys, LEVEL_UNSET};
use crate::params::{QueryParams, UriParams};
use crate::types::PageCodecError;

/// Outcome of `detect`.
#[derive(Debug)]
pub enum Detection<H = ()> {
    /// No known algorithm; the host stores pages untouched.
    PassThrough,
    Engaged(ConnectionContext<H>),
}

impl<H> Detection<H> {
    pub fn is_pass_through(&self) -> bool {
        matches!(self, Detection::PassThrough)
    }

    /// Header name to persist, `None` on pass-through.
    pub fn header_name(&self) -> Option<&'static str> {
        match self {
            Detection::PassThrough => None,
            Detection::Engaged(ctx) => Some(ctx.header_name()),
        }
    }

    pub fn into_context(self) -> Option<ConnectionContext<H>> {
        match self {
            Detection::PassThrough => None,
            Detection::Engaged(ctx) => Some(ctx),
        }
    }
}

/// Parse the query of `file_name` and run `detect_with_params`.
pub fn detect<H>(
    host: H,
    file_name: &str,
    stored_header: Option<&str>,
) -> Result<Detection<H>, PageCodecError> {
    let params = QueryParams::parse(file_name);
    detect_with_params(host, &params, stored_header)
}

/// A stored header name always wins over the `zv` parameter. Unknown names
/// (lookup is exact and case sensitive) mean pass-through, not an error.
pub fn detect_with_params<H>(
    host: H,
    params: &dyn UriParams,
    stored_header: Option<&str>,
) -> Result<Detection<H>, PageCodecError> {
    let requested = stored_header.or_else(|| params.parameter(uri_keys::ALGORITHM));

    let descriptor = match requested.and_then(lookup) {
        Some(d) => d,
        None => {
            debug!("no page codec for {:?}, passing through", requested);
            return Ok(Detection::PassThrough);
        }
    };

    let level = params.int64(uri_keys::LEVEL, LEVEL_UNSET as i64);
    let level = i32::try_from(level).unwrap_or(LEVEL_UNSET);

    let mut ctx = ConnectionContext::new(host, descriptor, level);
    ctx.setup(params)?;
    Ok(Detection::Engaged(ctx))
}

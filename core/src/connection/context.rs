//! connection/context.rs
//! Per-connection codec context.
//!
//! One context per open database connection, never shared. It owns the
//! codec state, the optional cipher and its counters. Calls take `&mut self`,
//! so the borrow checker enforces the "one call in flight" rule.

use log::{debug, trace, warn};

use crate::compression::registry::CodecDescriptor;
use crate::compression::types::{CodecState, PageCodec};
use crate::crypto::{covered_len, AesPageCipher};
use crate::params::UriParams;
use crate::telemetry::{TelemetryCounters, TelemetrySnapshot};
use crate::types::PageCodecError;

pub struct ConnectionContext<H = ()> {
    host: H,
    descriptor: &'static CodecDescriptor,
    state: CodecState,
    crypto: Option<AesPageCipher>,
    counters: TelemetryCounters,
    torn_down: bool,
}

impl<H> ConnectionContext<H> {
    pub(crate) fn new(host: H, descriptor: &'static CodecDescriptor, level: i32) -> Self {
        Self {
            host,
            descriptor,
            state: CodecState::new(level),
            crypto: None,
            counters: TelemetryCounters::default(),
            torn_down: false,
        }
    }

    /// Crypto setup, then compression setup, then decompression setup.
    ///
    /// On failure the hooks that already succeeded are cleaned up and the
    /// context is marked torn down; the caller drops it.
    pub(crate) fn setup(&mut self, params: &dyn UriParams) -> Result<(), PageCodecError> {
        let codec = &self.descriptor.codec;

        if self.descriptor.encryption {
            self.crypto = AesPageCipher::from_params(params);
        }

        if let Err(e) = codec.compress_setup(&mut self.state, params) {
            warn!("{}: compression setup failed: {}", self.descriptor.name, e);
            self.crypto = None;
            self.torn_down = true;
            return Err(e.into());
        }

        if let Err(e) = codec.decompress_setup(&mut self.state, params) {
            warn!("{}: decompression setup failed: {}", self.descriptor.name, e);
            if let Err(e) = codec.compress_cleanup(&mut self.state) {
                warn!("{}: compression cleanup failed: {}", self.descriptor.name, e);
            }
            self.crypto = None;
            self.torn_down = true;
            return Err(e.into());
        }

        debug!(
            "{}: context ready (level {}, encrypted {})",
            self.descriptor.name, self.state.level, self.crypto.is_some()
        );
        Ok(())
    }

    /// Name to persist in the database header.
    pub fn header_name(&self) -> &'static str {
        self.descriptor.name
    }

    pub fn descriptor(&self) -> &'static CodecDescriptor {
        self.descriptor
    }

    /// Opaque host context supplied at detect time.
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn level(&self) -> i32 {
        self.state.level
    }

    pub fn is_encrypted(&self) -> bool {
        self.crypto.is_some()
    }

    /// Largest stored size `compress` can produce for `src_len` bytes.
    pub fn bound(&self, src_len: usize) -> usize {
        self.descriptor.bound(src_len)
    }

    /// Compress one page into `dst`, then encrypt the stored prefix in place.
    pub fn compress(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize, PageCodecError> {
        let written = match self.descriptor.codec.compress(&mut self.state, src, dst) {
            Ok(n) => n,
            Err(e) => {
                self.counters.add_failure();
                debug!("{}: compress of {} bytes failed: {}", self.descriptor.name, src.len(), e);
                return Err(e.into());
            }
        };

        let enciphered = match &self.crypto {
            Some(cipher) => cipher.encrypt_in_place(&mut dst[..written]),
            None => 0,
        };

        self.counters.add_compress(src.len(), written, enciphered);
        trace!("{}: page {} -> {} bytes", self.descriptor.name, src.len(), written);
        Ok(written)
    }

    /// Compress into a fresh buffer sized by `bound`.
    pub fn compress_to_vec(&mut self, src: &[u8]) -> Result<Vec<u8>, PageCodecError> {
        let mut out = vec![0u8; self.bound(src.len())];
        let written = self.compress(src, &mut out)?;
        out.truncate(written);
        Ok(out)
    }

    /// Decrypt a private copy of `src` (if keyed) and decompress it into
    /// `dst`, which must be sized to the expected page length. `src` is
    /// never modified.
    pub fn decompress(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize, PageCodecError> {
        let (input, enciphered) = match self.crypto.as_mut() {
            Some(cipher) => match cipher.decrypt_staged(src) {
                Ok(staged) => (staged, covered_len(src.len())),
                Err(e) => {
                    self.counters.add_failure();
                    return Err(e.into());
                }
            },
            None => (src, 0),
        };

        match self.descriptor.codec.decompress(&mut self.state, input, dst) {
            Ok(n) => {
                self.counters.add_decompress(src.len(), n, enciphered);
                trace!("{}: page {} -> {} bytes", self.descriptor.name, src.len(), n);
                Ok(n)
            }
            Err(e) => {
                self.counters.add_failure();
                debug!("{}: decompress of {} bytes failed: {}", self.descriptor.name, src.len(), e);
                Err(e.into())
            }
        }
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::from(self.descriptor.name, self.crypto.is_some(), &self.counters)
    }

    /// Compression cleanup, decompression cleanup, crypto cleanup, release.
    /// Hook failures are logged only; close always succeeds.
    pub fn close(mut self) -> Result<(), PageCodecError> {
        self.teardown();
        Ok(())
    }

    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        let codec = &self.descriptor.codec;
        if let Err(e) = codec.compress_cleanup(&mut self.state) {
            warn!("{}: compression cleanup failed: {}", self.descriptor.name, e);
        }
        if let Err(e) = codec.decompress_cleanup(&mut self.state) {
            warn!("{}: decompression cleanup failed: {}", self.descriptor.name, e);
        }
        self.crypto = None;

        debug!(
            "{}: closed after {} compressed / {} decompressed pages",
            self.descriptor.name, self.counters.pages_compressed, self.counters.pages_decompressed
        );
    }
}

impl<H> Drop for ConnectionContext<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<H> std::fmt::Debug for ConnectionContext<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionContext")
            .field("algorithm", &self.descriptor.name)
            .field("state", &self.state)
            .field("encrypted", &self.crypto.is_some())
            .finish_non_exhaustive()
    }
}

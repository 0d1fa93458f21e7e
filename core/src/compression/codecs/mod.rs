//! compression/codecs/mod.rs
//! Page codecs and the closed set of variants the registry can hand out.

pub mod bsr;
pub mod ndsc;
#[cfg(feature = "lz4")]
pub mod lz4;
#[cfg(feature = "zlib")]
pub mod zlib;

pub use bsr::BsrCodec;
pub use ndsc::NdscCodec;
#[cfg(feature = "lz4")]
pub use self::lz4::Lz4Codec;
#[cfg(feature = "zlib")]
pub use zlib::ZlibCodec;

use crate::compression::types::{CodecState, CompressionError, PageCodec};
use crate::params::UriParams;

/// Every codec a descriptor can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Bsr(BsrCodec),
    Ndsc(NdscCodec),
    #[cfg(feature = "zlib")]
    Zlib(ZlibCodec),
    #[cfg(feature = "lz4")]
    Lz4(Lz4Codec),
}

impl Codec {
    fn inner(&self) -> &dyn PageCodec {
        match self {
            Codec::Bsr(c) => c,
            Codec::Ndsc(c) => c,
            #[cfg(feature = "zlib")]
            Codec::Zlib(c) => c,
            #[cfg(feature = "lz4")]
            Codec::Lz4(c) => c,
        }
    }
}

impl PageCodec for Codec {
    fn bound(&self, src_len: usize) -> usize {
        self.inner().bound(src_len)
    }

    fn compress(&self, state: &mut CodecState, src: &[u8], dst: &mut [u8])
        -> Result<usize, CompressionError>
    {
        self.inner().compress(state, src, dst)
    }

    fn decompress(&self, state: &mut CodecState, src: &[u8], dst: &mut [u8])
        -> Result<usize, CompressionError>
    {
        self.inner().decompress(state, src, dst)
    }

    fn compress_setup(&self, state: &mut CodecState, params: &dyn UriParams)
        -> Result<(), CompressionError>
    {
        self.inner().compress_setup(state, params)
    }

    fn compress_cleanup(&self, state: &mut CodecState) -> Result<(), CompressionError> {
        self.inner().compress_cleanup(state)
    }

    fn decompress_setup(&self, state: &mut CodecState, params: &dyn UriParams)
        -> Result<(), CompressionError>
    {
        self.inner().decompress_setup(state, params)
    }

    fn decompress_cleanup(&self, state: &mut CodecState) -> Result<(), CompressionError> {
        self.inner().decompress_cleanup(state)
    }
}

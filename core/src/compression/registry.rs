//! compression/registry.rs
//! Codec descriptors and name resolution.

use crate::compression::codecs::{BsrCodec, Codec, NdscCodec};
#[cfg(feature = "lz4")]
use crate::compression::codecs::Lz4Codec;
#[cfg(feature = "zlib")]
use crate::compression::codecs::ZlibCodec;
use crate::compression::types::PageCodec;
use crate::constants::algorithm_names;

/// Immutable, process-wide description of one named algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecDescriptor {
    /// Unique key, written into the database header.
    pub name: &'static str,
    pub codec: Codec,
    /// Whether a `password` parameter turns on AES prefix encryption.
    pub encryption: bool,
}

impl CodecDescriptor {
    pub fn bound(&self, src_len: usize) -> usize {
        self.codec.bound(src_len)
    }
}

/// All algorithms compiled into this build, in lookup order.
pub static REGISTRY: &[CodecDescriptor] = &[
    #[cfg(feature = "zlib")]
    CodecDescriptor {
        name: algorithm_names::ZLIB,
        codec: Codec::Zlib(ZlibCodec),
        encryption: true,
    },
    #[cfg(feature = "lz4")]
    CodecDescriptor {
        name: algorithm_names::LZ4,
        codec: Codec::Lz4(Lz4Codec::fast()),
        encryption: true,
    },
    #[cfg(feature = "lz4")]
    CodecDescriptor {
        name: algorithm_names::LZ4HC,
        codec: Codec::Lz4(Lz4Codec::high()),
        encryption: true,
    },
    CodecDescriptor {
        name: algorithm_names::NDSC,
        codec: Codec::Ndsc(NdscCodec),
        encryption: true,
    },
    // same codec under an alternative header name
    CodecDescriptor {
        name: algorithm_names::NDSC_MUX,
        codec: Codec::Ndsc(NdscCodec),
        encryption: true,
    },
    CodecDescriptor {
        name: algorithm_names::BSR,
        codec: Codec::Bsr(BsrCodec),
        encryption: true,
    },
];

/// Exact, case-sensitive lookup.
pub fn lookup(name: &str) -> Option<&'static CodecDescriptor> {
    REGISTRY.iter().find(|d| d.name == name)
}

pub fn algorithm_names() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|d| d.name)
}

//! crypto/page_cipher.rs
//! AES-128 ECB over the first blocks of a compressed page.
//!
//! Design notes:
//! - The key is the password bytes, zero padded or truncated to 16 bytes.
//!   There is no salt and no key derivation.
//! - Only `min(4, n / 16)` leading blocks are transformed; everything from
//!   `16 * min(4, n / 16)` on is left as is. At most 64 bytes of a page are
//!   ever enciphered, so this hides page headers, not page contents.
//! - Encryption runs in place on the codec's own output. Decryption never
//!   touches the caller's buffer: it works on a private staging copy.

use std::fmt;

use ::aes::cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit};
use ::aes::{Aes128Dec, Aes128Enc};

use crate::constants::uri_keys;
use crate::crypto::types::{CryptoError, BLOCK_LEN, KEY_LEN_16, MAX_BLOCKS};
use crate::params::UriParams;

/// Number of leading bytes the cipher transforms in a buffer of `len` bytes.
#[inline]
pub fn covered_len(len: usize) -> usize {
    BLOCK_LEN * (len / BLOCK_LEN).min(MAX_BLOCKS)
}

/// Build the 16-byte key from a password.
///
/// Bytes are taken left to right up to the first NUL; the rest of the key
/// is zero.
pub fn key_from_password(password: &[u8]) -> [u8; KEY_LEN_16] {
    let mut key = [0u8; KEY_LEN_16];
    for (slot, &b) in key.iter_mut().zip(password.iter().take_while(|&&b| b != 0)) {
        *slot = b;
    }
    key
}

/// Per-connection cipher state: both key schedules plus the staging buffer.
pub struct AesPageCipher {
    encrypt: Aes128Enc,
    decrypt: Aes128Dec,
    staging: Vec<u8>,
}

impl AesPageCipher {
    pub fn new(key: &[u8; KEY_LEN_16]) -> Self {
        let key = GenericArray::from_slice(key);
        Self {
            encrypt: Aes128Enc::new(key),
            decrypt: Aes128Dec::new(key),
            staging: Vec::new(),
        }
    }

    pub fn from_password(password: &str) -> Self {
        Self::new(&key_from_password(password.as_bytes()))
    }

    /// Cipher for the connection, or `None` when no `password` was given.
    pub fn from_params(params: &dyn UriParams) -> Option<Self> {
        params.parameter(uri_keys::PASSWORD).map(Self::from_password)
    }

    /// Encrypt the covered prefix of `buf` in place; returns its length.
    pub fn encrypt_in_place(&self, buf: &mut [u8]) -> usize {
        let covered = covered_len(buf.len());
        for block in buf[..covered].chunks_exact_mut(BLOCK_LEN) {
            self.encrypt.encrypt_block(GenericArray::from_mut_slice(block));
        }
        covered
    }

    /// Decrypt the covered prefix of `buf` in place; returns its length.
    pub fn decrypt_in_place(&self, buf: &mut [u8]) -> usize {
        let covered = covered_len(buf.len());
        for block in buf[..covered].chunks_exact_mut(BLOCK_LEN) {
            self.decrypt.decrypt_block(GenericArray::from_mut_slice(block));
        }
        covered
    }

    /// Copy `src` into the staging buffer, decrypt the copy and lend it out.
    /// The buffer only ever grows and is reused across pages.
    pub fn decrypt_staged(&mut self, src: &[u8]) -> Result<&[u8], CryptoError> {
        if self.staging.len() < src.len() {
            let extra = src.len() - self.staging.len();
            self.staging
                .try_reserve_exact(extra)
                .map_err(|_| CryptoError::AllocationFailure { requested: src.len() })?;
            self.staging.resize(src.len(), 0);
        }

        let staged = &mut self.staging[..src.len()];
        staged.copy_from_slice(src);
        let covered = covered_len(staged.len());
        for block in staged[..covered].chunks_exact_mut(BLOCK_LEN) {
            self.decrypt.decrypt_block(GenericArray::from_mut_slice(block));
        }
        Ok(&self.staging[..src.len()])
    }

    /// Current size of the staging buffer.
    pub fn staging_capacity(&self) -> usize {
        self.staging.len()
    }
}

impl fmt::Debug for AesPageCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AesPageCipher")
            .field("staging", &self.staging.len())
            .finish_non_exhaustive()
    }
}

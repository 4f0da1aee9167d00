//! Key material for the segment stream cipher.

use std::fmt;

use zeroize::Zeroizing;

use crate::error::CipherError;

/// AES variant selected by the key length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySize {
    /// 16-byte key
    Aes128,
    /// 24-byte key
    Aes192,
    /// 32-byte key
    Aes256,
}

impl KeySize {
    /// Select the AES variant for a key of `len` bytes.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength` for anything but 16, 24 or 32
    pub fn from_len(len: usize) -> Result<Self, CipherError> {
        match len {
            16 => Ok(Self::Aes128),
            24 => Ok(Self::Aes192),
            32 => Ok(Self::Aes256),
            actual => Err(CipherError::InvalidKeyLength { actual }),
        }
    }

    /// Key length in bytes.
    pub fn key_len(self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes192 => 24,
            Self::Aes256 => 32,
        }
    }
}

/// Validated AES key, zeroized on drop.
///
/// Static contact secrets and block-derived ephemeral keys both end up here.
/// The length is checked once at construction so encryption never has to
/// coerce a key.
#[derive(Clone)]
pub struct CipherKey {
    bytes: Zeroizing<Vec<u8>>,
    size: KeySize,
}

impl CipherKey {
    /// Build a key from raw bytes, copying them.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength` if the length is not an AES key length
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CipherError> {
        Self::from_vec(bytes.to_vec())
    }

    /// Build a key taking ownership of the buffer.
    ///
    /// The buffer is zeroized even when it is rejected.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength` if the length is not an AES key length
    pub fn from_vec(bytes: Vec<u8>) -> Result<Self, CipherError> {
        let bytes = Zeroizing::new(bytes);
        let size = KeySize::from_len(bytes.len())?;
        Ok(Self { bytes, size })
    }

    /// AES variant of this key.
    pub fn size(&self) -> KeySize {
        self.size
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherKey").field("size", &self.size).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_aes_lengths() {
        for (len, size) in [(16, KeySize::Aes128), (24, KeySize::Aes192), (32, KeySize::Aes256)] {
            let key = CipherKey::from_bytes(&vec![7u8; len]).unwrap();
            assert_eq!(key.size(), size);
            assert_eq!(key.size().key_len(), len);
            assert_eq!(key.as_bytes().len(), len);
        }
    }

    #[test]
    fn rejects_other_lengths() {
        for len in [0, 1, 15, 17, 31, 33, 64] {
            assert_eq!(
                CipherKey::from_bytes(&vec![7u8; len]).unwrap_err(),
                CipherError::InvalidKeyLength { actual: len }
            );
        }
    }

    #[test]
    fn debug_does_not_leak_key() {
        let key = CipherKey::from_bytes(&[0xAB; 16]).unwrap();
        let rendered = format!("{key:?}");

        assert!(rendered.contains("Aes128"));
        assert!(!rendered.contains("171"));
        assert!(!rendered.to_lowercase().contains("ab"));
    }
}

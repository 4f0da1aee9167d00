//! Segment encryption with AES in full-block CFB mode
//!
//! A segment is `IV || ciphertext`. CFB turns AES into a self-synchronizing
//! stream cipher, so ciphertext length equals plaintext length and there is
//! no padding. There is no authentication tag: flipping a ciphertext bit
//! flips the same plaintext bit and garbles the following block, it does not
//! produce an error.
//!
//! Functions are pure; the caller supplies the IV. A key/IV pair must never
//! encrypt two different plaintexts.

use aes::{Aes128, Aes192, Aes256};
use cfb_mode::{
    Decryptor, Encryptor,
    cipher::{AsyncStreamCipher, KeyIvInit},
};

use crate::{
    error::CipherError,
    key::{CipherKey, KeySize},
};

/// IV length (one AES block)
pub const IV_SIZE: usize = 16;

#[derive(Clone, Copy)]
enum Direction {
    Encrypt,
    Decrypt,
}

/// Encrypt `plaintext` into an `IV || ciphertext` segment.
///
/// # Errors
///
/// - `InvalidKeyLength` if the cipher rejects the key (cannot happen for a
///   validated [`CipherKey`])
pub fn encrypt_segment(
    key: &CipherKey,
    iv: [u8; IV_SIZE],
    plaintext: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let mut segment = Vec::with_capacity(IV_SIZE + plaintext.len());
    segment.extend_from_slice(&iv);
    segment.extend_from_slice(plaintext);

    apply_keystream(key, &iv, &mut segment[IV_SIZE..], Direction::Encrypt)?;

    Ok(segment)
}

/// Decrypt an `IV || ciphertext` segment.
///
/// Any key of a valid length "succeeds"; a wrong key yields garbage of the
/// same length.
///
/// # Errors
///
/// - `SegmentTooShort` if the segment cannot contain the IV
pub fn decrypt_segment(key: &CipherKey, segment: &[u8]) -> Result<Vec<u8>, CipherError> {
    let Some((iv, ciphertext)) = segment.split_first_chunk::<IV_SIZE>() else {
        return Err(CipherError::SegmentTooShort { expected: IV_SIZE, actual: segment.len() });
    };

    let mut plaintext = ciphertext.to_vec();
    apply_keystream(key, iv, &mut plaintext, Direction::Decrypt)?;

    Ok(plaintext)
}

/// Run CFB over `buf` in place.
fn apply_keystream(
    key: &CipherKey,
    iv: &[u8; IV_SIZE],
    buf: &mut [u8],
    direction: Direction,
) -> Result<(), CipherError> {
    let bytes = key.as_bytes();
    let invalid = |_| CipherError::InvalidKeyLength { actual: bytes.len() };

    match (key.size(), direction) {
        (KeySize::Aes128, Direction::Encrypt) => {
            Encryptor::<Aes128>::new_from_slices(bytes, iv).map_err(invalid)?.encrypt(buf);
        },
        (KeySize::Aes128, Direction::Decrypt) => {
            Decryptor::<Aes128>::new_from_slices(bytes, iv).map_err(invalid)?.decrypt(buf);
        },
        (KeySize::Aes192, Direction::Encrypt) => {
            Encryptor::<Aes192>::new_from_slices(bytes, iv).map_err(invalid)?.encrypt(buf);
        },
        (KeySize::Aes192, Direction::Decrypt) => {
            Decryptor::<Aes192>::new_from_slices(bytes, iv).map_err(invalid)?.decrypt(buf);
        },
        (KeySize::Aes256, Direction::Encrypt) => {
            Encryptor::<Aes256>::new_from_slices(bytes, iv).map_err(invalid)?.encrypt(buf);
        },
        (KeySize::Aes256, Direction::Decrypt) => {
            Decryptor::<Aes256>::new_from_slices(bytes, iv).map_err(invalid)?.decrypt(buf);
        },
    }

    Ok(())
}

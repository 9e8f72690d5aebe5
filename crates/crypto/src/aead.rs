//! Detached ChaCha20-Poly1305 authenticated encryption (IETF variant).
//!
//! The authentication tag travels separately from the ciphertext, which
//! is the layout the guest boundary exposes: the host allocates the
//! ciphertext buffer at exactly the plaintext length and a fixed 16-byte
//! tag field next to it.
//!
//! Decryption failure scrubs the output buffer before returning, so a
//! caller that ignores the status can never read attacker-controlled
//! bytes out of it.

use chacha20poly1305::aead::{AeadInPlace, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce, Tag};
use thiserror::Error;
use tracing::debug;
use zeroize::Zeroize;

pub const KEY_LEN: usize = 32;
pub const NONCE_LEN: usize = 12;
pub const TAG_LEN: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AeadError {
    #[error("input and output buffers differ in length")]
    LengthMismatch,

    #[error("message too long for a single AEAD invocation")]
    MessageTooLong,

    #[error("authentication tag verification failed")]
    BadTag,
}

/// Encrypts `plaintext` into `ciphertext` and returns the detached tag.
///
/// The two buffers must have the same length and may not overlap. The
/// nonce must never repeat under the same key; nonce discipline is the
/// caller's contract.
pub fn encrypt_detached(
    ciphertext: &mut [u8],
    plaintext: &[u8],
    associated_data: &[u8],
    nonce: &[u8; NONCE_LEN],
    key: &[u8; KEY_LEN],
) -> Result<[u8; TAG_LEN], AeadError> {
    if ciphertext.len() != plaintext.len() {
        return Err(AeadError::LengthMismatch);
    }
    ciphertext.copy_from_slice(plaintext);

    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    let tag = cipher
        .encrypt_in_place_detached(Nonce::from_slice(nonce), associated_data, ciphertext)
        .map_err(|_| AeadError::MessageTooLong)?;

    Ok(tag.into())
}

/// Decrypts `ciphertext` into `plaintext`, verifying the detached tag
/// over the ciphertext and associated data.
///
/// On tag mismatch the plaintext buffer is zeroed and `BadTag` is
/// returned.
pub fn decrypt_detached(
    plaintext: &mut [u8],
    ciphertext: &[u8],
    tag: &[u8; TAG_LEN],
    associated_data: &[u8],
    nonce: &[u8; NONCE_LEN],
    key: &[u8; KEY_LEN],
) -> Result<(), AeadError> {
    if plaintext.len() != ciphertext.len() {
        return Err(AeadError::LengthMismatch);
    }
    plaintext.copy_from_slice(ciphertext);

    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    match cipher.decrypt_in_place_detached(
        Nonce::from_slice(nonce),
        associated_data,
        plaintext,
        Tag::from_slice(tag),
    ) {
        Ok(()) => Ok(()),
        Err(_) => {
            plaintext.zeroize();
            debug!(len = ciphertext.len(), "detached AEAD tag verification failed");
            Err(AeadError::BadTag)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; KEY_LEN] = [0x42; KEY_LEN];
    const NONCE: [u8; NONCE_LEN] = [0x24; NONCE_LEN];

    #[test]
    fn round_trips_with_associated_data() {
        let plaintext = b"detached mode keeps the tag out of the ciphertext";
        let aad = b"header";

        let mut ciphertext = vec![0u8; plaintext.len()];
        let tag = encrypt_detached(&mut ciphertext, plaintext, aad, &NONCE, &KEY).unwrap();
        assert_ne!(&ciphertext[..], &plaintext[..]);

        let mut recovered = vec![0u8; plaintext.len()];
        decrypt_detached(&mut recovered, &ciphertext, &tag, aad, &NONCE, &KEY).unwrap();
        assert_eq!(&recovered[..], &plaintext[..]);
    }

    #[test]
    fn round_trips_empty_message() {
        let mut ciphertext = [0u8; 0];
        let tag = encrypt_detached(&mut ciphertext, b"", b"", &NONCE, &KEY).unwrap();

        let mut recovered = [0u8; 0];
        decrypt_detached(&mut recovered, &ciphertext, &tag, b"", &NONCE, &KEY).unwrap();
    }

    #[test]
    fn tampered_ciphertext_fails_and_scrubs_output() {
        let plaintext = b"secret payload";
        let mut ciphertext = vec![0u8; plaintext.len()];
        let tag = encrypt_detached(&mut ciphertext, plaintext, b"", &NONCE, &KEY).unwrap();

        ciphertext[0] ^= 0x01;

        let mut recovered = vec![0xFFu8; plaintext.len()];
        let err = decrypt_detached(&mut recovered, &ciphertext, &tag, b"", &NONCE, &KEY);
        assert_eq!(err, Err(AeadError::BadTag));
        assert!(recovered.iter().all(|&b| b == 0));
    }

    #[test]
    fn tampered_tag_fails() {
        let plaintext = b"secret payload";
        let mut ciphertext = vec![0u8; plaintext.len()];
        let mut tag = encrypt_detached(&mut ciphertext, plaintext, b"", &NONCE, &KEY).unwrap();

        tag[TAG_LEN - 1] ^= 0x80;

        let mut recovered = vec![0u8; plaintext.len()];
        let err = decrypt_detached(&mut recovered, &ciphertext, &tag, b"", &NONCE, &KEY);
        assert_eq!(err, Err(AeadError::BadTag));
    }

    #[test]
    fn mismatched_associated_data_fails() {
        let plaintext = b"secret payload";
        let mut ciphertext = vec![0u8; plaintext.len()];
        let tag = encrypt_detached(&mut ciphertext, plaintext, b"aad", &NONCE, &KEY).unwrap();

        let mut recovered = vec![0u8; plaintext.len()];
        let err = decrypt_detached(&mut recovered, &ciphertext, &tag, b"dab", &NONCE, &KEY);
        assert_eq!(err, Err(AeadError::BadTag));
    }

    #[test]
    fn wrong_key_fails() {
        let plaintext = b"secret payload";
        let mut ciphertext = vec![0u8; plaintext.len()];
        let tag = encrypt_detached(&mut ciphertext, plaintext, b"", &NONCE, &KEY).unwrap();

        let other_key = [0x43u8; KEY_LEN];
        let mut recovered = vec![0u8; plaintext.len()];
        let err = decrypt_detached(&mut recovered, &ciphertext, &tag, b"", &NONCE, &other_key);
        assert_eq!(err, Err(AeadError::BadTag));
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let mut ciphertext = [0u8; 3];
        assert_eq!(
            encrypt_detached(&mut ciphertext, b"four", b"", &NONCE, &KEY),
            Err(AeadError::LengthMismatch)
        );

        let tag = [0u8; TAG_LEN];
        let mut plaintext = [0u8; 4];
        assert_eq!(
            decrypt_detached(&mut plaintext, &[0u8; 3], &tag, b"", &NONCE, &KEY),
            Err(AeadError::LengthMismatch)
        );
    }
}

//! Ed25519 detached signatures and conversion to X25519 keys.
//!
//! Secret keys use the 64-byte seed-then-public-key layout, so a secret
//! key carries everything needed to re-derive the signing state and the
//! host can treat it as one opaque buffer.
//!
//! Key conversion maps an Ed25519 keypair onto the birationally
//! equivalent Curve25519 form: the public key becomes the Montgomery
//! u-coordinate, the secret key becomes the clamped private scalar.
//! Converted keys interoperate with [`crate::kx`].

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand::{CryptoRng, RngCore};
use thiserror::Error;
use zeroize::Zeroize;

pub const PUBLIC_KEY_LEN: usize = 32;
pub const SECRET_KEY_LEN: usize = 64;
pub const SIGNATURE_LEN: usize = 64;
pub const SEED_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignError {
    #[error("malformed public key")]
    InvalidPublicKey,

    #[error("signature verification failed")]
    BadSignature,
}

/// Generates an Ed25519 keypair, returned as `(public, secret)` with
/// the secret laid out as seed ‖ public key.
pub fn keypair(
    rng: &mut (impl RngCore + CryptoRng),
) -> ([u8; PUBLIC_KEY_LEN], [u8; SECRET_KEY_LEN]) {
    let mut seed = [0u8; SEED_LEN];
    rng.fill_bytes(&mut seed);

    let signing = SigningKey::from_bytes(&seed);
    let public = signing.verifying_key().to_bytes();

    let mut secret = [0u8; SECRET_KEY_LEN];
    secret[..SEED_LEN].copy_from_slice(&seed);
    secret[SEED_LEN..].copy_from_slice(&public);
    seed.zeroize();

    (public, secret)
}

fn signing_key(secret_key: &[u8; SECRET_KEY_LEN]) -> SigningKey {
    let mut seed = [0u8; SEED_LEN];
    seed.copy_from_slice(&secret_key[..SEED_LEN]);
    let key = SigningKey::from_bytes(&seed);
    seed.zeroize();
    key
}

/// Produces a detached 64-byte signature over `message`.
pub fn sign_detached(message: &[u8], secret_key: &[u8; SECRET_KEY_LEN]) -> [u8; SIGNATURE_LEN] {
    signing_key(secret_key).sign(message).to_bytes()
}

/// Verifies a detached signature against `message` and `public_key`.
pub fn verify_detached(
    signature: &[u8; SIGNATURE_LEN],
    message: &[u8],
    public_key: &[u8; PUBLIC_KEY_LEN],
) -> Result<(), SignError> {
    let key = VerifyingKey::from_bytes(public_key).map_err(|_| SignError::InvalidPublicKey)?;
    let signature = Signature::from_bytes(signature);
    key.verify_strict(message, &signature)
        .map_err(|_| SignError::BadSignature)
}

/// Converts an Ed25519 public key to its X25519 form.
pub fn public_to_kx(public_key: &[u8; PUBLIC_KEY_LEN]) -> Result<[u8; 32], SignError> {
    let key = VerifyingKey::from_bytes(public_key).map_err(|_| SignError::InvalidPublicKey)?;
    Ok(key.to_montgomery().to_bytes())
}

/// Converts an Ed25519 secret key to its X25519 form (the clamped
/// private scalar).
pub fn secret_to_kx(secret_key: &[u8; SECRET_KEY_LEN]) -> [u8; 32] {
    signing_key(secret_key).to_scalar_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use x25519_dalek::{x25519, X25519_BASEPOINT_BYTES};

    #[test]
    fn signature_round_trips() {
        let mut rng = rand::thread_rng();
        let (pk, sk) = keypair(&mut rng);

        let message = b"immutable ledger block";
        let signature = sign_detached(message, &sk);
        verify_detached(&signature, message, &pk).unwrap();
    }

    #[test]
    fn empty_message_round_trips() {
        let mut rng = rand::thread_rng();
        let (pk, sk) = keypair(&mut rng);

        let signature = sign_detached(b"", &sk);
        verify_detached(&signature, b"", &pk).unwrap();
    }

    #[test]
    fn tampered_message_is_rejected() {
        let mut rng = rand::thread_rng();
        let (pk, sk) = keypair(&mut rng);

        let signature = sign_detached(b"original", &sk);
        assert_eq!(
            verify_detached(&signature, b"0riginal", &pk),
            Err(SignError::BadSignature)
        );
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let mut rng = rand::thread_rng();
        let (pk, sk) = keypair(&mut rng);

        let message = b"original";
        let mut signature = sign_detached(message, &sk);
        signature[17] ^= 0x20;
        assert_eq!(
            verify_detached(&signature, message, &pk),
            Err(SignError::BadSignature)
        );
    }

    #[test]
    fn foreign_public_key_is_rejected() {
        let mut rng = rand::thread_rng();
        let (_, sk) = keypair(&mut rng);
        let (other_pk, _) = keypair(&mut rng);

        let message = b"original";
        let signature = sign_detached(message, &sk);
        assert_eq!(
            verify_detached(&signature, message, &other_pk),
            Err(SignError::BadSignature)
        );
    }

    #[test]
    fn secret_key_layout_is_seed_then_public() {
        let mut rng = rand::thread_rng();
        let (pk, sk) = keypair(&mut rng);
        assert_eq!(&sk[SEED_LEN..], &pk[..]);
    }

    #[test]
    fn key_conversion_is_deterministic() {
        let mut rng = rand::thread_rng();
        let (pk, sk) = keypair(&mut rng);

        assert_eq!(public_to_kx(&pk).unwrap(), public_to_kx(&pk).unwrap());
        assert_eq!(secret_to_kx(&sk), secret_to_kx(&sk));
    }

    #[test]
    fn converted_keys_form_a_valid_x25519_pair() {
        let mut rng = rand::thread_rng();
        let (pk, sk) = keypair(&mut rng);

        let kx_pk = public_to_kx(&pk).unwrap();
        let kx_sk = secret_to_kx(&sk);
        assert_eq!(kx_pk, x25519(kx_sk, X25519_BASEPOINT_BYTES));
    }

    #[test]
    fn converted_keypairs_agree_on_a_shared_key() {
        let mut rng = rand::thread_rng();
        let (alice_pk, alice_sk) = keypair(&mut rng);
        let (bob_pk, bob_sk) = keypair(&mut rng);

        let alice_shared = crate::kx::shared_key(
            &public_to_kx(&bob_pk).unwrap(),
            &secret_to_kx(&alice_sk),
        )
        .unwrap();
        let bob_shared = crate::kx::shared_key(
            &public_to_kx(&alice_pk).unwrap(),
            &secret_to_kx(&bob_sk),
        )
        .unwrap();
        assert_eq!(alice_shared, bob_shared);
    }

    #[test]
    fn non_canonical_public_key_is_rejected() {
        // All-ones is not a valid compressed Edwards point.
        let bogus = [0xFFu8; PUBLIC_KEY_LEN];
        assert_eq!(public_to_kx(&bogus), Err(SignError::InvalidPublicKey));

        let signature = [0u8; SIGNATURE_LEN];
        assert_eq!(
            verify_detached(&signature, b"", &bogus),
            Err(SignError::InvalidPublicKey)
        );
    }
}

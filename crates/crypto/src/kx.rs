//! X25519 key exchange over raw 32-byte keys.
//!
//! Keys cross the guest boundary as plain byte buffers, so this module
//! works with the bare `x25519` scalar multiplication rather than the
//! typed ephemeral-secret API; clamping happens inside the primitive.
//!
//! The shared key is the raw Diffie-Hellman output. A peer key on a
//! small-order point would force that output to all zeros regardless of
//! our secret, so derivation rejects the all-zero result.

use rand::{CryptoRng, RngCore};
use thiserror::Error;
use tracing::warn;
use x25519_dalek::{x25519, X25519_BASEPOINT_BYTES};

pub const PUBLIC_KEY_LEN: usize = 32;
pub const SECRET_KEY_LEN: usize = 32;
pub const SHARED_KEY_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KxError {
    #[error("peer public key yields a non-contributory shared secret")]
    NonContributory,
}

/// Generates an X25519 keypair, returned as `(public, secret)`.
pub fn keypair(rng: &mut (impl RngCore + CryptoRng)) -> ([u8; PUBLIC_KEY_LEN], [u8; SECRET_KEY_LEN]) {
    let mut secret = [0u8; SECRET_KEY_LEN];
    rng.fill_bytes(&mut secret);
    let public = x25519(secret, X25519_BASEPOINT_BYTES);
    (public, secret)
}

/// Derives the shared key between our secret key and the peer's public
/// key. Both sides of an exchange derive the same value.
pub fn shared_key(
    their_public: &[u8; PUBLIC_KEY_LEN],
    our_secret: &[u8; SECRET_KEY_LEN],
) -> Result<[u8; SHARED_KEY_LEN], KxError> {
    let shared = x25519(*our_secret, *their_public);
    if shared == [0u8; SHARED_KEY_LEN] {
        warn!("rejecting non-contributory X25519 shared secret");
        return Err(KxError::NonContributory);
    }
    Ok(shared)
}

//! HMAC-SHA-512 message authentication.
//!
//! The streaming state follows the usual init/update/finalize protocol;
//! [`hmac_sha512`] composes the three steps for callers that have the
//! whole message in hand and want a single boundary crossing. Each call
//! builds a fresh state, nothing is cached across calls.

use hmac::{Hmac, Mac};
use sha2::Sha512;

pub const TAG_LEN: usize = 64;

/// Incremental HMAC-SHA-512 state.
pub struct HmacSha512 {
    mac: Hmac<Sha512>,
}

impl HmacSha512 {
    /// Initializes a fresh state keyed with `key`. Keys of any length
    /// are accepted, including empty ones.
    pub fn init(key: &[u8]) -> Self {
        let mac = <Hmac<Sha512> as Mac>::new_from_slice(key)
            .expect("HMAC-SHA-512 accepts keys of any length");
        Self { mac }
    }

    /// Feeds message bytes into the state.
    pub fn update(&mut self, data: &[u8]) {
        self.mac.update(data);
    }

    /// Consumes the state and writes the 64-byte tag.
    pub fn finalize(self, tag: &mut [u8; TAG_LEN]) {
        tag.copy_from_slice(&self.mac.finalize().into_bytes());
    }
}

/// One-shot HMAC-SHA-512: init with `key`, one update with `message`,
/// finalize.
pub fn hmac_sha512(message: &[u8], key: &[u8]) -> [u8; TAG_LEN] {
    let mut state = HmacSha512::init(key);
    state.update(message);

    let mut tag = [0u8; TAG_LEN];
    state.finalize(&mut tag);
    tag
}

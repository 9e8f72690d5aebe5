//! Cryptographic primitive layer for the Sandvault guest module.
//!
//! This crate provides the primitives the guest boundary exposes to the
//! host runtime: buffer padding, authenticated encryption, key exchange,
//! detached signatures, and keyed hashing. The underlying algorithms are
//! consumed as audited black boxes from the dalek and RustCrypto crates;
//! nothing here rolls its own cryptography.
//!
//! # Capabilities
//!
//! - **Padding**: ISO/IEC 7816-4 pad and unpad over caller buffers
//! - **Authenticated Encryption**: detached ChaCha20-Poly1305 (IETF)
//! - **Key Exchange**: X25519 keypairs and shared-secret derivation
//! - **Digital Signatures**: Ed25519 detached sign/verify, plus
//!   conversion of signing keys to their X25519 counterparts
//! - **Message Authentication**: streaming and one-shot HMAC-SHA-512
//!
//! # Design Principles
//!
//! - Every operation works on caller-provided buffers with explicit
//!   lengths; nothing allocates beyond what the primitives require
//! - Entropy-consuming operations take a caller-supplied
//!   [`rand::RngCore`] + [`rand::CryptoRng`] source, so the guest
//!   boundary can route host entropy through them
//! - Failures are per-module error enums; verification failures are
//!   ordinary recoverable errors, never panics
//! - Transient copies of secret material are zeroized

pub mod aead;
pub mod kx;
pub mod mac;
pub mod padding;
pub mod sign;

pub use aead::AeadError;
pub use kx::KxError;
pub use mac::HmacSha512;
pub use padding::PaddingError;
pub use sign::SignError;

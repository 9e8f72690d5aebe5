//! Native-width `extern "C"` entry points over the primitive layer.
//!
//! Every function here is a thin adapter: build slices and fixed-size
//! arrays over the caller's pointers, call into `sandvault-crypto`, and
//! flatten the result to an integer status code: zero for success,
//! nonzero for failure, no diagnostic channel. Verification and
//! parameter failures come back as statuses; the only fatal path is an
//! unregistered random source (see [`crate::random`]).
//!
//! Length parameters are 64-bit here; the narrowed 32-bit surface the
//! host actually binds lives in [`crate::narrow`].
//!
//! # Safety
//!
//! Callers pass raw pointers into shared guest memory. Each pointer
//! must be valid for the fixed size its parameter documents, or for the
//! explicit length passed next to it; a null pointer is tolerated only
//! where its paired length is zero. Declaring a length larger than the
//! allocation is undefined behavior in the primitive, not a detectable
//! error.

use std::os::raw::c_int;
use std::ptr;
use std::slice;
use std::sync::atomic::{AtomicBool, Ordering};

use sandvault_crypto::{aead, kx, mac, padding, sign};
use tracing::debug;

use crate::random::SourceRng;

pub(crate) const STATUS_OK: c_int = 0;
pub(crate) const STATUS_ERR: c_int = -1;

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Borrows `len` bytes at `ptr`, tolerating a null pointer when `len`
/// is zero (the host passes `null, 0` for absent associated data).
unsafe fn input<'a>(ptr: *const u8, len: u64) -> &'a [u8] {
    if len == 0 {
        &[]
    } else {
        slice::from_raw_parts(ptr, len as usize)
    }
}

/// Mutable counterpart of [`input`] for output buffers.
unsafe fn output<'a>(ptr: *mut u8, len: u64) -> &'a mut [u8] {
    if len == 0 {
        &mut []
    } else {
        slice::from_raw_parts_mut(ptr, len as usize)
    }
}

/// One-time process initialization.
///
/// Returns 0 on the first call and 1 on every later one. Installs the
/// tracing subscriber; level selection stays with the host environment.
#[no_mangle]
pub extern "C" fn sv_init() -> c_int {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    if INITIALIZED.swap(true, Ordering::Relaxed) {
        return 1;
    }
    debug!("sandvault guest initialized");
    STATUS_OK
}

/// ISO/IEC 7816-4 pad in place. `buf` must hold `max_buf_len` bytes of
/// which the first `unpadded_len` are message; the padded length is
/// written through `padded_len_out` on success.
#[no_mangle]
pub unsafe extern "C" fn sv_pad(
    padded_len_out: *mut u64,
    buf: *mut u8,
    unpadded_len: u64,
    block_size: u64,
    max_buf_len: u64,
) -> c_int {
    let buf = output(buf, max_buf_len);
    match padding::pad(buf, unpadded_len as usize, block_size as usize) {
        Ok(padded) => {
            *padded_len_out = padded as u64;
            STATUS_OK
        }
        Err(_) => STATUS_ERR,
    }
}

/// Recovers the unpadded length of `buf[..padded_len]`, written through
/// `unpadded_len_out` on success. The buffer itself is not modified.
#[no_mangle]
pub unsafe extern "C" fn sv_unpad(
    unpadded_len_out: *mut u64,
    buf: *const u8,
    padded_len: u64,
    block_size: u64,
) -> c_int {
    let buf = input(buf, padded_len);
    match padding::unpad(buf, block_size as usize) {
        Ok(unpadded) => {
            *unpadded_len_out = unpadded as u64;
            STATUS_OK
        }
        Err(_) => STATUS_ERR,
    }
}

/// Detached AEAD encryption. `c` receives `mlen` ciphertext bytes and
/// `tag_out` the 16-byte tag; `npub` is the 12-byte nonce, `k` the
/// 32-byte key.
#[no_mangle]
pub unsafe extern "C" fn sv_aead_encrypt_detached(
    c: *mut u8,
    tag_out: *mut u8,
    m: *const u8,
    mlen: u64,
    ad: *const u8,
    adlen: u64,
    npub: *const u8,
    k: *const u8,
) -> c_int {
    let plaintext = input(m, mlen);
    let associated_data = input(ad, adlen);
    let ciphertext = output(c, mlen);
    let nonce = &*npub.cast::<[u8; aead::NONCE_LEN]>();
    let key = &*k.cast::<[u8; aead::KEY_LEN]>();

    match aead::encrypt_detached(ciphertext, plaintext, associated_data, nonce, key) {
        Ok(tag) => {
            ptr::copy_nonoverlapping(tag.as_ptr(), tag_out, aead::TAG_LEN);
            STATUS_OK
        }
        Err(_) => STATUS_ERR,
    }
}

/// Detached AEAD decryption. Fails with a nonzero status when the tag
/// does not verify; the plaintext buffer is zeroed in that case.
#[no_mangle]
pub unsafe extern "C" fn sv_aead_decrypt_detached(
    m: *mut u8,
    c: *const u8,
    clen: u64,
    tag: *const u8,
    ad: *const u8,
    adlen: u64,
    npub: *const u8,
    k: *const u8,
) -> c_int {
    let ciphertext = input(c, clen);
    let associated_data = input(ad, adlen);
    let plaintext = output(m, clen);
    let tag = &*tag.cast::<[u8; aead::TAG_LEN]>();
    let nonce = &*npub.cast::<[u8; aead::NONCE_LEN]>();
    let key = &*k.cast::<[u8; aead::KEY_LEN]>();

    match aead::decrypt_detached(plaintext, ciphertext, tag, associated_data, nonce, key) {
        Ok(()) => STATUS_OK,
        Err(_) => STATUS_ERR,
    }
}

/// Generates an X25519 keypair into two 32-byte buffers. Requires a
/// registered random source.
#[no_mangle]
pub unsafe extern "C" fn sv_kx_keypair(pk: *mut u8, sk: *mut u8) -> c_int {
    let (public, secret) = kx::keypair(&mut SourceRng);
    ptr::copy_nonoverlapping(public.as_ptr(), pk, kx::PUBLIC_KEY_LEN);
    ptr::copy_nonoverlapping(secret.as_ptr(), sk, kx::SECRET_KEY_LEN);
    STATUS_OK
}

/// Derives the 32-byte shared key from the peer's public key and our
/// secret key.
#[no_mangle]
pub unsafe extern "C" fn sv_kx_shared_key(shared: *mut u8, pk: *const u8, sk: *const u8) -> c_int {
    let their_public = &*pk.cast::<[u8; kx::PUBLIC_KEY_LEN]>();
    let our_secret = &*sk.cast::<[u8; kx::SECRET_KEY_LEN]>();

    match kx::shared_key(their_public, our_secret) {
        Ok(key) => {
            ptr::copy_nonoverlapping(key.as_ptr(), shared, kx::SHARED_KEY_LEN);
            STATUS_OK
        }
        Err(_) => STATUS_ERR,
    }
}

/// Generates an Ed25519 keypair: 32-byte public key, 64-byte secret
/// key. Requires a registered random source.
#[no_mangle]
pub unsafe extern "C" fn sv_sign_keypair(pk: *mut u8, sk: *mut u8) -> c_int {
    let (public, secret) = sign::keypair(&mut SourceRng);
    ptr::copy_nonoverlapping(public.as_ptr(), pk, sign::PUBLIC_KEY_LEN);
    ptr::copy_nonoverlapping(secret.as_ptr(), sk, sign::SECRET_KEY_LEN);
    STATUS_OK
}

/// Writes a detached 64-byte signature over `m` into `sig`.
#[no_mangle]
pub unsafe extern "C" fn sv_sign_detached(
    sig: *mut u8,
    m: *const u8,
    mlen: u64,
    sk: *const u8,
) -> c_int {
    let message = input(m, mlen);
    let secret = &*sk.cast::<[u8; sign::SECRET_KEY_LEN]>();

    let signature = sign::sign_detached(message, secret);
    ptr::copy_nonoverlapping(signature.as_ptr(), sig, sign::SIGNATURE_LEN);
    STATUS_OK
}

/// Verifies a detached signature. Nonzero means invalid.
#[no_mangle]
pub unsafe extern "C" fn sv_sign_verify_detached(
    sig: *const u8,
    m: *const u8,
    mlen: u64,
    pk: *const u8,
) -> c_int {
    let signature = &*sig.cast::<[u8; sign::SIGNATURE_LEN]>();
    let message = input(m, mlen);
    let public = &*pk.cast::<[u8; sign::PUBLIC_KEY_LEN]>();

    match sign::verify_detached(signature, message, public) {
        Ok(()) => STATUS_OK,
        Err(_) => STATUS_ERR,
    }
}

/// Converts an Ed25519 public key to its X25519 form.
#[no_mangle]
pub unsafe extern "C" fn sv_sign_pk_to_kx(kx_pk: *mut u8, ed_pk: *const u8) -> c_int {
    let public = &*ed_pk.cast::<[u8; sign::PUBLIC_KEY_LEN]>();

    match sign::public_to_kx(public) {
        Ok(converted) => {
            ptr::copy_nonoverlapping(converted.as_ptr(), kx_pk, kx::PUBLIC_KEY_LEN);
            STATUS_OK
        }
        Err(_) => STATUS_ERR,
    }
}

/// Converts an Ed25519 secret key to its X25519 form.
#[no_mangle]
pub unsafe extern "C" fn sv_sign_sk_to_kx(kx_sk: *mut u8, ed_sk: *const u8) -> c_int {
    let secret = &*ed_sk.cast::<[u8; sign::SECRET_KEY_LEN]>();

    let converted = sign::secret_to_kx(secret);
    ptr::copy_nonoverlapping(converted.as_ptr(), kx_sk, kx::SECRET_KEY_LEN);
    STATUS_OK
}

/// One-shot HMAC-SHA-512: a 64-byte tag over `m` keyed with `k`.
/// Always succeeds for well-formed input; the status exists so the
/// host binds one uniform convention.
///
/// Only the narrow form is exported; the composition exists precisely
/// to cost a single narrow boundary crossing.
#[no_mangle]
pub unsafe extern "C" fn wasm_sv_hmac_sha512(
    tag_out: *mut u8,
    m: *const u8,
    mlen: u32,
    k: *const u8,
    klen: u32,
) -> c_int {
    let message = input(m, u64::from(mlen));
    let key = input(k, u64::from(klen));

    let tag = mac::hmac_sha512(message, key);
    ptr::copy_nonoverlapping(tag.as_ptr(), tag_out, mac::TAG_LEN);
    STATUS_OK
}

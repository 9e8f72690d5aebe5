//! The 32-bit export surface the host actually binds.
//!
//! The host call boundary cannot pass 64-bit integer arguments, so
//! every native entry point gets a `wasm_`-prefixed twin whose length
//! parameters are `u32`. A wrapper performs only the implicit widening
//! conversion on those parameters and forwards everything else
//! (pointers, keys, nonces, status codes) verbatim. No validation is
//! added and no error is reinterpreted on the way through.
//!
//! One declarative table drives the generation, so a signature is
//! written once and cannot drift between the two widths. Entry points
//! whose signatures carry no length still get a twin, keeping the
//! narrow surface uniform for the host.
//!
//! `wasm_sv_pad` and `wasm_sv_unpad` are written by hand: their length
//! *out-parameters* must be narrowed on the way back, which is more
//! than forwarding.

use std::os::raw::c_int;

use crate::exports::*;

/// Generates one `wasm_`-prefixed forwarding wrapper per table row.
/// Each parameter is listed as `name: narrow as native`; widening
/// `u32 as u64` is the only conversion that does anything.
macro_rules! narrow_exports {
    ($(
        $(#[$doc:meta])*
        $narrow:ident => $native:ident ( $( $arg:ident : $from:ty as $to:ty ),* $(,)? );
    )*) => {
        $(
            $(#[$doc])*
            #[no_mangle]
            pub unsafe extern "C" fn $narrow( $( $arg: $from ),* ) -> c_int {
                $native( $( $arg as $to ),* )
            }
        )*
    };
}

narrow_exports! {
    /// Narrow twin of [`sv_aead_encrypt_detached`].
    wasm_sv_aead_encrypt_detached => sv_aead_encrypt_detached(
        c: *mut u8 as *mut u8,
        tag_out: *mut u8 as *mut u8,
        m: *const u8 as *const u8,
        mlen: u32 as u64,
        ad: *const u8 as *const u8,
        adlen: u32 as u64,
        npub: *const u8 as *const u8,
        k: *const u8 as *const u8,
    );

    /// Narrow twin of [`sv_aead_decrypt_detached`].
    wasm_sv_aead_decrypt_detached => sv_aead_decrypt_detached(
        m: *mut u8 as *mut u8,
        c: *const u8 as *const u8,
        clen: u32 as u64,
        tag: *const u8 as *const u8,
        ad: *const u8 as *const u8,
        adlen: u32 as u64,
        npub: *const u8 as *const u8,
        k: *const u8 as *const u8,
    );

    /// Narrow twin of [`sv_kx_keypair`].
    wasm_sv_kx_keypair => sv_kx_keypair(
        pk: *mut u8 as *mut u8,
        sk: *mut u8 as *mut u8,
    );

    /// Narrow twin of [`sv_kx_shared_key`].
    wasm_sv_kx_shared_key => sv_kx_shared_key(
        shared: *mut u8 as *mut u8,
        pk: *const u8 as *const u8,
        sk: *const u8 as *const u8,
    );

    /// Narrow twin of [`sv_sign_keypair`].
    wasm_sv_sign_keypair => sv_sign_keypair(
        pk: *mut u8 as *mut u8,
        sk: *mut u8 as *mut u8,
    );

    /// Narrow twin of [`sv_sign_detached`].
    wasm_sv_sign_detached => sv_sign_detached(
        sig: *mut u8 as *mut u8,
        m: *const u8 as *const u8,
        mlen: u32 as u64,
        sk: *const u8 as *const u8,
    );

    /// Narrow twin of [`sv_sign_verify_detached`].
    wasm_sv_sign_verify_detached => sv_sign_verify_detached(
        sig: *const u8 as *const u8,
        m: *const u8 as *const u8,
        mlen: u32 as u64,
        pk: *const u8 as *const u8,
    );

    /// Narrow twin of [`sv_sign_pk_to_kx`].
    wasm_sv_sign_pk_to_kx => sv_sign_pk_to_kx(
        kx_pk: *mut u8 as *mut u8,
        ed_pk: *const u8 as *const u8,
    );

    /// Narrow twin of [`sv_sign_sk_to_kx`].
    wasm_sv_sign_sk_to_kx => sv_sign_sk_to_kx(
        kx_sk: *mut u8 as *mut u8,
        ed_sk: *const u8 as *const u8,
    );
}

/// Narrow twin of [`sv_init`].
#[no_mangle]
pub extern "C" fn wasm_sv_init() -> c_int {
    sv_init()
}

/// Narrow twin of [`sv_pad`]. The padded length comes back through a
/// `u32` out-parameter; it always fits because it never exceeds
/// `max_buf_len`, which the caller passed as a `u32`.
#[no_mangle]
pub unsafe extern "C" fn wasm_sv_pad(
    padded_len_out: *mut u32,
    buf: *mut u8,
    unpadded_len: u32,
    block_size: u32,
    max_buf_len: u32,
) -> c_int {
    let mut wide = 0u64;
    let status = sv_pad(
        &mut wide,
        buf,
        u64::from(unpadded_len),
        u64::from(block_size),
        u64::from(max_buf_len),
    );
    if status == 0 {
        *padded_len_out = wide as u32;
    }
    status
}

/// Narrow twin of [`sv_unpad`]. The unpadded length is bounded by
/// `padded_len`, so the narrowing cast is lossless.
#[no_mangle]
pub unsafe extern "C" fn wasm_sv_unpad(
    unpadded_len_out: *mut u32,
    buf: *const u8,
    padded_len: u32,
    block_size: u32,
) -> c_int {
    let mut wide = 0u64;
    let status = sv_unpad(&mut wide, buf, u64::from(padded_len), u64::from(block_size));
    if status == 0 {
        *unpadded_len_out = wide as u32;
    }
    status
}

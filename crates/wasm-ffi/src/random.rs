//! Process-wide pluggable random source.
//!
//! The guest cannot reach an OS generator, so the host registers a
//! byte-filling callback during start-up and every primitive that needs
//! entropy draws through it. The slot holds exactly one callback;
//! registering again simply replaces it. Registration is a single
//! atomic pointer write, so no caller can observe a half-set source
//! even if the host embeds the module in a threaded runtime.
//!
//! Drawing randomness before any registration is a start-up ordering
//! bug in the host and is fatal by design: the process aborts rather
//! than returning a status code some caller might ignore.

use std::process;
use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};

use rand::{CryptoRng, RngCore};
use tracing::error;

/// Contract: fill `buf[..len]` with cryptographically strong random
/// bytes. A zero `len` must be harmless.
pub type RandomSourceFn = unsafe extern "C" fn(buf: *mut u8, len: u32);

static RANDOM_SOURCE: AtomicPtr<()> = AtomicPtr::new(ptr::null_mut());

/// Registers the host's entropy callback, replacing any previous one.
///
/// Must be invoked before the first export that needs randomness.
#[no_mangle]
pub extern "C" fn wasm_set_random_source(source: RandomSourceFn) {
    RANDOM_SOURCE.store(source as *mut (), Ordering::Relaxed);
}

/// Fills `buf` from the registered source. Aborts if none is registered.
pub fn fill(buf: &mut [u8]) {
    let slot = RANDOM_SOURCE.load(Ordering::Relaxed);
    if slot.is_null() {
        error!("random source used before registration");
        process::abort();
    }

    // Guest memory is 32-bit addressed, so the length always fits.
    let source: RandomSourceFn = unsafe { std::mem::transmute(slot) };
    unsafe { source(buf.as_mut_ptr(), buf.len() as u32) };
}

/// Draws the next 32-bit value from the source, reinterpreting four
/// bytes in native byte order. Local use only; never transmitted.
pub fn next_u32() -> u32 {
    let mut scratch = [0u8; 4];
    fill(&mut scratch);
    u32::from_ne_bytes(scratch)
}

/// Adapter exposing the registered source through the rand traits the
/// primitive layer takes.
pub(crate) struct SourceRng;

impl RngCore for SourceRng {
    fn next_u32(&mut self) -> u32 {
        next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        let mut scratch = [0u8; 8];
        fill(&mut scratch);
        u64::from_ne_bytes(scratch)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        fill(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        fill(dest);
        Ok(())
    }
}

impl CryptoRng for SourceRng {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU8;
    use std::sync::{Mutex, MutexGuard};

    // The slot is process-global; serialize the tests that touch it.
    static SLOT_LOCK: Mutex<()> = Mutex::new(());

    fn lock_slot() -> MutexGuard<'static, ()> {
        SLOT_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    // A deterministic counter source so tests can assert exact bytes.
    static COUNTER: AtomicU8 = AtomicU8::new(0);

    unsafe extern "C" fn counter_source(buf: *mut u8, len: u32) {
        for i in 0..len as usize {
            *buf.add(i) = COUNTER.fetch_add(1, Ordering::Relaxed);
        }
    }

    unsafe extern "C" fn constant_source(buf: *mut u8, len: u32) {
        for i in 0..len as usize {
            *buf.add(i) = 0x7E;
        }
    }

    #[test]
    fn fill_writes_exactly_the_requested_bytes() {
        let _guard = lock_slot();
        wasm_set_random_source(counter_source);

        let mut buf = [0xFFu8; 16];
        fill(&mut buf[..13]);
        // Counter bytes are consecutive, so all 13 were written by us.
        for window in buf[..13].windows(2) {
            assert_eq!(window[1], window[0].wrapping_add(1));
        }
        assert_eq!(&buf[13..], &[0xFF; 3]);
    }

    #[test]
    fn zero_length_fill_is_harmless() {
        let _guard = lock_slot();
        wasm_set_random_source(counter_source);
        fill(&mut []);
    }

    #[test]
    fn next_u32_uses_native_byte_order() {
        let _guard = lock_slot();
        wasm_set_random_source(constant_source);
        assert_eq!(next_u32(), u32::from_ne_bytes([0x7E; 4]));
    }

    #[test]
    fn re_registration_replaces_the_source() {
        let _guard = lock_slot();
        wasm_set_random_source(counter_source);
        wasm_set_random_source(constant_source);

        let mut buf = [0u8; 4];
        fill(&mut buf);
        assert_eq!(buf, [0x7E; 4]);

        wasm_set_random_source(counter_source);
    }

    #[test]
    fn source_rng_adapts_the_slot() {
        let _guard = lock_slot();
        wasm_set_random_source(constant_source);

        let mut rng = SourceRng;
        let mut buf = [0u8; 7];
        rng.fill_bytes(&mut buf);
        assert_eq!(buf, [0x7E; 7]);
        assert_eq!(rng.next_u64(), u64::from_ne_bytes([0x7E; 8]));
    }
}

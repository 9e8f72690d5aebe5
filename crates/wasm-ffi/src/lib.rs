//! Guest-side boundary of the Sandvault crypto module.
//!
//! This crate is compiled to a sandboxed wasm module and consumed by a
//! host runtime through direct synchronous calls. Three concerns live
//! here, composed only through the shared export surface:
//!
//! - [`exports`]: the native-width (`u64` length) `extern "C"` entry
//!   points over the primitives in `sandvault-crypto`
//! - [`narrow`]: the `wasm_`-prefixed forwarding wrappers that replace
//!   every 64-bit length parameter with a 32-bit one, because the host
//!   call boundary cannot pass 64-bit integers
//! - [`random`]: the process-wide random source the host registers
//!   before issuing any call that needs entropy
//!
//! All buffers are raw pointers into memory shared between host and
//! guest, with explicit lengths. Status codes follow the primitive
//! convention throughout: zero is success, nonzero is failure, and the
//! boundary never enriches or reinterprets them. The one fatal case,
//! drawing randomness before a source is registered, aborts the
//! process instead of returning a status.

pub mod exports;
pub mod narrow;
pub mod random;

pub use random::RandomSourceFn;

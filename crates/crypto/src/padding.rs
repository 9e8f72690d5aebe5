//! ISO/IEC 7816-4 padding over caller-provided buffers.
//!
//! Padding appends a single `0x80` marker byte and then zero-fills up to
//! the next multiple of the block size strictly greater than the
//! original length, so an exact multiple grows by one full block.
//! Unpadding scans the final block backwards for the marker.
//!
//! Block sizes must be non-zero powers of two. The padded buffer always
//! carries at least one marker byte, which is what makes the scheme
//! unambiguous for any input, including the empty one.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaddingError {
    #[error("block size must be a non-zero power of two")]
    InvalidBlockSize,

    #[error("padded length is not representable")]
    Overflow,

    #[error("buffer too small for the padded length")]
    BufferTooSmall,

    #[error("no valid padding marker in the final block")]
    InvalidPadding,
}

/// Length of `unpadded_len` bytes once padded to `block_size`.
///
/// Always strictly greater than `unpadded_len` and a multiple of
/// `block_size`.
pub fn padded_len(unpadded_len: usize, block_size: usize) -> Result<usize, PaddingError> {
    if block_size == 0 || !block_size.is_power_of_two() {
        return Err(PaddingError::InvalidBlockSize);
    }

    let fill = block_size - (unpadded_len & (block_size - 1));
    unpadded_len.checked_add(fill).ok_or(PaddingError::Overflow)
}

/// Pads `buf[..unpadded_len]` in place and returns the padded length.
///
/// `buf.len()` is the maximum the caller allows the padded data to
/// occupy; the call fails without touching the buffer when the padded
/// length would not fit.
pub fn pad(buf: &mut [u8], unpadded_len: usize, block_size: usize) -> Result<usize, PaddingError> {
    let padded = padded_len(unpadded_len, block_size)?;
    if padded > buf.len() {
        return Err(PaddingError::BufferTooSmall);
    }

    buf[unpadded_len] = 0x80;
    buf[unpadded_len + 1..padded].fill(0);
    Ok(padded)
}

/// Recovers the unpadded length of a padded buffer.
///
/// `buf` must hold exactly the padded data: a non-zero multiple of
/// `block_size` whose final block ends in the `0x80` marker followed
/// only by zeros.
pub fn unpad(buf: &[u8], block_size: usize) -> Result<usize, PaddingError> {
    if block_size == 0 || !block_size.is_power_of_two() {
        return Err(PaddingError::InvalidBlockSize);
    }

    if buf.is_empty() || buf.len() % block_size != 0 {
        return Err(PaddingError::InvalidPadding);
    }

    // The marker can only live in the final block.
    for i in (buf.len() - block_size..buf.len()).rev() {
        match buf[i] {
            0x00 => continue,
            0x80 => return Ok(i),
            _ => return Err(PaddingError::InvalidPadding),
        }
    }

    Err(PaddingError::InvalidPadding)
}

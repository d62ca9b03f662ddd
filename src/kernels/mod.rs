//! This module groups the pure, stateless kernels the run-length codec is
//! built from.
//!
//! The run-length reader and writer in `crate::rle` only ever touch bytes
//! through these kernels and the `crate::stream` traits.

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Bit-Width Reduction: signed to unsigned mapping.
pub mod zigzag;

/// Bit-Width Reduction: base-128 variable-length integers.
pub mod varint;

/// Block framing: Zstandard frames for the compressed streams.
pub mod zstd;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================

pub use varint::{read_signed, read_unsigned, write_signed, write_unsigned, MAX_VARINT_LEN};

//! This module contains the pure, stateless kernels for performing Zig-zag
//! encoding and decoding.
//!
//! Zig-zag is a lossless, bitwise mapping of signed integers to unsigned
//! integers that keeps small magnitudes small: `0, -1, 1, -2, 2, ...` map to
//! `0, 1, 2, 3, 4, ...`. Signed run-length streams push every base and literal
//! value through this mapping before the varint kernel sees it.

use num_traits::{PrimInt, Signed, Unsigned, Zero};

use crate::traits::{HasSigned, HasUnsigned};

//==================================================================================
// 1. Generic Core Logic
//==================================================================================

/// Encodes a single signed integer using the Zig-zag algorithm.
#[inline]
pub fn encode_val<T>(n: T) -> T::Unsigned
where
    T: PrimInt + Signed + HasUnsigned,
{
    let bits = std::mem::size_of::<T>() * 8;
    // `>>` on a signed PrimInt is arithmetic, so the high half is all sign bits.
    ((n << 1) ^ (n >> (bits - 1))).to_unsigned_bits()
}

/// Decodes a single unsigned integer back to its signed representation.
#[inline]
pub fn decode_val<U>(n: U) -> U::Signed
where
    U: PrimInt + Unsigned + HasSigned,
{
    let shifted = (n >> 1).to_signed_bits();
    let lsb = (n & U::one()).to_signed_bits();
    // (n >> 1) ^ -(n & 1)
    shifted ^ (<U::Signed as Zero>::zero() - lsb)
}

//==================================================================================
// 2. Unit Tests
//==================================================================================

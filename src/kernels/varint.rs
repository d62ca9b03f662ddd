//! This module contains the kernels for base-128 variable-length integer
//! encoding and decoding (LEB128 layout: seven payload bits per byte, least
//! significant group first, high bit set on every byte except the last).
//!
//! Unsigned values are written as-is; signed values are first mapped through
//! the zig-zag kernel. Both directions work over the `ByteSource` / `ByteSink`
//! traits the run-length reader and writer are built on.

use num_traits::{PrimInt, Unsigned};

use super::zigzag;
use crate::error::CodecError;
use crate::stream::{ByteSink, ByteSource};

/// The longest encoding of a 64-bit value.
pub const MAX_VARINT_LEN: usize = 10;

//==================================================================================
// 1. Generic Core Logic
//==================================================================================

/// Decodes one value, pulling bytes from `next_byte` until a byte without the
/// continuation bit is seen.
fn decode_with<T, F>(mut next_byte: F) -> Result<T, CodecError>
where
    T: PrimInt + Unsigned,
    F: FnMut() -> Result<Option<u8>, CodecError>,
{
    let mut result = T::zero();
    let mut shift = 0;
    let total_bits = std::mem::size_of::<T>() * 8;

    loop {
        let byte = next_byte()?.ok_or_else(|| {
            CodecError::TruncatedStream("varint is missing its terminating byte".to_string())
        })?;

        if shift >= total_bits {
            return Err(CodecError::VarintOverflow(format!(
                "more than {} payload bits",
                total_bits
            )));
        }
        let payload = T::from(byte & 0x7F).ok_or_else(|| {
            CodecError::InternalError("7-bit payload does not fit target type".to_string())
        })?;
        // Bits of the last group that fall past the type width are an overflow.
        if shift + 7 > total_bits && ((byte & 0x7F) >> (total_bits - shift)) > 0 {
            return Err(CodecError::VarintOverflow(format!(
                "value exceeds {} bits",
                total_bits
            )));
        }
        result = result | (payload << shift);

        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
    }
}

//==================================================================================
// 2. Public API for Stream Operations
//==================================================================================

/// Writes `value` as an unsigned varint.
pub fn write_unsigned<S>(sink: &mut S, value: u64) -> Result<(), CodecError>
where
    S: ByteSink + ?Sized,
{
    let mut scratch = [0u8; MAX_VARINT_LEN];
    let mut len = 0;
    let mut current = value;
    loop {
        let low = (current & 0x7F) as u8;
        current >>= 7;
        if current == 0 {
            scratch[len] = low;
            len += 1;
            break;
        }
        scratch[len] = low | 0x80;
        len += 1;
    }
    sink.write_all(&scratch[..len])
}

/// Writes `value` zig-zag mapped, as an unsigned varint.
pub fn write_signed<S>(sink: &mut S, value: i64) -> Result<(), CodecError>
where
    S: ByteSink + ?Sized,
{
    write_unsigned(sink, zigzag::encode_val(value))
}

/// Reads one unsigned varint. Fails with `TruncatedStream` if the source runs
/// dry before the terminating byte.
pub fn read_unsigned<S>(source: &mut S) -> Result<u64, CodecError>
where
    S: ByteSource + ?Sized,
{
    decode_with(|| source.read_byte())
}

/// Reads one zig-zag mapped varint.
pub fn read_signed<S>(source: &mut S) -> Result<i64, CodecError>
where
    S: ByteSource + ?Sized,
{
    read_unsigned(source).map(zigzag::decode_val)
}

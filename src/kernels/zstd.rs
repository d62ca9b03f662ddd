//! This module contains the block compression kernels used by the compressed
//! byte streams. Each block is an independent Zstandard frame; the framing
//! header (length and "stored original" flag) is owned by
//! `stream::compressed`, so these kernels deal only in raw frames.
//! This module is a safe, panic-free wrapper around the `zstd` crate.

use std::io::Write;
use zstd::stream::Encoder;

use crate::error::CodecError;

/// Compresses one block into a standalone Zstandard frame.
pub fn encode(input_bytes: &[u8], level: i32) -> Result<Vec<u8>, CodecError> {
    let mut output_buf = Vec::with_capacity(input_bytes.len() / 2 + 16);

    // We use the streaming Encoder, which writes directly to the output buffer.
    let mut encoder =
        Encoder::new(&mut output_buf, level).map_err(|e| CodecError::ZstdError(e.to_string()))?;
    encoder
        .write_all(input_bytes)
        .map_err(|e| CodecError::ZstdError(e.to_string()))?;

    // `finish` is essential to finalize the Zstd frame.
    encoder
        .finish()
        .map_err(|e| CodecError::ZstdError(e.to_string()))?;
    Ok(output_buf)
}

/// Decompresses one Zstandard frame. `capacity_hint` is the block size the
/// writer was configured with; decompression stops with an error as soon as
/// the output would exceed it.
pub fn decode(input_bytes: &[u8], capacity_hint: usize) -> Result<Vec<u8>, CodecError> {
    zstd::bulk::decompress(input_bytes, capacity_hint).map_err(|e| {
        CodecError::ZstdError(format!(
            "Failed to decompress block within {} bytes: {}",
            capacity_hint, e
        ))
    })
}

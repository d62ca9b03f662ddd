// In: src/error.rs

//! This module defines the single, unified error type for the entire codec.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    // =========================================================================
    // === Stream Decoding Errors
    // =========================================================================
    /// End of input was reached in the middle of a run or a varint. The bytes
    /// are immutable, so the stream is corrupt and the read must abort.
    #[error("Truncated stream: {0}")]
    TruncatedStream(String),

    /// A new run was requested but the source had no control byte left.
    #[error("Read past end of stream: {0}")]
    EndOfStream(String),

    /// A checkpoint that cannot be resolved against the run boundaries of the stream.
    #[error("Invalid checkpoint: {0}")]
    InvalidCheckpoint(String),

    #[error("Varint decoding error: {0}")]
    VarintOverflow(String),

    // =========================================================================
    // === Configuration & Framing Errors
    // =========================================================================
    #[error("Invalid codec configuration: {0}")]
    InvalidConfig(String),

    #[error("Zstd operation failed: {0}")]
    ZstdError(String),

    #[error("Buffer length mismatch: expected {0}, got {1}")]
    BufferMismatch(usize, usize),

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the Arrow library.
    #[error("Arrow operation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// An error originating from the underlying I/O subsystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically while loading a `CodecConfig`.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl CodecError {
    /// True for the two end-of-input conditions.
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, CodecError::TruncatedStream(_) | CodecError::EndOfStream(_))
    }
}

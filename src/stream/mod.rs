// In: src/stream/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Byte Stream Layer
// ====================================================================================
//
// The run-length codec never touches files or compression directly. It reads
// from a `ByteSource` and writes to a `ByteSink`; whatever sits beneath them
// (a raw buffer, a block-compressed buffer, a stripe of a larger file) is the
// stream's business.
//
// Positions flow through two small traits:
//
//   write pass:  ByteSink::record_position  -> PositionRecorder (Checkpoint)
//                RunLengthIntegerWriter appends its buffered element count
//
//   read pass:   Checkpoint::provider()     -> PositionProvider
//                ByteSource::seek consumes its own leading components,
//                RunLengthIntegerReader consumes the final element offset
//
// Every source owns its own cursor over shared immutable bytes (`Arc<[u8]>`),
// so independent readers over one encoded buffer need no locking.
// ====================================================================================

pub mod compressed;
pub mod memory;
pub mod position;

pub use compressed::{CompressedInStream, CompressedOutStream};
pub use memory::{InStream, OutStream};
pub use position::{Checkpoint, CheckpointCursor};

use crate::error::CodecError;

//==================================================================================
// 1. Position Traits
//==================================================================================

/// Yields the components of a recorded position, in recording order.
pub trait PositionProvider {
    fn next_position(&mut self) -> Result<u64, CodecError>;
}

/// Collects the components of a position while a stream is being written.
pub trait PositionRecorder {
    fn add_position(&mut self, offset: u64);
}

//==================================================================================
// 2. Byte Source / Sink Traits
//==================================================================================

/// A blocking, byte-at-a-time reader over a logical (decompressed) stream.
pub trait ByteSource {
    /// Returns the next byte, or `None` once the stream is exhausted.
    fn read_byte(&mut self) -> Result<Option<u8>, CodecError>;

    /// A hint of how many bytes can still be read. Zero means exhausted.
    fn available(&self) -> usize;

    /// Repositions the stream, consuming exactly the position components this
    /// source recorded.
    fn seek(&mut self, index: &mut dyn PositionProvider) -> Result<(), CodecError>;

    /// A human-readable stream name for diagnostics.
    fn name(&self) -> &str;
}

/// A byte-at-a-time writer that can report its current logical position.
pub trait ByteSink {
    fn write_byte(&mut self, byte: u8) -> Result<(), CodecError>;

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), CodecError>;

    /// Records the position of the next byte to be written.
    fn record_position(&self, recorder: &mut dyn PositionRecorder);
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn read_byte(&mut self) -> Result<Option<u8>, CodecError> {
        (**self).read_byte()
    }

    fn available(&self) -> usize {
        (**self).available()
    }

    fn seek(&mut self, index: &mut dyn PositionProvider) -> Result<(), CodecError> {
        (**self).seek(index)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<S: ByteSink + ?Sized> ByteSink for Box<S> {
    fn write_byte(&mut self, byte: u8) -> Result<(), CodecError> {
        (**self).write_byte(byte)
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        (**self).write_all(bytes)
    }

    fn flush(&mut self) -> Result<(), CodecError> {
        (**self).flush()
    }

    fn record_position(&self, recorder: &mut dyn PositionRecorder) {
        (**self).record_position(recorder)
    }
}

/// A sink that can surrender its finished bytes once writing is done.
pub trait FinishableSink: ByteSink {
    fn finish(self: Box<Self>) -> Result<Vec<u8>, CodecError>;
}

impl FinishableSink for OutStream {
    fn finish(self: Box<Self>) -> Result<Vec<u8>, CodecError> {
        Ok(self.into_bytes())
    }
}

impl FinishableSink for CompressedOutStream {
    fn finish(self: Box<Self>) -> Result<Vec<u8>, CodecError> {
        (*self).into_bytes()
    }
}

/// Converts a recorded position component back to an in-memory offset.
pub(crate) fn position_to_offset(value: u64, what: &str) -> Result<usize, CodecError> {
    usize::try_from(value).map_err(|_| {
        CodecError::InvalidCheckpoint(format!("{} {} does not fit in memory", what, value))
    })
}

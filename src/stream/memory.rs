//! Raw, uncompressed in-memory streams. A position is a single component:
//! the byte offset into the buffer.

use std::sync::Arc;

use super::{position_to_offset, ByteSink, ByteSource, PositionProvider, PositionRecorder};
use crate::error::CodecError;

/// Reads bytes from a shared immutable buffer.
#[derive(Debug, Clone)]
pub struct InStream {
    name: String,
    data: Arc<[u8]>,
    offset: usize,
}

impl InStream {
    pub fn new(name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            offset: 0,
        }
    }

    /// Current byte offset.
    pub fn position(&self) -> usize {
        self.offset
    }
}

impl ByteSource for InStream {
    #[inline]
    fn read_byte(&mut self) -> Result<Option<u8>, CodecError> {
        let byte = self.data.get(self.offset).copied();
        if byte.is_some() {
            self.offset += 1;
        }
        Ok(byte)
    }

    fn available(&self) -> usize {
        self.data.len() - self.offset
    }

    fn seek(&mut self, index: &mut dyn PositionProvider) -> Result<(), CodecError> {
        let offset = position_to_offset(index.next_position()?, "byte offset")?;
        if offset > self.data.len() {
            return Err(CodecError::InvalidCheckpoint(format!(
                "seek to byte {} past the end of {} ({} bytes)",
                offset,
                self.name,
                self.data.len()
            )));
        }
        self.offset = offset;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Collects written bytes into a growable buffer.
#[derive(Debug, Clone, Default)]
pub struct OutStream {
    name: String,
    buffer: Vec<u8>,
}

impl OutStream {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            buffer: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

impl ByteSink for OutStream {
    #[inline]
    fn write_byte(&mut self, byte: u8) -> Result<(), CodecError> {
        self.buffer.push(byte);
        Ok(())
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), CodecError> {
        Ok(())
    }

    fn record_position(&self, recorder: &mut dyn PositionRecorder) {
        recorder.add_position(self.buffer.len() as u64);
    }
}

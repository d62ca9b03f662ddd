//! Block-compressed in-memory streams.
//!
//! The logical byte stream is cut into blocks of at most `block_size` bytes.
//! Each block is stored as a 3-byte little-endian header followed by its
//! payload:
//!
//! ```text
//! header  := (payload_len << 1) | is_original     (24 bits, little-endian)
//! payload := zstd frame                  when is_original == 0
//!          | the block's raw bytes       when is_original == 1
//! ```
//!
//! A block is stored raw whenever compression fails to shrink it. A position
//! is two components: the framed offset of the block's header, and the
//! offset inside the decompressed block.

use std::sync::Arc;

use super::{position_to_offset, ByteSink, ByteSource, PositionProvider, PositionRecorder};
use crate::error::CodecError;
use crate::kernels::zstd;

/// Size of the per-block framing header.
pub const BLOCK_HEADER_SIZE: usize = 3;
/// The largest payload a 3-byte header can describe.
pub const MAX_BLOCK_SIZE: usize = (1 << 23) - 1;

//==================================================================================
// 1. Writer
//==================================================================================

#[derive(Debug)]
pub struct CompressedOutStream {
    name: String,
    block_size: usize,
    level: i32,
    current: Vec<u8>,
    output: Vec<u8>,
}

impl CompressedOutStream {
    pub fn new(name: impl Into<String>, block_size: usize, level: i32) -> Result<Self, CodecError> {
        if block_size == 0 || block_size > MAX_BLOCK_SIZE {
            return Err(CodecError::InvalidConfig(format!(
                "block size {} must be within 1..={}",
                block_size, MAX_BLOCK_SIZE
            )));
        }
        Ok(Self {
            name: name.into(),
            block_size,
            level,
            current: Vec::with_capacity(block_size),
            output: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Flushes the pending block and returns the framed bytes.
    pub fn into_bytes(mut self) -> Result<Vec<u8>, CodecError> {
        self.spill()?;
        Ok(self.output)
    }

    fn write_header(&mut self, payload_len: usize, is_original: bool) {
        let header = ((payload_len as u32) << 1) | is_original as u32;
        self.output
            .extend_from_slice(&header.to_le_bytes()[..BLOCK_HEADER_SIZE]);
    }

    /// Frames the pending block into `output`.
    fn spill(&mut self) -> Result<(), CodecError> {
        if self.current.is_empty() {
            return Ok(());
        }
        let compressed = zstd::encode(&self.current, self.level)?;
        let raw_len = self.current.len();
        if compressed.len() < raw_len {
            self.write_header(compressed.len(), false);
            self.output.extend_from_slice(&compressed);
        } else {
            self.write_header(raw_len, true);
            self.output.extend_from_slice(&self.current);
        }
        log::trace!(
            "{}: framed block of {} bytes into {} bytes",
            self.name,
            raw_len,
            compressed.len().min(raw_len) + BLOCK_HEADER_SIZE
        );
        self.current.clear();
        Ok(())
    }
}

impl ByteSink for CompressedOutStream {
    fn write_byte(&mut self, byte: u8) -> Result<(), CodecError> {
        self.current.push(byte);
        if self.current.len() == self.block_size {
            self.spill()?;
        }
        Ok(())
    }

    fn write_all(&mut self, mut bytes: &[u8]) -> Result<(), CodecError> {
        while !bytes.is_empty() {
            let room = self.block_size - self.current.len();
            let (head, tail) = bytes.split_at(room.min(bytes.len()));
            self.current.extend_from_slice(head);
            if self.current.len() == self.block_size {
                self.spill()?;
            }
            bytes = tail;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), CodecError> {
        self.spill()
    }

    fn record_position(&self, recorder: &mut dyn PositionRecorder) {
        recorder.add_position(self.output.len() as u64);
        recorder.add_position(self.current.len() as u64);
    }
}

//==================================================================================
// 2. Reader
//==================================================================================

#[derive(Debug, Clone)]
pub struct CompressedInStream {
    name: String,
    data: Arc<[u8]>,
    block_size: usize,
    /// Framed offset of the next block header.
    next_block: usize,
    current: Vec<u8>,
    current_pos: usize,
}

impl CompressedInStream {
    pub fn new(
        name: impl Into<String>,
        data: impl Into<Arc<[u8]>>,
        block_size: usize,
    ) -> Result<Self, CodecError> {
        if block_size == 0 || block_size > MAX_BLOCK_SIZE {
            return Err(CodecError::InvalidConfig(format!(
                "block size {} must be within 1..={}",
                block_size, MAX_BLOCK_SIZE
            )));
        }
        Ok(Self {
            name: name.into(),
            data: data.into(),
            block_size,
            next_block: 0,
            current: Vec::new(),
            current_pos: 0,
        })
    }

    /// Loads the block whose header starts at `next_block`. Returns `false`
    /// when there are no more blocks.
    fn read_block(&mut self) -> Result<bool, CodecError> {
        if self.next_block == self.data.len() {
            return Ok(false);
        }
        let header_end = self.next_block + BLOCK_HEADER_SIZE;
        let header_bytes = self.data.get(self.next_block..header_end).ok_or_else(|| {
            CodecError::TruncatedStream(format!(
                "{}: block header at {} is cut short",
                self.name, self.next_block
            ))
        })?;
        let header = u32::from_le_bytes([header_bytes[0], header_bytes[1], header_bytes[2], 0]);
        let is_original = header & 1 == 1;
        let payload_len = (header >> 1) as usize;

        let payload = self
            .data
            .get(header_end..header_end + payload_len)
            .ok_or_else(|| {
                CodecError::TruncatedStream(format!(
                    "{}: block at {} declares {} bytes but the stream ends first",
                    self.name, self.next_block, payload_len
                ))
            })?;

        self.current = if is_original {
            if payload_len > self.block_size {
                return Err(CodecError::BufferMismatch(self.block_size, payload_len));
            }
            payload.to_vec()
        } else {
            zstd::decode(payload, self.block_size)?
        };
        self.current_pos = 0;
        self.next_block = header_end + payload_len;
        Ok(true)
    }
}

impl ByteSource for CompressedInStream {
    fn read_byte(&mut self) -> Result<Option<u8>, CodecError> {
        // Loop so that empty blocks are stepped over.
        while self.current_pos == self.current.len() {
            if !self.read_block()? {
                return Ok(None);
            }
        }
        let byte = self.current[self.current_pos];
        self.current_pos += 1;
        Ok(Some(byte))
    }

    fn available(&self) -> usize {
        (self.current.len() - self.current_pos) + (self.data.len() - self.next_block)
    }

    fn seek(&mut self, index: &mut dyn PositionProvider) -> Result<(), CodecError> {
        let block = position_to_offset(index.next_position()?, "block offset")?;
        let offset = position_to_offset(index.next_position()?, "offset in block")?;
        if block > self.data.len() {
            return Err(CodecError::InvalidCheckpoint(format!(
                "{}: block offset {} past the end ({} bytes)",
                self.name,
                block,
                self.data.len()
            )));
        }

        self.next_block = block;
        self.current.clear();
        self.current_pos = 0;
        if block == self.data.len() && offset == 0 {
            // A position recorded after the final block: nothing left to read.
            return Ok(());
        }
        if !self.read_block()? || offset > self.current.len() {
            return Err(CodecError::InvalidCheckpoint(format!(
                "{}: offset {} does not exist in block at {}",
                self.name, offset, block
            )));
        }
        self.current_pos = offset;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

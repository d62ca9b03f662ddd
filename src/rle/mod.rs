// In: src/rle/mod.rs

//! The integer run-length codec.
//!
//! A stream is a plain concatenation of runs, each introduced by one control
//! byte:
//!
//! ```text
//! repeat_run  := control(0x00..=0x7F) delta(u8 as i8) base_varint
//!                count = control + MIN_REPEAT_SIZE
//! literal_run := control(0x80..=0xFF) value_varint{count}
//!                count = 0x100 - control
//! ```
//!
//! Varints are zig-zag mapped for signed streams and plain for unsigned ones;
//! the delta byte is always a raw two's-complement byte.

pub mod reader;
pub mod writer;

pub use reader::RunLengthIntegerReader;
pub use writer::{RunLengthIntegerWriter, WriterStats};

use crate::error::CodecError;
use crate::stream::{PositionProvider, PositionRecorder};
use crate::vector::{self, LongColumnVector};

//==================================================================================
// 0. Constants
//==================================================================================

/// The shortest progression worth emitting as a repeating run.
pub const MIN_REPEAT_SIZE: usize = 3;
/// The longest literal run a single control byte can describe.
pub const MAX_LITERAL_SIZE: usize = 128;
/// The longest repeating run a single control byte can describe.
pub const MAX_REPEAT_SIZE: usize = 127 + MIN_REPEAT_SIZE;
/// The smallest delta a repeating run can carry.
pub const MIN_DELTA: i64 = i8::MIN as i64;
/// The largest delta a repeating run can carry.
pub const MAX_DELTA: i64 = i8::MAX as i64;

//==================================================================================
// 1. The Run Model
//==================================================================================

/// One decoded run. Which payload is valid is carried by the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Run {
    /// `base, base + delta, base + 2*delta, ...` with wrapping arithmetic.
    Repeat { base: i64, delta: i8 },
    /// Individually stored values; only the first `count` slots are live.
    Literal { values: [i64; MAX_LITERAL_SIZE] },
}

impl Run {
    /// The value at `index` within the run.
    #[inline]
    pub fn value_at(&self, index: usize) -> i64 {
        match self {
            Run::Repeat { base, delta } => {
                base.wrapping_add((index as i64).wrapping_mul(*delta as i64))
            }
            Run::Literal { values } => values[index],
        }
    }
}

//==================================================================================
// 2. Reader / Writer Traits
//==================================================================================

/// A reader over a sequence of integers.
pub trait IntegerReader {
    /// True if another value can be read. Never consumes input.
    fn has_next(&self) -> bool;

    /// The next value. Calling this past the end of the stream is an error.
    fn next(&mut self) -> Result<i64, CodecError>;

    /// Repositions the reader at a checkpoint recorded by the matching writer.
    fn seek(&mut self, index: &mut dyn PositionProvider) -> Result<(), CodecError>;

    /// Advances past `num_values` values without returning them.
    fn skip(&mut self, num_values: u64) -> Result<(), CodecError>;

    /// Fills the first `len` slots of `vector`, leaving null slots set to the
    /// sentinel and deriving `is_repeating`.
    fn next_vector(&mut self, vector: &mut LongColumnVector, len: usize) -> Result<(), CodecError> {
        vector::fill(self, vector, len)
    }
}

/// A writer of a sequence of integers.
pub trait IntegerWriter {
    fn write(&mut self, value: i64) -> Result<(), CodecError>;

    /// Emits every buffered value and flushes the underlying sink.
    fn flush(&mut self) -> Result<(), CodecError>;

    /// Records the position of the next value to be written.
    fn record_position(&self, recorder: &mut dyn PositionRecorder);
}

#[cfg(test)]
mod codec_tests;

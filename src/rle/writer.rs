//! The adaptive run-length encoder.
//!
//! Values are buffered until the writer can decide between a literal run and
//! a repeating run. The writer watches the trailing "tail" of the buffer: once
//! `MIN_REPEAT_SIZE` values form a progression with a delta that fits in a
//! signed byte, everything before the tail is emitted as literals and the tail
//! becomes a repeating run that grows until the progression breaks or the
//! control byte saturates.

use super::{IntegerWriter, MAX_DELTA, MAX_LITERAL_SIZE, MAX_REPEAT_SIZE, MIN_DELTA, MIN_REPEAT_SIZE};
use crate::error::CodecError;
use crate::kernels::varint;
use crate::stream::{ByteSink, PositionRecorder};

/// What the buffered values will be emitted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingRun {
    Literals,
    /// `literals[0]` is the base.
    Repeat { delta: i8 },
}

/// Running totals, surfaced through `log_metric!` on every flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterStats {
    pub values: u64,
    pub repeat_runs: u64,
    pub literal_runs: u64,
}

#[derive(Debug)]
pub struct RunLengthIntegerWriter<W: ByteSink> {
    output: W,
    signed: bool,
    literals: [i64; MAX_LITERAL_SIZE],
    num_literals: usize,
    pending: PendingRun,
    /// Delta shared by the last `tail_run_length` buffered values.
    tail_delta: i64,
    tail_run_length: usize,
    stats: WriterStats,
}

impl<W: ByteSink> RunLengthIntegerWriter<W> {
    pub fn new(output: W, signed: bool) -> Self {
        Self {
            output,
            signed,
            literals: [0; MAX_LITERAL_SIZE],
            num_literals: 0,
            pending: PendingRun::Literals,
            tail_delta: 0,
            tail_run_length: 0,
            stats: WriterStats::default(),
        }
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }

    pub fn stats(&self) -> WriterStats {
        self.stats
    }

    /// Flushes and hands back the sink.
    pub fn into_inner(mut self) -> Result<W, CodecError> {
        IntegerWriter::flush(&mut self)?;
        Ok(self.output)
    }

    #[inline]
    fn write_varint(&mut self, value: i64) -> Result<(), CodecError> {
        if self.signed {
            varint::write_signed(&mut self.output, value)
        } else {
            varint::write_unsigned(&mut self.output, value as u64)
        }
    }

    /// Emits the buffered values as one run and resets the buffer.
    fn write_values(&mut self) -> Result<(), CodecError> {
        if self.num_literals == 0 {
            return Ok(());
        }
        match self.pending {
            PendingRun::Repeat { delta } => {
                self.output
                    .write_byte((self.num_literals - MIN_REPEAT_SIZE) as u8)?;
                self.output.write_byte(delta as u8)?;
                self.write_varint(self.literals[0])?;
                self.stats.repeat_runs += 1;
            }
            PendingRun::Literals => {
                self.output.write_byte((0x100 - self.num_literals) as u8)?;
                for i in 0..self.num_literals {
                    self.write_varint(self.literals[i])?;
                }
                self.stats.literal_runs += 1;
            }
        }
        self.pending = PendingRun::Literals;
        self.num_literals = 0;
        self.tail_run_length = 0;
        Ok(())
    }

    fn start_buffer(&mut self, value: i64) {
        self.literals[0] = value;
        self.num_literals = 1;
        self.tail_run_length = 1;
    }

    /// Updates the tail tracking for `value` following the last literal.
    fn extend_tail(&mut self, value: i64) {
        let last = self.literals[self.num_literals - 1];
        if self.tail_run_length > 1 && value == last.wrapping_add(self.tail_delta) {
            self.tail_run_length += 1;
            return;
        }
        let delta = value.wrapping_sub(last);
        if (MIN_DELTA..=MAX_DELTA).contains(&delta) {
            self.tail_delta = delta;
            self.tail_run_length = 2;
        } else {
            self.tail_run_length = 1;
        }
    }
}

impl<W: ByteSink> IntegerWriter for RunLengthIntegerWriter<W> {
    fn write(&mut self, value: i64) -> Result<(), CodecError> {
        self.stats.values += 1;
        if self.num_literals == 0 {
            self.start_buffer(value);
            return Ok(());
        }

        match self.pending {
            PendingRun::Repeat { delta } => {
                let expected = self.literals[0]
                    .wrapping_add((delta as i64).wrapping_mul(self.num_literals as i64));
                if value == expected {
                    self.num_literals += 1;
                    if self.num_literals == MAX_REPEAT_SIZE {
                        self.write_values()?;
                    }
                } else {
                    self.write_values()?;
                    self.start_buffer(value);
                }
            }
            PendingRun::Literals => {
                self.extend_tail(value);
                if self.tail_run_length == MIN_REPEAT_SIZE {
                    // The delta was range-checked when the tail started.
                    let delta = PendingRun::Repeat {
                        delta: self.tail_delta as i8,
                    };
                    if self.num_literals + 1 == MIN_REPEAT_SIZE {
                        self.pending = delta;
                        self.num_literals += 1;
                    } else {
                        self.num_literals -= MIN_REPEAT_SIZE - 1;
                        let base = self.literals[self.num_literals];
                        self.write_values()?;
                        self.literals[0] = base;
                        self.pending = delta;
                        self.num_literals = MIN_REPEAT_SIZE;
                    }
                } else {
                    self.literals[self.num_literals] = value;
                    self.num_literals += 1;
                    if self.num_literals == MAX_LITERAL_SIZE {
                        self.write_values()?;
                    }
                }
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), CodecError> {
        self.write_values()?;
        self.output.flush()?;
        log_metric!(
            "event" = "rle_flush",
            "values" = self.stats.values,
            "repeat_runs" = self.stats.repeat_runs,
            "literal_runs" = self.stats.literal_runs
        );
        Ok(())
    }

    fn record_position(&self, recorder: &mut dyn PositionRecorder) {
        self.output.record_position(recorder);
        recorder.add_position(self.num_literals as u64);
    }
}

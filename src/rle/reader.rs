//! The stateful run-length decoder.

use super::{IntegerReader, Run, MAX_LITERAL_SIZE, MIN_REPEAT_SIZE};
use crate::error::CodecError;
use crate::kernels::varint;
use crate::stream::{position_to_offset, ByteSource, PositionProvider};

/// Decodes integers from a run-length encoded `ByteSource`.
///
/// The reader is either awaiting a run (`used == run_len`) or serving values
/// from the run it holds. Each instance owns its cursor exclusively.
#[derive(Debug)]
pub struct RunLengthIntegerReader<S: ByteSource> {
    input: S,
    signed: bool,
    run: Option<Run>,
    run_len: usize,
    used: usize,
}

impl<S: ByteSource> RunLengthIntegerReader<S> {
    pub fn new(input: S, signed: bool) -> Self {
        Self {
            input,
            signed,
            run: None,
            run_len: 0,
            used: 0,
        }
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }

    /// Values left in the run currently held.
    pub fn remaining_in_run(&self) -> usize {
        self.run_len - self.used
    }

    pub fn into_inner(self) -> S {
        self.input
    }

    #[inline]
    fn read_varint(&mut self) -> Result<i64, CodecError> {
        if self.signed {
            varint::read_signed(&mut self.input)
        } else {
            varint::read_unsigned(&mut self.input).map(|v| v as i64)
        }
    }

    /// Reads one control byte and the run it introduces.
    fn read_values(&mut self) -> Result<(), CodecError> {
        self.used = 0;
        self.run_len = 0;

        let control = self.input.read_byte()?.ok_or_else(|| {
            CodecError::EndOfStream(format!(
                "Read past end of RLE integer from {}",
                self.input.name()
            ))
        })?;

        if control < 0x80 {
            let count = control as usize + MIN_REPEAT_SIZE;
            let delta = self.input.read_byte()?.ok_or_else(|| {
                CodecError::TruncatedStream(format!(
                    "End of stream in RLE integer delta from {}",
                    self.input.name()
                ))
            })? as i8;
            let base = self.read_varint()?;
            self.run = Some(Run::Repeat { base, delta });
            self.run_len = count;
        } else {
            let count = 0x100 - control as usize;
            // Reuse the literal buffer if the previous run had one.
            let mut values = match self.run.take() {
                Some(Run::Literal { values }) => values,
                _ => [0; MAX_LITERAL_SIZE],
            };
            for slot in values.iter_mut().take(count) {
                *slot = self.read_varint()?;
            }
            self.run = Some(Run::Literal { values });
            self.run_len = count;
        }
        log::trace!(
            "{}: loaded {} run of {} values",
            self.input.name(),
            if control < 0x80 { "repeat" } else { "literal" },
            self.run_len
        );
        Ok(())
    }
}

impl<S: ByteSource> IntegerReader for RunLengthIntegerReader<S> {
    fn has_next(&self) -> bool {
        self.used != self.run_len || self.input.available() > 0
    }

    fn next(&mut self) -> Result<i64, CodecError> {
        if self.used == self.run_len {
            self.read_values()?;
        }
        let run = self.run.as_ref().ok_or_else(|| {
            CodecError::InternalError("run-length reader holds no run after a load".to_string())
        })?;
        let value = run.value_at(self.used);
        self.used += 1;
        Ok(value)
    }

    fn seek(&mut self, index: &mut dyn PositionProvider) -> Result<(), CodecError> {
        self.input.seek(index)?;
        let mut consumed = position_to_offset(index.next_position()?, "element offset")?;
        log::debug!(
            "{}: seek with {} values already consumed from the run",
            self.input.name(),
            consumed
        );

        if consumed == 0 {
            self.used = 0;
            self.run_len = 0;
            return Ok(());
        }
        // A run buffered at checkpoint time may have been split in two by the
        // writer, so walk forward until the offset lands inside a run.
        while consumed > 0 {
            match self.read_values() {
                Err(CodecError::EndOfStream(_)) => {
                    return Err(CodecError::InvalidCheckpoint(format!(
                        "{}: stream ended with {} values of the checkpoint unresolved",
                        self.input.name(),
                        consumed
                    )));
                }
                other => other?,
            }
            self.used = consumed.min(self.run_len);
            consumed = consumed.saturating_sub(self.run_len);
        }
        Ok(())
    }

    fn skip(&mut self, mut num_values: u64) -> Result<(), CodecError> {
        while num_values > 0 {
            if self.used == self.run_len {
                self.read_values()?;
            }
            let consume = num_values.min((self.run_len - self.used) as u64);
            self.used += consume as usize;
            num_values -= consume;
        }
        Ok(())
    }
}

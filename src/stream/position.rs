//! The `Checkpoint` position list, produced during a write pass and consumed
//! by `seek` during a read pass.

use serde::{Deserialize, Serialize};

use super::{PositionProvider, PositionRecorder};
use crate::error::CodecError;

/// An opaque, ordered list of position components.
///
/// The leading components belong to the byte stream (one for raw streams,
/// two for compressed streams); the last one is the number of elements of the
/// current run that precede the checkpoint.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Checkpoint {
    positions: Vec<u64>,
}

impl Checkpoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_positions(positions: Vec<u64>) -> Self {
        Self { positions }
    }

    pub fn positions(&self) -> &[u64] {
        &self.positions
    }

    /// A fresh read cursor over the components, starting at the first one.
    pub fn provider(&self) -> CheckpointCursor<'_> {
        CheckpointCursor {
            positions: &self.positions,
            next: 0,
        }
    }
}

impl PositionRecorder for Checkpoint {
    fn add_position(&mut self, offset: u64) {
        self.positions.push(offset);
    }
}

/// Reads a `Checkpoint` front to back.
#[derive(Debug, Clone)]
pub struct CheckpointCursor<'a> {
    positions: &'a [u64],
    next: usize,
}

impl CheckpointCursor<'_> {
    /// Components not yet consumed.
    pub fn remaining(&self) -> usize {
        self.positions.len() - self.next
    }
}

impl PositionProvider for CheckpointCursor<'_> {
    fn next_position(&mut self) -> Result<u64, CodecError> {
        let value = self.positions.get(self.next).copied().ok_or_else(|| {
            CodecError::InvalidCheckpoint(format!(
                "checkpoint has only {} position components",
                self.positions.len()
            ))
        })?;
        self.next += 1;
        Ok(value)
    }
}

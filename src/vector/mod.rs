//! This module holds the columnar batch target the run-length reader
//! materializes into, and the bulk-fill routine itself.
//!
//! The null bitmap is a side channel: it is owned by the batch, written by
//! whoever decoded the validity stream, and only ever read here. Null slots
//! never consume a value from the run-length stream.

pub mod arrow_impl;

use crate::error::CodecError;
use crate::rle::IntegerReader;

/// The value stored in null slots. Arithmetic over unmasked null slots stays
/// well defined (no division by zero, no overflow from garbage).
pub const NULL_SENTINEL: i64 = 1;

/// The default number of rows in a batch.
pub const DEFAULT_BATCH_SIZE: usize = 1024;

/// A fixed-capacity batch of 64-bit integers with a parallel null mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongColumnVector {
    pub vector: Vec<i64>,
    pub is_null: Vec<bool>,
    /// True when no slot is null.
    pub no_nulls: bool,
    /// True when every filled slot has the same value and the same null flag.
    pub is_repeating: bool,
}

impl Default for LongColumnVector {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_BATCH_SIZE)
    }
}

impl LongColumnVector {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vector: vec![0; capacity],
            is_null: vec![false; capacity],
            no_nulls: true,
            is_repeating: false,
        }
    }

    /// Builds a batch whose null mask is `is_null`.
    pub fn from_null_mask(is_null: Vec<bool>) -> Self {
        let no_nulls = !is_null.iter().any(|&n| n);
        Self {
            vector: vec![0; is_null.len()],
            is_null,
            no_nulls,
            is_repeating: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.vector.len()
    }

    pub fn set_null(&mut self, index: usize, null: bool) {
        self.is_null[index] = null;
        if null {
            self.no_nulls = false;
        }
    }

    /// Clears values and flags so the batch can be reused.
    pub fn reset(&mut self) {
        self.vector.iter_mut().for_each(|v| *v = 0);
        self.is_null.iter_mut().for_each(|n| *n = false);
        self.no_nulls = true;
        self.is_repeating = false;
    }
}

/// Fills the first `len` slots of `vector` from `reader`.
///
/// Non-null slots take the next decoded value; null slots take
/// `NULL_SENTINEL` and leave the reader untouched. `is_repeating` ends up true
/// only if every adjacent pair agrees on both null flag and value, so a batch
/// made only of nulls is repeating. `no_nulls` is recomputed from the mask,
/// which callers may have written directly.
pub fn fill<R>(reader: &mut R, vector: &mut LongColumnVector, len: usize) -> Result<(), CodecError>
where
    R: IntegerReader + ?Sized,
{
    if len > vector.capacity() || len > vector.is_null.len() {
        return Err(CodecError::BufferMismatch(vector.capacity(), len));
    }

    vector.is_repeating = true;
    vector.no_nulls = !vector.is_null[..len].iter().any(|&n| n);
    for i in 0..len {
        vector.vector[i] = if vector.is_null[i] {
            NULL_SENTINEL
        } else {
            reader.next()?
        };

        if vector.is_repeating
            && i > 0
            && (vector.vector[i - 1] != vector.vector[i] || vector.is_null[i - 1] != vector.is_null[i])
        {
            vector.is_repeating = false;
        }
    }
    Ok(())
}

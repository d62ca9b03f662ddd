// In: src/vector/arrow_impl.rs

//! Marshalling between `LongColumnVector` and Arrow.
//!
//! Arrow carries validity (`true` = valid) where the batch carries a null mask
//! (`true` = null); these helpers flip between the two conventions.

use arrow::array::Int64Array;
use arrow::buffer::{NullBuffer, ScalarBuffer};

use super::LongColumnVector;
use crate::error::CodecError;

impl LongColumnVector {
    /// Builds a batch of `len` slots whose null mask mirrors `nulls`.
    pub fn from_null_buffer(nulls: Option<&NullBuffer>, len: usize) -> Result<Self, CodecError> {
        match nulls {
            None => Ok(Self::with_capacity(len)),
            Some(nb) => {
                if nb.len() < len {
                    return Err(CodecError::BufferMismatch(len, nb.len()));
                }
                Ok(Self::from_null_mask((0..len).map(|i| nb.is_null(i)).collect()))
            }
        }
    }

    /// Copies the first `len` slots into an Arrow `Int64Array`. Null slots
    /// become Arrow nulls; the sentinel stays in the (masked) value buffer.
    pub fn to_arrow(&self, len: usize) -> Result<Int64Array, CodecError> {
        if len > self.capacity() || len > self.is_null.len() {
            return Err(CodecError::BufferMismatch(self.capacity(), len));
        }
        let values = ScalarBuffer::from(self.vector[..len].to_vec());
        // The mask is authoritative; `no_nulls` may be stale if it was written directly.
        let mask = &self.is_null[..len];
        let nulls = if mask.iter().any(|&n| n) {
            let validity: Vec<bool> = mask.iter().map(|&n| !n).collect();
            Some(NullBuffer::from(validity))
        } else {
            None
        };
        Ok(Int64Array::try_new(values, nulls)?)
    }
}

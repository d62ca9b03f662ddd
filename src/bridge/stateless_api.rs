// In: src/bridge/stateless_api.rs

use std::sync::Arc;

use arrow::array::Int64Array;
use arrow::buffer::{NullBuffer, ScalarBuffer};

use crate::config::CodecConfig;
use crate::error::CodecError;
use crate::rle::{IntegerReader, IntegerWriter};
use crate::stream::Checkpoint;
use crate::vector::LongColumnVector;

/// Encodes `values` as one run-length stream.
pub fn encode_integers(values: &[i64], config: &CodecConfig) -> Result<Vec<u8>, CodecError> {
    let mut writer = config.open_writer("encode_integers")?;
    for &value in values {
        writer.write(value)?;
    }
    let bytes = writer.into_inner()?.finish()?;
    log::debug!(
        "encoded {} values into {} bytes ({:?})",
        values.len(),
        bytes.len(),
        config.compression
    );
    Ok(bytes)
}

/// Encodes `values`, recording a checkpoint before every `stride`-th value.
///
/// Checkpoint `i` positions a reader at value `i * stride`, which is what a
/// row index hands to predicate pushdown or to a split reader.
pub fn encode_with_checkpoints(
    values: &[i64],
    config: &CodecConfig,
    stride: usize,
) -> Result<(Vec<u8>, Vec<Checkpoint>), CodecError> {
    if stride == 0 {
        return Err(CodecError::InvalidConfig(
            "checkpoint stride must be at least 1".to_string(),
        ));
    }
    let mut writer = config.open_writer("encode_with_checkpoints")?;
    let mut checkpoints = Vec::with_capacity(values.len() / stride + 1);
    for (i, &value) in values.iter().enumerate() {
        if i % stride == 0 {
            let mut checkpoint = Checkpoint::new();
            writer.record_position(&mut checkpoint);
            checkpoints.push(checkpoint);
        }
        writer.write(value)?;
    }
    let bytes = writer.into_inner()?.finish()?;
    Ok((bytes, checkpoints))
}

/// Decodes exactly `num_values` values.
pub fn decode_integers(
    bytes: impl Into<Arc<[u8]>>,
    config: &CodecConfig,
    num_values: usize,
) -> Result<Vec<i64>, CodecError> {
    let mut reader = config.open_reader("decode_integers", bytes)?;
    (0..num_values).map(|_| reader.next()).collect()
}

/// Decodes values until the stream reports no more input.
pub fn decode_all(bytes: impl Into<Arc<[u8]>>, config: &CodecConfig) -> Result<Vec<i64>, CodecError> {
    let mut reader = config.open_reader("decode_all", bytes)?;
    let mut values = Vec::new();
    while reader.has_next() {
        values.push(reader.next()?);
    }
    Ok(values)
}

/// Seeks to `checkpoint` and decodes the next `num_values` values.
pub fn decode_from_checkpoint(
    bytes: impl Into<Arc<[u8]>>,
    config: &CodecConfig,
    checkpoint: &Checkpoint,
    num_values: usize,
) -> Result<Vec<i64>, CodecError> {
    let mut reader = config.open_reader("decode_from_checkpoint", bytes)?;
    reader.seek(&mut checkpoint.provider())?;
    (0..num_values).map(|_| reader.next()).collect()
}

/// Decodes a nullable column of `num_rows` rows into an Arrow array.
///
/// The stream holds only the non-null values; `nulls` is the column's
/// validity side channel. Rows are materialized `vector_batch_size` at a time.
pub fn decode_nullable_to_arrow(
    bytes: impl Into<Arc<[u8]>>,
    config: &CodecConfig,
    nulls: Option<&NullBuffer>,
    num_rows: usize,
) -> Result<Int64Array, CodecError> {
    if let Some(nb) = nulls {
        if nb.len() < num_rows {
            return Err(CodecError::BufferMismatch(num_rows, nb.len()));
        }
    }
    let mut reader = config.open_reader("decode_nullable_to_arrow", bytes)?;
    let batch_size = config.vector_batch_size;
    let mut batch = LongColumnVector::with_capacity(batch_size);
    let mut values = Vec::with_capacity(num_rows);
    let mut constant_batches = 0usize;

    let mut start = 0;
    while start < num_rows {
        let len = batch_size.min(num_rows - start);
        batch.reset();
        if let Some(nb) = nulls {
            for i in 0..len {
                batch.set_null(i, nb.is_null(start + i));
            }
        }
        reader.next_vector(&mut batch, len)?;
        if batch.is_repeating {
            constant_batches += 1;
        }
        values.extend_from_slice(&batch.vector[..len]);
        start += len;
    }
    log_metric!(
        "event" = "decode_nullable_to_arrow",
        "rows" = num_rows,
        "constant_batches" = constant_batches
    );

    let validity = nulls
        .filter(|nb| nb.null_count() > 0)
        .map(|nb| nb.slice(0, num_rows));
    Ok(Int64Array::try_new(ScalarBuffer::from(values), validity)?)
}

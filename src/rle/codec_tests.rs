//! End-to-end properties of the run-length writer and reader working together.

use super::*;
use crate::stream::{
    ByteSink, ByteSource, Checkpoint, CompressedInStream, CompressedOutStream, InStream, OutStream,
};
use rand::rngs::StdRng;
use std::sync::Arc;
use rand::{Rng, SeedableRng};

//==================================================================================
// Helpers
//==================================================================================

fn encode_raw(values: &[i64], signed: bool) -> Vec<u8> {
    let mut writer = RunLengthIntegerWriter::new(OutStream::new("test"), signed);
    for &v in values {
        writer.write(v).unwrap();
    }
    writer.into_inner().unwrap().into_bytes()
}

fn decode_raw(bytes: Vec<u8>, signed: bool, count: usize) -> Vec<i64> {
    let mut reader = RunLengthIntegerReader::new(InStream::new("test", bytes), signed);
    let values = (0..count).map(|_| reader.next().unwrap()).collect();
    assert!(!reader.has_next(), "stream holds more than {} values", count);
    values
}

fn assert_roundtrip(values: &[i64], signed: bool) {
    let bytes = encode_raw(values, signed);
    assert_eq!(decode_raw(bytes, signed, values.len()), values);
}

/// Writes `values`, recording a checkpoint just before index `mark`.
fn encode_with_mark<W: ByteSink>(output: W, values: &[i64], mark: usize) -> (W, Checkpoint) {
    let mut writer = RunLengthIntegerWriter::new(output, true);
    let mut checkpoint = Checkpoint::new();
    for (i, &v) in values.iter().enumerate() {
        if i == mark {
            writer.record_position(&mut checkpoint);
        }
        writer.write(v).unwrap();
    }
    (writer.into_inner().unwrap(), checkpoint)
}

fn assert_resumes_at<S: ByteSource>(input: S, checkpoint: &Checkpoint, expected: &[i64]) {
    let mut reader = RunLengthIntegerReader::new(input, true);
    reader.seek(&mut checkpoint.provider()).unwrap();
    for &v in expected {
        assert_eq!(reader.next().unwrap(), v);
    }
    assert!(!reader.has_next());
}

//==================================================================================
// Round trips
//==================================================================================

#[test]
fn test_roundtrip_shapes() {
    crate::observability::init_test_logging();
    let literal: Vec<i64> = (0..50).map(|i| (i * 7919) % 613).collect();
    let repeating = vec![42i64; 1000];
    let progression: Vec<i64> = (0..777).map(|i| 10_000 - 3 * i).collect();
    let mut mixed = literal.clone();
    mixed.extend(&repeating);
    mixed.extend(&progression);
    mixed.extend(&literal);

    for values in [&literal, &repeating, &progression, &mixed] {
        assert_roundtrip(values, true);
        assert_roundtrip(values, false);
    }
}

#[test]
fn test_roundtrip_negative_values_signed() {
    let values: Vec<i64> = (0..300).map(|i| -(i * i) + 17).collect();
    assert_roundtrip(&values, true);
}

#[test]
fn test_roundtrip_extreme_values() {
    let values = vec![
        i64::MIN,
        i64::MAX,
        i64::MIN,
        0,
        -1,
        1,
        i64::MAX,
        i64::MAX - 1,
        i64::MAX - 2,
        i64::MIN + 127,
        i64::MIN,
    ];
    assert_roundtrip(&values, true);
    assert_roundtrip(&values, false);
}

#[test]
fn test_roundtrip_wrapping_progression() {
    // Deltas that overflow i64 still reproduce the same bit patterns.
    let values: Vec<i64> = (0..10).map(|i| i64::MAX.wrapping_add(i * 100)).collect();
    assert_roundtrip(&values, true);
}

#[test]
fn test_roundtrip_random() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    for _ in 0..20 {
        let len = rng.random_range(0..3000);
        let values: Vec<i64> = (0..len)
            .map(|_| match rng.random_range(0..4) {
                0 => rng.random::<i64>(),
                1 => rng.random_range(-5..5),
                2 => 7,
                _ => rng.random_range(0..1_000_000),
            })
            .collect();
        assert_roundtrip(&values, true);
        assert_roundtrip(&values, false);
    }
}

#[test]
fn test_roundtrip_random_runs() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut values = Vec::new();
    while values.len() < 20_000 {
        let base: i64 = rng.random_range(-1_000_000..1_000_000);
        let delta: i64 = rng.random_range(-130..130);
        let len = rng.random_range(1..400);
        values.extend((0..len).map(|i| base + i * delta));
    }
    assert_roundtrip(&values, true);
}

//==================================================================================
// Run boundaries
//==================================================================================

#[test]
fn test_literal_then_repeat_boundary() {
    // One literal then a three-value progression.
    let bytes = encode_raw(&[9, 1, 2, 3], false);
    assert_eq!(bytes, vec![0xFF, 0x09, 0x00, 0x01, 0x01]);
    assert_eq!(decode_raw(bytes, false, 4), vec![9, 1, 2, 3]);
}

#[test]
fn test_literal_run_is_capped() {
    let values: Vec<i64> = (0..129).map(|i| i * i).collect();
    let bytes = encode_raw(&values, false);
    assert_eq!(bytes[0], 0x80);

    let mut reader = RunLengthIntegerReader::new(InStream::new("test", bytes), false);
    for &v in &values[..128] {
        assert_eq!(reader.next().unwrap(), v);
    }
    assert_eq!(reader.remaining_in_run(), 0);
    assert_eq!(reader.next().unwrap(), values[128]);
}

#[test]
fn test_repeat_run_is_capped() {
    let values = vec![3i64; 1000];
    let bytes = encode_raw(&values, true);
    // 7 full runs of 130 and one of 90.
    assert_eq!(bytes.len(), 8 * 3);
    for chunk in bytes.chunks(3).take(7) {
        assert_eq!(chunk, &[0x7F, 0x00, 0x06]);
    }
    assert_eq!(&bytes[21..], &[90 - 3, 0x00, 0x06]);
    assert_eq!(decode_raw(bytes, true, 1000), values);
}

#[test]
fn test_delta_out_of_range_stays_literal() {
    let values = vec![0i64, 200, 400, 600];
    let bytes = encode_raw(&values, false);
    assert_eq!(bytes[0], 0xFC);
    assert_eq!(decode_raw(bytes, false, 4), values);
}

//==================================================================================
// Seek and skip
//==================================================================================

#[test]
fn test_seek_to_recorded_position() {
    let values: Vec<i64> = (0..10_000).collect();
    let (out, checkpoint) = encode_with_mark(OutStream::new("seek"), &values, 4321);
    assert_eq!(checkpoint.positions().len(), 2);
    assert_resumes_at(
        InStream::new("seek", out.into_bytes()),
        &checkpoint,
        &values[4321..],
    );
}

#[test]
fn test_seek_through_compressed_stream() {
    let values: Vec<i64> = (0..10_000).map(|i| (i / 7) * 3 + (i % 2)).collect();
    let out = CompressedOutStream::new("seek", 256, 3).unwrap();
    let (out, checkpoint) = encode_with_mark(out, &values, 4321);
    assert_eq!(checkpoint.positions().len(), 3);
    let bytes = out.into_bytes().unwrap();
    let input = CompressedInStream::new("seek", bytes, 256).unwrap();
    assert_resumes_at(input, &checkpoint, &values[4321..]);
}

#[test]
fn test_compressed_seek_on_block_boundaries_and_at_end() {
    // A saturated repeat run of a small value is exactly three bytes, so with
    // three-byte blocks every run fills one block and ends on its boundary.
    let values: Vec<i64> = (0..130 * 40).map(|i| (i / 130) % 50).collect();
    let out = CompressedOutStream::new("edge", 3, 3).unwrap();
    let mut writer = RunLengthIntegerWriter::new(out, true);
    let mut checkpoints = Vec::with_capacity(values.len());
    for &v in &values {
        let mut checkpoint = Checkpoint::new();
        writer.record_position(&mut checkpoint);
        checkpoints.push(checkpoint);
        writer.write(v).unwrap();
    }
    let mut end = Checkpoint::new();
    writer.record_position(&mut end);
    let bytes: Arc<[u8]> = writer.into_inner().unwrap().into_bytes().unwrap().into();

    // 40 raw-stored blocks of header + run.
    assert_eq!(bytes.len(), 40 * 6);
    assert_eq!(end.positions(), &[bytes.len() as u64, 0, 0]);

    let boundaries: Vec<usize> = checkpoints
        .iter()
        .enumerate()
        .filter(|(_, c)| c.positions()[0] > 0 && c.positions()[1] == 0 && c.positions()[2] == 0)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(boundaries, (1..40).map(|k| k * 130).collect::<Vec<usize>>());

    for (i, checkpoint) in checkpoints.iter().enumerate() {
        if i % 17 != 0 && !boundaries.contains(&i) {
            continue;
        }
        let input = CompressedInStream::new("edge", bytes.clone(), 3).unwrap();
        let mut reader = RunLengthIntegerReader::new(input, true);
        reader.seek(&mut checkpoint.provider()).unwrap();
        for &v in values[i..].iter().take(200) {
            assert_eq!(reader.next().unwrap(), v, "checkpoint {}", i);
        }
    }

    let input = CompressedInStream::new("edge", bytes.clone(), 3).unwrap();
    let mut reader = RunLengthIntegerReader::new(input, true);
    reader.seek(&mut end.provider()).unwrap();
    assert!(!reader.has_next());
    let err = reader.next().unwrap_err();
    assert!(matches!(err, CodecError::EndOfStream(_)));
    assert!(err.is_end_of_input());
}

#[test]
fn test_seek_into_a_run_split_after_the_checkpoint() {
    // [10, 50, 7] are buffered as literals when the checkpoint is taken;
    // 8 and 9 then turn [7, 8, 9] into a repeat run, splitting the buffer.
    let (out, checkpoint) = encode_with_mark(OutStream::new("split"), &[10, 50, 7, 8, 9], 3);
    assert_eq!(checkpoint.positions(), &[0, 3]);
    assert_resumes_at(InStream::new("split", out.into_bytes()), &checkpoint, &[8, 9]);
}

#[test]
fn test_seek_to_every_position() {
    let mut rng = StdRng::seed_from_u64(7);
    let values: Vec<i64> = (0..600)
        .map(|i| if i % 97 < 50 { 11 } else { rng.random_range(0..50) })
        .collect();
    for mark in (0..values.len()).step_by(13) {
        let (out, checkpoint) = encode_with_mark(OutStream::new("every"), &values, mark);
        assert_resumes_at(
            InStream::new("every", out.into_bytes()),
            &checkpoint,
            &values[mark..],
        );
    }
}

#[test]
fn test_skip_then_next() {
    let values: Vec<i64> = (0..1000).collect();
    let mut reader = RunLengthIntegerReader::new(InStream::new("skip", encode_raw(&values, true)), true);
    reader.skip(500).unwrap();
    assert_eq!(reader.next().unwrap(), 500);
    reader.skip(0).unwrap();
    assert_eq!(reader.next().unwrap(), 501);
    reader.skip(497).unwrap();
    assert_eq!(reader.next().unwrap(), 999);
    assert!(!reader.has_next());
}

#[test]
fn test_skip_past_end_fails() {
    let mut reader = RunLengthIntegerReader::new(InStream::new("skip", encode_raw(&[1, 2, 3], true)), true);
    assert!(matches!(reader.skip(4), Err(CodecError::EndOfStream(_))));
}

#[test]
fn test_skip_matches_next_on_random_data() {
    let mut rng = StdRng::seed_from_u64(99);
    let values: Vec<i64> = (0..5000)
        .map(|i| if (i / 200) % 2 == 0 { i / 10 } else { rng.random_range(-1000..1000) })
        .collect();
    let bytes = encode_raw(&values, true);
    let mut reader = RunLengthIntegerReader::new(InStream::new("skip", bytes), true);
    let mut index = 0usize;
    while index < values.len() {
        assert_eq!(reader.next().unwrap(), values[index]);
        index += 1;
        let jump = rng.random_range(0..300).min(values.len() - index);
        reader.skip(jump as u64).unwrap();
        index += jump;
    }
    assert!(!reader.has_next());
}

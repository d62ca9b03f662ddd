// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the one-shot facade over the streaming codec. Callers that
// hold a whole column in memory use it instead of wiring streams, writers and
// readers by hand.
//
// Data Flow (Encoding):
//
//   1. [CodecConfig::open_writer]  -> RunLengthIntegerWriter over the configured sink
//         |
//         `-> optional: record a Checkpoint every `stride` values (row index)
//         |
//   2. [FinishableSink::finish]    -> Vec<u8> (raw or zstd-framed runs)
//
// Data Flow (Decoding):
//
//   1. [CodecConfig::open_reader]  -> RunLengthIntegerReader over the configured source
//         |
//         `-> optional: seek to a Checkpoint (split / predicate pushdown)
//         |
//   2. next() / next_vector()      -> Vec<i64> or an Arrow Int64Array
//
// ====================================================================================
pub mod stateless_api;

pub use stateless_api::{
    decode_all, decode_from_checkpoint, decode_integers, decode_nullable_to_arrow,
    encode_integers, encode_with_checkpoints,
};

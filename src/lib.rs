//! This file is the root of the `rle_codec` crate: the integer run-length
//! codec of a columnar storage engine.
//!
//! Its responsibilities are strictly limited to declaring the modules of the
//! library and re-exporting the types callers need:
//!
//! * `kernels`  - varint, zig-zag and zstd block kernels
//! * `stream`   - byte source/sink traits, checkpoints, raw and compressed streams
//! * `rle`      - the run-length reader and writer
//! * `vector`   - the columnar batch target and vectorized materialization
//! * `bridge`   - one-shot encode/decode helpers driven by `CodecConfig`

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

pub mod bridge;
pub mod config;
pub mod kernels;
pub mod rle;
pub mod stream;
pub mod vector;

mod error;
pub mod traits;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use config::{CodecConfig, CompressionKind};
pub use error::CodecError;
pub use observability::init_logging;
pub use rle::{IntegerReader, IntegerWriter, Run, RunLengthIntegerReader, RunLengthIntegerWriter};
pub use stream::{ByteSink, ByteSource, Checkpoint, PositionProvider, PositionRecorder};
pub use vector::LongColumnVector;

// In: src/config.rs

//! The single source of truth for codec configuration.
//!
//! `CodecConfig` is created once at the application boundary (usually from a
//! JSON document) and decides the stream's signedness, its block framing, and
//! the batch size used when materializing vectors. It also acts as the factory
//! for matching writer/reader pairs, so both sides of a stream are always
//! built from the same settings.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::rle::{RunLengthIntegerReader, RunLengthIntegerWriter};
use crate::stream::compressed::MAX_BLOCK_SIZE;
use crate::stream::{
    ByteSource, CompressedInStream, CompressedOutStream, FinishableSink, InStream, OutStream,
};
use crate::vector::DEFAULT_BATCH_SIZE;

//==================================================================================
// I. Core Configuration Enums & Structs
//==================================================================================

/// How the run-length bytes are framed on their way to storage.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompressionKind {
    /// **Default:** raw bytes, one position component per checkpoint.
    #[default]
    None,

    /// Zstandard-compressed blocks, two position components per checkpoint.
    Zstd,
}

/// The unified configuration for one integer stream.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct CodecConfig {
    /// Zig-zag (signed) or plain (unsigned) varints. Fixed for the stream's lifetime.
    #[serde(default = "default_true")]
    pub signed: bool,

    #[serde(default)]
    pub compression: CompressionKind,

    /// Zstd level; ignored unless `compression` is `zstd`.
    #[serde(default = "default_zstd_level")]
    pub zstd_level: i32,

    /// Uncompressed bytes per compressed block.
    #[serde(default = "default_block_size")]
    pub block_size: usize,

    /// Rows per `LongColumnVector` when decoding in batches.
    #[serde(default = "default_vector_batch_size")]
    pub vector_batch_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            signed: true,
            compression: CompressionKind::default(),
            zstd_level: default_zstd_level(),
            block_size: default_block_size(),
            vector_batch_size: default_vector_batch_size(),
        }
    }
}

/// Helper for `serde` to default a boolean field to true.
fn default_true() -> bool {
    true
}

fn default_zstd_level() -> i32 {
    3
}

fn default_block_size() -> usize {
    256 * 1024
}

fn default_vector_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

//==================================================================================
// II. Loading & Validation
//==================================================================================

impl CodecConfig {
    /// Parses and validates a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, CodecError> {
        let config: CodecConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), CodecError> {
        if self.vector_batch_size == 0 {
            return Err(CodecError::InvalidConfig(
                "vector_batch_size must be at least 1".to_string(),
            ));
        }
        if self.compression == CompressionKind::Zstd {
            if self.block_size == 0 || self.block_size > MAX_BLOCK_SIZE {
                return Err(CodecError::InvalidConfig(format!(
                    "block_size {} must be within 1..={}",
                    self.block_size, MAX_BLOCK_SIZE
                )));
            }
            let levels = ::zstd::compression_level_range();
            if !levels.contains(&self.zstd_level) {
                return Err(CodecError::InvalidConfig(format!(
                    "zstd_level {} is outside {:?}",
                    self.zstd_level, levels
                )));
            }
        }
        Ok(())
    }

    //==============================================================================
    // III. Stream Factories
    //==============================================================================

    /// Builds the byte sink for this configuration.
    pub fn open_sink(&self, name: &str) -> Result<Box<dyn FinishableSink>, CodecError> {
        self.validate()?;
        Ok(match self.compression {
            CompressionKind::None => Box::new(OutStream::new(name)),
            CompressionKind::Zstd => {
                Box::new(CompressedOutStream::new(name, self.block_size, self.zstd_level)?)
            }
        })
    }

    /// Builds the byte source over `data` for this configuration.
    pub fn open_source(
        &self,
        name: &str,
        data: impl Into<Arc<[u8]>>,
    ) -> Result<Box<dyn ByteSource>, CodecError> {
        self.validate()?;
        Ok(match self.compression {
            CompressionKind::None => Box::new(InStream::new(name, data)),
            CompressionKind::Zstd => {
                Box::new(CompressedInStream::new(name, data, self.block_size)?)
            }
        })
    }

    pub fn open_writer(
        &self,
        name: &str,
    ) -> Result<RunLengthIntegerWriter<Box<dyn FinishableSink>>, CodecError> {
        Ok(RunLengthIntegerWriter::new(self.open_sink(name)?, self.signed))
    }

    pub fn open_reader(
        &self,
        name: &str,
        data: impl Into<Arc<[u8]>>,
    ) -> Result<RunLengthIntegerReader<Box<dyn ByteSource>>, CodecError> {
        Ok(RunLengthIntegerReader::new(
            self.open_source(name, data)?,
            self.signed,
        ))
    }
}

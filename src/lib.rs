pub mod block;
pub mod broadlink;
pub mod compress;
pub mod convert;
pub mod error;
pub mod matcher;

pub use block::{decompress, summarize, Block, BlockReader, BlockWriter, StreamSummary};
pub use compress::compress;
pub use convert::{
    compress_to_base64, convert_broadlink_code, encode_base64, BroadlinkToTuya, CodeConverter,
    ConvertStats, DocumentConverter, ParallelConverter, SingleThreadedConverter,
};
pub use error::{Error, Result};
pub use matcher::{Match, MatchFinder, SuffixIndex};

/// Compression level for Tuya streams (0-3)
///
/// - Level 0: literal blocks only (about 3% larger than the input)
/// - Level 1: greedy, nearest usable match
/// - Level 2: greedy, best match among suffix-order neighbors
/// - Level 3: optimal parse (smallest output, slowest)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum CompressionLevel {
    Uncompressed = 0,
    Greedy = 1,
    #[default]
    Best = 2,
    Optimal = 3,
}

impl CompressionLevel {
    /// Get numeric level (0-3)
    pub fn level(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for CompressionLevel {
    type Error = Error;

    fn try_from(level: u8) -> Result<Self> {
        match level {
            0 => Ok(Self::Uncompressed),
            1 => Ok(Self::Greedy),
            2 => Ok(Self::Best),
            3 => Ok(Self::Optimal),
            other => Err(Error::InvalidLevel(other)),
        }
    }
}

/// Configuration for document conversion
#[derive(Clone, Debug)]
pub struct ConvertConfig {
    /// Compression level (0-3)
    pub level: CompressionLevel,
    /// Number of threads for parallel conversion (0 = auto, 1 = single-threaded)
    pub num_threads: usize,
}

impl ConvertConfig {
    /// Worker count after resolving auto-detection, clamped to 1-32
    pub fn effective_threads(&self) -> usize {
        match self.num_threads {
            0 => num_cpus::get().clamp(1, 32),
            n => n.clamp(1, 32),
        }
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self { level: CompressionLevel::default(), num_threads: 1 }
    }
}

//! Tuya stream compression at levels 0-3.
//!
//! - Level 0: literal blocks only
//! - Level 1: greedy, nearest usable match
//! - Level 2: greedy, best match among suffix-order neighbors (default)
//! - Level 3: minimum-size parse

pub mod greedy;
pub mod optimal;

pub use greedy::compress_greedy;
pub use optimal::{compress_optimal, optimal_size};

use log::debug;

use crate::block::BlockWriter;
use crate::error::Result;
use crate::matcher::MatchFinder;
use crate::CompressionLevel;

/// Split `data` into literal blocks without searching for matches
pub fn compress_literals(data: &[u8]) -> Result<Vec<u8>> {
    let mut writer = BlockWriter::with_capacity(data.len() + data.len() / 32 + 1);
    writer.write_literals(data)?;
    Ok(writer.finish())
}

/// Compress `data` into a Tuya stream
///
/// Any byte buffer is valid input. An error means the chosen strategy tried
/// to emit a block outside the grammar.
pub fn compress(data: &[u8], level: CompressionLevel) -> Result<Vec<u8>> {
    let output = match level {
        CompressionLevel::Uncompressed => compress_literals(data)?,
        CompressionLevel::Greedy => compress_greedy(data, MatchFinder::FirstAcceptable)?,
        CompressionLevel::Best => compress_greedy(data, MatchFinder::indexed(data))?,
        CompressionLevel::Optimal => compress_optimal(data)?,
    };

    debug!(
        "compressed {} bytes to {} bytes at level {}",
        data.len(),
        output.len(),
        level.level()
    );

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::decompress;

    const LEVELS: [CompressionLevel; 4] = [
        CompressionLevel::Uncompressed,
        CompressionLevel::Greedy,
        CompressionLevel::Best,
        CompressionLevel::Optimal,
    ];

    #[test]
    fn test_literal_only_overhead() {
        let data = vec![0x42u8; 64];
        let out = compress_literals(&data).unwrap();
        assert_eq!(out.len(), 66);
        assert_eq!(out[0], 31);
        assert_eq!(out[33], 31);
    }

    #[test]
    fn test_empty_all_levels() {
        for level in LEVELS {
            assert!(compress(&[], level).unwrap().is_empty(), "level {:?}", level);
        }
    }

    #[test]
    fn test_roundtrip_all_levels() {
        let data: Vec<u8> =
            b"0123456789".iter().cycle().take(300).copied().chain(0..=255).collect();
        for level in LEVELS {
            let out = compress(&data, level).unwrap();
            assert_eq!(decompress(&out).unwrap(), data, "level {:?}", level);
        }
    }

    #[test]
    fn test_best_level_run() {
        let data = vec![0x42u8; 64];
        let out = compress(&data, CompressionLevel::Best).unwrap();
        assert_eq!(out, vec![0x00, 0x42, 0xE0, 54, 0x00]);
    }
}

use proptest::collection::vec;
use proptest::prelude::*;

use tuyalz::compress::{compress_optimal, optimal_size};
use tuyalz::{compress, decompress, Block, BlockReader, CompressionLevel};

/// Byte buffers over a small alphabet so matches actually occur
fn repetitive_bytes(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    vec(0u8..4, 0..max_len)
}

const FAST_LEVELS: [CompressionLevel; 3] =
    [CompressionLevel::Uncompressed, CompressionLevel::Greedy, CompressionLevel::Best];

fn check_stream(stream: &[u8], data: &[u8]) -> Result<(), TestCaseError> {
    let mut produced = 0usize;
    for block in BlockReader::new(stream) {
        let block = block.map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert!(block.validate().is_ok());
        match block {
            Block::Literal(bytes) => prop_assert!((1..=32).contains(&bytes.len())),
            Block::Reference { length, distance } => {
                prop_assert!((3..=264).contains(&length));
                prop_assert!(distance >= 1 && distance <= produced.min(8192));
            }
        }
        produced += block.decoded_len();
    }
    prop_assert_eq!(produced, data.len());
    prop_assert_eq!(decompress(stream).map_err(|e| TestCaseError::fail(e.to_string()))?, data);
    Ok(())
}

proptest! {
    #[test]
    fn prop_fast_levels_roundtrip(data in vec(any::<u8>(), 0..2048)) {
        for level in FAST_LEVELS {
            let stream = compress(&data, level).unwrap();
            check_stream(&stream, &data)?;
        }
    }

    #[test]
    fn prop_repetitive_roundtrip(data in repetitive_bytes(3000)) {
        for level in [CompressionLevel::Greedy, CompressionLevel::Best] {
            let stream = compress(&data, level).unwrap();
            check_stream(&stream, &data)?;
        }
    }

    #[test]
    fn prop_optimal_roundtrip_and_smallest(data in repetitive_bytes(400)) {
        let optimal = compress_optimal(&data).unwrap();
        check_stream(&optimal, &data)?;
        prop_assert_eq!(optimal.len(), optimal_size(&data).unwrap());
        for level in FAST_LEVELS {
            prop_assert!(optimal.len() <= compress(&data, level).unwrap().len());
        }
    }

    #[test]
    fn prop_literal_overhead(data in vec(any::<u8>(), 0..2048)) {
        let stream = compress(&data, CompressionLevel::Uncompressed).unwrap();
        prop_assert_eq!(stream.len(), data.len() + (data.len() + 31) / 32);
    }

    #[test]
    fn prop_decompress_never_panics(stream in vec(any::<u8>(), 0..512)) {
        let _ = decompress(&stream);
    }
}

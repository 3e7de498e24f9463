#![no_main]

use libfuzzer_sys::fuzz_target;
use tuyalz::{compress, decompress, CompressionLevel};

fuzz_target!(|data: &[u8]| {
    // Level 3 scans the whole window per position
    let levels: &[CompressionLevel] = if data.len() <= 1024 {
        &[
            CompressionLevel::Uncompressed,
            CompressionLevel::Greedy,
            CompressionLevel::Best,
            CompressionLevel::Optimal,
        ]
    } else {
        &[CompressionLevel::Uncompressed, CompressionLevel::Greedy, CompressionLevel::Best]
    };

    for &level in levels {
        let stream = compress(data, level).expect("compression failed");
        let decoded = decompress(&stream).expect("stream did not decode");
        assert_eq!(decoded, data, "roundtrip mismatch at level {}", level.level());
    }
});

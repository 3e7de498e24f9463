#![no_main]

use libfuzzer_sys::fuzz_target;
use tuyalz::{decompress, summarize};

fuzz_target!(|data: &[u8]| {
    // Arbitrary streams may be rejected - that's OK
    // We're looking for panics/crashes, not errors
    let decoded = decompress(data);
    let summary = summarize(data);
    if let (Ok(decoded), Ok(summary)) = (decoded, summary) {
        assert_eq!(decoded.len(), summary.decoded_size());
    }
});

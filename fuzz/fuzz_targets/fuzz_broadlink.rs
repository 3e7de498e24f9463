#![no_main]

use libfuzzer_sys::fuzz_target;
use tuyalz::broadlink::parse_durations;

fuzz_target!(|data: &[u8]| {
    // Malformed packets must return errors, never panic
    let _ = parse_durations(data);
});

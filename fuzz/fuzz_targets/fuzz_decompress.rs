#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes may fail - that's OK.
    // We're looking for panics/crashes, not errors.
    let _ = rasterlz::decompress(data);
});

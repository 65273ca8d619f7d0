#![no_main]

use libfuzzer_sys::fuzz_target;
use rasterlz::{compress, decompress, CodecConfig};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First byte steers the configuration, the rest is a single-row grid
    let selector = data[0];
    let grid = &data[1..];

    let config = CodecConfig {
        offset_bits: (selector & 0x0F).clamp(1, 15) as u16,
        length_bits: ((selector >> 4) & 0x0F).clamp(1, 15) as u16,
        block_size: 8,
        adaptive: selector & 0x10 != 0,
        model: selector & 0x20 != 0,
    };

    let (compressed, _stats) = compress(grid, grid.len() as u32, &config).unwrap();
    let decoded = decompress(&compressed).unwrap();
    assert_eq!(decoded, grid);
});

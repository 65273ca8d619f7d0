//! Lossless LZSS compression for raw 2-D byte grids.
//!
//! The input is a flat byte sequence interpreted as a `width x height`
//! grid. Compression runs each block (the whole grid, or `block_size`
//! tiles in adaptive mode) through an optional scan-order transposition,
//! an optional reversible byte transform, and a sliding-window LZSS coder,
//! then bit-packs the winning token streams into a self-contained
//! container. When the result would not be smaller than the input, the
//! container degrades to a one-byte marker followed by the raw bytes.

pub mod bits;
pub mod container;
pub mod error;
pub mod image;
pub mod lzss;
pub mod transforms;

pub use container::Header;
pub use error::{Error, Result};
pub use image::ScanOrder;
pub use lzss::{CodingParams, Token};

use container::STORED;
use image::EncodedBlock;
use log::{debug, info};

/// Configuration for compression
#[derive(Clone, Debug)]
pub struct CodecConfig {
    /// Bits per match offset field (1-15); the search window spans
    /// `2^offset_bits - 1` bytes
    pub offset_bits: u16,
    /// Bits per match length field (1-15)
    pub length_bits: u16,
    /// Tile edge for adaptive mode (1-32767)
    pub block_size: u16,
    /// Evaluate every scan order per block and keep the cheapest
    pub adaptive: bool,
    /// Apply the model transform (delta, or MTF with the `mtf` feature)
    pub model: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self { offset_bits: 10, length_bits: 8, block_size: 64, adaptive: false, model: false }
    }
}

impl CodecConfig {
    /// Validate the field ranges and derive the coding parameters.
    pub fn coding_params(&self) -> Result<CodingParams> {
        if self.block_size == 0 || self.block_size >= 1 << 15 {
            return Err(Error::InvalidBlockSize(self.block_size));
        }
        CodingParams::new(self.offset_bits, self.length_bits)
    }
}

/// Statistics from a compression run
#[derive(Clone, Debug, Default)]
pub struct CompressStats {
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub blocks: u64,
    pub coded_tokens: u64,
    pub literal_tokens: u64,
    /// The container fell back to storing the input verbatim
    pub stored: bool,
    /// The input was 0x00/0xFF-only and was bit-packed before coding
    pub binary_packed: bool,
}

impl CompressStats {
    /// Fraction of the input size saved; negative when the output grew
    /// (possible only through the one-byte store marker).
    pub fn space_saving(&self) -> f64 {
        if self.input_bytes == 0 {
            return 0.0;
        }
        1.0 - self.output_bytes as f64 / self.input_bytes as f64
    }
}

/// Compress a `width x height` byte grid into a self-contained container.
///
/// `input.len()` must equal `width * height`. The returned stats describe
/// the compression run; the returned bytes decompress to `input` exactly.
pub fn compress(input: &[u8], width: u32, config: &CodecConfig) -> Result<(Vec<u8>, CompressStats)> {
    let params = config.coding_params()?;
    let height = grid_height(input, width)?;

    let mut stats = CompressStats { input_bytes: input.len() as u64, ..Default::default() };

    // Binary-only packing: 8 grid bytes collapse into 1. Restricted to
    // widths divisible by 8 so the packed grid is exactly (width/8) x height
    // and unpacking reproduces the byte count.
    let binary_only = width % 8 == 0 && transforms::is_binary_only(input);
    let (packed, p_width) = if binary_only {
        stats.binary_packed = true;
        (Some(transforms::pack_binary(input)), width / 8)
    } else {
        (None, width)
    };
    let data: &[u8] = packed.as_deref().unwrap_or(input);

    let blocks = image::split_blocks(data, p_width, height, config.adaptive, config.block_size);
    stats.blocks = blocks.len() as u64;

    let mut encoded: Vec<EncodedBlock> = Vec::with_capacity(blocks.len());
    for block in &blocks {
        let result = if config.adaptive {
            block.encode_adaptive(config.model, &params)?
        } else {
            block.encode(config.model, &params)?
        };
        stats.coded_tokens += result.coded_tokens as u64;
        stats.literal_tokens += result.literal_tokens as u64;
        encoded.push(result);
    }

    let header = Header {
        width: p_width,
        height,
        offset_bits: config.offset_bits,
        length_bits: config.length_bits,
        model: config.model,
        adaptive: config.adaptive,
        binary_only,
        block_size: if config.adaptive { config.block_size } else { 0 },
    };

    // Not-smaller-than-original escape: an input that would not shrink is
    // stored verbatim behind a zero marker. An empty input always gets a
    // real header, so its container stays self-describing.
    let compressed_size = container::writer::estimated_bytes(&header, &encoded, &params);
    if !input.is_empty() && compressed_size >= input.len() {
        info!(
            "store fallback: {} compressed bytes vs {} input bytes",
            compressed_size,
            input.len()
        );
        let mut output = Vec::with_capacity(1 + input.len());
        output.push(STORED);
        output.extend_from_slice(input);
        stats.stored = true;
        stats.output_bytes = output.len() as u64;
        return Ok((output, stats));
    }

    let output = container::write_container(&header, &encoded, &params);
    debug_assert_eq!(output.len(), compressed_size);
    stats.output_bytes = output.len() as u64;
    info!(
        "compressed {} bytes into {} ({} blocks, {} coded / {} literal tokens)",
        input.len(),
        output.len(),
        stats.blocks,
        stats.coded_tokens,
        stats.literal_tokens
    );
    Ok((output, stats))
}

/// Decompress a container produced by [`compress`].
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    let marker = *input.first().ok_or(Error::UnexpectedEof)?;
    if marker == STORED {
        debug!("store marker found, copying {} bytes", input.len() - 1);
        return Ok(input[1..].to_vec());
    }

    let (header, token_blocks) = container::read_container(input)?;

    let mut decoded: Vec<(u32, u32, Vec<u8>)> = Vec::with_capacity(token_blocks.len());
    for block in &token_blocks {
        let bytes = image::decode_block(
            &block.tokens,
            block.width as usize,
            block.height as usize,
            block.order,
            header.model,
        )?;
        decoded.push((block.width, block.height, bytes));
    }

    let composed = image::compose_image(
        &decoded,
        header.width,
        header.height,
        header.adaptive,
        header.block_size,
    )?;

    if header.binary_only {
        Ok(transforms::unpack_binary(&composed))
    } else {
        Ok(composed)
    }
}

/// Derive the grid height from the input length, rejecting sizes that do
/// not tile into whole rows.
fn grid_height(input: &[u8], width: u32) -> Result<u32> {
    if width == 0 {
        if input.is_empty() {
            return Ok(0);
        }
        return Err(Error::ZeroWidth(input.len()));
    }
    if input.len() % width as usize != 0 {
        let height = (input.len() / width as usize) as u32;
        return Err(Error::SizeMismatch { width, height, found: input.len() });
    }
    Ok((input.len() / width as usize) as u32)
}

use super::Header;
use crate::bits::BitReader;
use crate::error::{Error, Result};
use crate::image::{self, ScanOrder};
use crate::lzss::{CodingParams, Token, MIN_CODED_LEN};

use log::debug;

/// One block's worth of parsed container payload, ready for decoding.
pub struct TokenBlock {
    pub width: u32,
    pub height: u32,
    pub order: ScanOrder,
    pub tokens: Vec<Token>,
}

/// Parse a compressed container back into its header and per-block token
/// lists.
///
/// The caller has already ruled out store mode by inspecting the first
/// byte. Token streams have no terminator; each block is read until its
/// expected byte count (derived from the grid geometry) is reached, and a
/// token pushing past that count marks the stream corrupt.
pub fn read_container(input: &[u8]) -> Result<(Header, Vec<TokenBlock>)> {
    let mut reader = BitReader::new(input);

    let _successful = reader.read_byte()?;
    let width = reader.read_u32_le()?;
    let height = reader.read_u32_le()?;
    let offset_bits = reader.read_u16_le()?;
    let length_bits = reader.read_u16_le()?;

    // Field widths outside 1..=15 mark the container as garbage
    CodingParams::new(offset_bits, length_bits)?;

    let model = reader.read_bit()?;
    let adaptive = reader.read_bit()?;
    let binary_only = reader.read_bit()?;

    let block_size = if adaptive {
        let value = reader.read_bits(16)? as u16;
        if value == 0 {
            return Err(Error::InvalidBlockSize(0));
        }
        value
    } else {
        0
    };

    let header =
        Header { width, height, offset_bits, length_bits, model, adaptive, binary_only, block_size };
    debug!(
        "container: {}x{} offset_bits={} length_bits={} model={} adaptive={} binary_only={}",
        width, height, offset_bits, length_bits, model, adaptive, binary_only
    );

    let (n_rows, n_cols) =
        if adaptive { image::grid_dims(width, height, block_size) } else { (1, 1) };

    // Sized by the header, which is untrusted; grow on demand instead of
    // preallocating a hostile block count.
    let mut blocks = Vec::new();
    for row in 0..n_rows {
        for col in 0..n_cols {
            let (block_width, block_height) = if adaptive {
                image::block_dims(width, height, block_size, row, col)
            } else {
                (width, height)
            };

            // Non-adaptive containers carry no tag; the scan is horizontal.
            let order = if adaptive {
                ScanOrder::from_tag(reader.read_bits(2)? as u8)?
            } else {
                ScanOrder::Horizontal
            };

            let expected = block_width as usize * block_height as usize;
            let mut decoded = 0usize;
            let mut tokens = Vec::new();

            while decoded < expected {
                if reader.read_bit()? {
                    let offset = reader.read_bits(offset_bits as u8)? as u16;
                    let length = reader.read_bits(length_bits as u8)? as u16;
                    tokens.push(Token::Match { offset, length });
                    decoded += length as usize + MIN_CODED_LEN;
                } else {
                    let value = reader.read_bits(8)? as u8;
                    tokens.push(Token::Literal(value));
                    decoded += 1;
                }
            }

            if decoded != expected {
                return Err(Error::BlockOverrun { expected, found: decoded });
            }

            blocks.push(TokenBlock { width: block_width, height: block_height, order, tokens });
        }
    }

    Ok((header, blocks))
}

use super::{Header, COMPRESSED};
use crate::bits::BitWriter;
use crate::image::EncodedBlock;
use crate::lzss::{CodingParams, Token};

/// Serialise the header and encoded blocks into the byte-exact container
/// layout.
///
/// Whole-byte header fields go out as little-endian integers before any
/// bit-level state exists; everything after them is a single MSB-first bit
/// stream, zero-padded to the final byte boundary.
pub fn write_container(header: &Header, blocks: &[EncodedBlock], params: &CodingParams) -> Vec<u8> {
    let mut writer = BitWriter::with_capacity(estimated_bytes(header, blocks, params));

    writer.write_byte(COMPRESSED);
    writer.write_u32_le(header.width);
    writer.write_u32_le(header.height);
    writer.write_u16_le(header.offset_bits);
    writer.write_u16_le(header.length_bits);

    writer.write_bit(header.model);
    writer.write_bit(header.adaptive);
    writer.write_bit(header.binary_only);
    if header.adaptive {
        writer.write_bits(header.block_size as u32, 16);
    }

    for block in blocks {
        if header.adaptive {
            writer.write_bits(block.order.tag() as u32, 2);
        }
        for token in &block.tokens {
            match *token {
                Token::Match { offset, length } => {
                    writer.write_bit(true);
                    writer.write_bits(offset as u32, header.offset_bits as u8);
                    writer.write_bits(length as u32, header.length_bits as u8);
                }
                Token::Literal(value) => {
                    writer.write_bit(false);
                    writer.write_bits(value as u32, 8);
                }
            }
        }
    }

    writer.finish()
}

/// Exact serialised size in bytes; used both for allocation and for the
/// driver's store-escape decision.
pub fn estimated_bytes(header: &Header, blocks: &[EncodedBlock], params: &CodingParams) -> usize {
    let mut bits = 8 + 32 + 32 + 16 + 16 + 3;
    if header.adaptive {
        bits += 16 + 2 * blocks.len();
    }
    for block in blocks {
        bits += block.token_bits(params);
    }
    bits.div_ceil(8)
}

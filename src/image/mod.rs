pub mod block;
pub mod scan;

pub use block::{decode_block, Block, EncodedBlock};
pub use scan::ScanOrder;

use crate::error::{Error, Result};

/// Number of block rows and columns an adaptive grid tiles into.
pub fn grid_dims(width: u32, height: u32, block_size: u16) -> (u32, u32) {
    let bs = block_size as u32;
    (height.div_ceil(bs), width.div_ceil(bs))
}

/// Dimensions of the block at `(row, col)`; edge blocks may be smaller.
pub fn block_dims(width: u32, height: u32, block_size: u16, row: u32, col: u32) -> (u32, u32) {
    let bs = block_size as u32;
    let block_width = bs.min(width - col * bs);
    let block_height = bs.min(height - row * bs);
    (block_width, block_height)
}

/// Partition the grid into blocks for encoding.
///
/// Non-adaptive mode wraps the whole grid in one block; adaptive mode tiles
/// it into `ceil(h/bs) * ceil(w/bs)` row-major blocks of at most
/// `block_size x block_size` bytes.
pub fn split_blocks(
    data: &[u8],
    width: u32,
    height: u32,
    adaptive: bool,
    block_size: u16,
) -> Vec<Block> {
    let width_us = width as usize;

    if !adaptive {
        return vec![Block::new(data.to_vec(), width_us, height as usize)];
    }

    let (n_rows, n_cols) = grid_dims(width, height, block_size);
    let mut blocks = Vec::with_capacity(n_rows as usize * n_cols as usize);

    for row in 0..n_rows {
        for col in 0..n_cols {
            let (bw, bh) = block_dims(width, height, block_size, row, col);
            let start_row = (row * block_size as u32) as usize;
            let start_col = (col * block_size as u32) as usize;

            let mut block_data = Vec::with_capacity(bw as usize * bh as usize);
            for r in start_row..start_row + bh as usize {
                let offset = r * width_us + start_col;
                block_data.extend_from_slice(&data[offset..offset + bw as usize]);
            }
            blocks.push(Block::new(block_data, bw as usize, bh as usize));
        }
    }
    blocks
}

/// Scatter decoded blocks back into the output grid, iterating in the same
/// row-major order the encoder used.
pub fn compose_image(
    decoded: &[(u32, u32, Vec<u8>)],
    width: u32,
    height: u32,
    adaptive: bool,
    block_size: u16,
) -> Result<Vec<u8>> {
    let expected = width as usize * height as usize;

    if !adaptive {
        match decoded {
            [(bw, bh, data)] => {
                if *bw != width || *bh != height || data.len() != expected {
                    return Err(Error::Internal(format!(
                        "single block {bw}x{bh} does not match image {width}x{height}"
                    )));
                }
                return Ok(data.clone());
            }
            _ => {
                return Err(Error::Internal(format!(
                    "non-adaptive image expects exactly one block, found {}",
                    decoded.len()
                )))
            }
        }
    }

    let (n_rows, n_cols) = grid_dims(width, height, block_size);
    if decoded.len() != n_rows as usize * n_cols as usize {
        return Err(Error::Internal(format!(
            "expected {} blocks for {width}x{height}, found {}",
            n_rows as usize * n_cols as usize,
            decoded.len()
        )));
    }

    let mut output = vec![0u8; expected];
    let mut index = 0usize;

    for row in 0..n_rows {
        for col in 0..n_cols {
            let (bw, bh, data) = &decoded[index];
            index += 1;

            if data.len() != *bw as usize * *bh as usize {
                return Err(Error::Internal(format!(
                    "block {index} carries {} bytes for {bw}x{bh}",
                    data.len()
                )));
            }

            let start_row = (row * block_size as u32) as usize;
            let start_col = (col * block_size as u32) as usize;
            for r in 0..*bh as usize {
                let src = r * *bw as usize;
                let dst = (start_row + r) * width as usize + start_col;
                output[dst..dst + *bw as usize].copy_from_slice(&data[src..src + *bw as usize]);
            }
        }
    }

    Ok(output)
}

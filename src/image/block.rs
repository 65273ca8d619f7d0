use super::scan::{self, ScanOrder, ALL_ORDERS};
use crate::error::Result;
use crate::lzss::{decode_tokens, encode_block, CodingParams, Token};
use crate::transforms;

use log::debug;

/// One rectangle of the source grid, in row-major layout. Owned by the
/// driver from partitioning until its tokens (encode) or decoded bytes
/// (decode) have been handed off.
pub struct Block {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

/// The winning encoding of a block: the scan order that produced it and its
/// token stream, plus the token counts the size check needs.
pub struct EncodedBlock {
    pub order: ScanOrder,
    pub tokens: Vec<Token>,
    pub coded_tokens: usize,
    pub literal_tokens: usize,
}

impl EncodedBlock {
    /// Serialised size of the token stream alone, in bits.
    pub fn token_bits(&self, params: &CodingParams) -> usize {
        self.coded_tokens * params.coded_token_bits
            + self.literal_tokens * params.uncoded_token_bits
    }
}

impl Block {
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self { width, height, data }
    }

    /// Produce the candidate buffer for one scan order: reorder, then apply
    /// the model transform if enabled.
    fn candidate_buffer(&self, order: ScanOrder, model: bool) -> Vec<u8> {
        let mut buffer = scan::reorder(&self.data, self.width, self.height, order);
        if model {
            transforms::model_transform(&mut buffer);
        }
        buffer
    }

    fn encode_order(&self, order: ScanOrder, model: bool, params: &CodingParams) -> Result<EncodedBlock> {
        let buffer = self.candidate_buffer(order, model);
        let tokens = encode_block(&buffer, params)?;
        let coded_tokens = tokens.iter().filter(|t| t.is_match()).count();
        let literal_tokens = tokens.len() - coded_tokens;
        Ok(EncodedBlock { order, tokens, coded_tokens, literal_tokens })
    }

    /// Non-adaptive encoding: horizontal scan only.
    pub fn encode(&self, model: bool, params: &CodingParams) -> Result<EncodedBlock> {
        self.encode_order(ScanOrder::Horizontal, model, params)
    }

    /// Adaptive encoding: evaluate every scan order and keep the one with
    /// the smallest serialised token size. Ties keep the lowest tag; losing
    /// token lists are dropped.
    pub fn encode_adaptive(&self, model: bool, params: &CodingParams) -> Result<EncodedBlock> {
        let mut best: Option<EncodedBlock> = None;

        for order in ALL_ORDERS {
            let candidate = self.encode_order(order, model, params)?;
            let bits = candidate.token_bits(params);
            debug!(
                "block {}x{}: {:?} scan costs {} bits ({} coded, {} literal)",
                self.width, self.height, order, bits, candidate.coded_tokens, candidate.literal_tokens
            );
            if best.as_ref().map_or(true, |b| bits < b.token_bits(params)) {
                best = Some(candidate);
            }
        }

        // ALL_ORDERS is non-empty, so a winner always exists.
        Ok(best.expect("at least one scan order evaluated"))
    }
}

/// Decode one block back to row-major bytes: expand tokens, reverse the
/// model transform, then undo the scan reorder.
pub fn decode_block(
    tokens: &[Token],
    width: usize,
    height: usize,
    order: ScanOrder,
    model: bool,
) -> Result<Vec<u8>> {
    let mut bytes = decode_tokens(tokens, width * height)?;
    if model {
        transforms::reverse_model_transform(&mut bytes);
    }
    if order == ScanOrder::Vertical {
        bytes = scan::restore(&bytes, width, height, order);
    }
    Ok(bytes)
}

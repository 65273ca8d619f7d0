use crate::error::{Error, Result};

/// Coding parameters derived from the runtime bit widths.
///
/// `offset_bits` and `length_bits` travel in the container header, so every
/// size derived from them is computed here rather than from ambient
/// constants, and the value is threaded through both codec directions.
#[derive(Clone, Copy, Debug)]
pub struct CodingParams {
    pub offset_bits: u16,
    pub length_bits: u16,
    /// Maximum backward distance a match may reference
    pub search_buf_size: usize,
    /// Maximum extra length a match may carry beyond `MIN_CODED_LEN`
    pub max_extra_len: u16,
    /// Serialised size of a match token: flag + offset + length
    pub coded_token_bits: usize,
    /// Serialised size of a literal token: flag + byte
    pub uncoded_token_bits: usize,
    /// Bucket scan stops once a candidate reaches this extra length
    pub early_exit_len: u16,
}

impl CodingParams {
    pub fn new(offset_bits: u16, length_bits: u16) -> Result<Self> {
        if offset_bits == 0 || offset_bits > 15 {
            return Err(Error::InvalidOffsetBits(offset_bits));
        }
        if length_bits == 0 || length_bits > 15 {
            return Err(Error::InvalidLengthBits(length_bits));
        }

        let max_extra_len = (1u16 << length_bits) - 1;
        Ok(Self {
            offset_bits,
            length_bits,
            search_buf_size: (1usize << offset_bits) - 1,
            max_extra_len,
            coded_token_bits: 1 + offset_bits as usize + length_bits as usize,
            uncoded_token_bits: 1 + 8,
            early_exit_len: max_extra_len / 2,
        })
    }
}

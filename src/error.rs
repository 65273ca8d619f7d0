use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Configuration errors
    #[error("Invalid offset bits: {0} (must be 1-15)")]
    InvalidOffsetBits(u16),

    #[error("Invalid length bits: {0} (must be 1-15)")]
    InvalidLengthBits(u16),

    #[error("Invalid block size: {0} (must be 1-32767)")]
    InvalidBlockSize(u16),

    #[error("Input size {found} does not match image dimensions {width}x{height}")]
    SizeMismatch { width: u32, height: u32, found: usize },

    #[error("Width is zero but input is {0} bytes")]
    ZeroWidth(usize),

    // Container / decode errors
    #[error("Unexpected end of input")]
    UnexpectedEof,

    #[error("Invalid scan-order tag: {0}")]
    InvalidScanTag(u8),

    #[error("Match offset {offset} exceeds decoded length {available}")]
    InvalidBackReference { offset: usize, available: usize },

    #[error("Match offset is zero")]
    ZeroOffset,

    #[error("Block overrun: expected {expected} bytes, decoded {found}")]
    BlockOverrun { expected: usize, found: usize },

    // Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

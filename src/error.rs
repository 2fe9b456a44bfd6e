use std::collections::TryReserveError;

/// Errors raised while packing a nametable.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// Row width is zero or reaches past the tiles handed in.
    #[error("invalid row width {width} for {available} available tiles")]
    InvalidWidth { width: usize, available: usize },

    /// The row would write past the end of the 16-bit address space.
    #[error("row at 0x{base:04X} with width {width} overflows the address space")]
    AddressOverflow { base: u32, width: usize },

    /// A header was about to carry a length the 6-bit field cannot hold.
    #[error("run length {len} does not fit a {kind} header")]
    RunLengthOverflow { kind: &'static str, len: usize },

    /// The output buffer could not grow.
    #[error("failed to grow output buffer: {0}")]
    BufferGrowth(#[from] TryReserveError),
}

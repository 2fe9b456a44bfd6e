use crate::{
    encode_row, CommandBuffer, EncodeError, DEFAULT_VRAM_ADDRESS, DEFAULT_WIDTH,
    NAMETABLE_CAPACITY, ROW_STRIDE,
};
use std::io::{self, Read};
use std::num::ParseIntError;

/// How a nametable is laid out in VRAM.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// tiles per row
    pub width: usize,
    /// address of the first tile of the first row
    pub vram_address: u16,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            width: DEFAULT_WIDTH,
            vram_address: DEFAULT_VRAM_ADDRESS,
        }
    }
}

/// Up to [`NAMETABLE_CAPACITY`] tile indices, as read from the input.
pub struct Nametable {
    tiles: [u8; NAMETABLE_CAPACITY],
    len: usize,
}

impl Nametable {
    /// Copies at most [`NAMETABLE_CAPACITY`] bytes, ignoring the rest.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let len = bytes.len().min(NAMETABLE_CAPACITY);
        let mut tiles = [0; NAMETABLE_CAPACITY];
        tiles[..len].copy_from_slice(&bytes[..len]);
        Nametable { tiles, len }
    }

    /// Reads until the reader is exhausted or the nametable is full.
    pub fn read_from<R: Read>(reader: R) -> io::Result<Self> {
        let mut bytes = Vec::with_capacity(NAMETABLE_CAPACITY);
        reader
            .take(NAMETABLE_CAPACITY as u64)
            .read_to_end(&mut bytes)?;
        debug!("read {} bytes of nametable", bytes.len());
        Ok(Self::from_bytes(&bytes))
    }

    /// Number of bytes actually read.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.tiles[..self.len]
    }

    /// Complete rows of `width` tiles. A trailing partial row is dropped.
    ///
    /// A zero width has no rows at all.
    pub fn rows(&self, width: usize) -> impl Iterator<Item = &[u8]> {
        let tiles = if width == 0 { &[][..] } else { self.as_bytes() };
        tiles.chunks_exact(width.max(1))
    }

    /// Packs every complete row, in row order, into one buffer.
    pub fn encode(&self, options: &EncodeOptions) -> Result<CommandBuffer, EncodeError> {
        let width = options.width;
        if width == 0 {
            return Err(EncodeError::InvalidWidth {
                width,
                available: self.len,
            });
        }
        let mut out = CommandBuffer::new();
        for (y, row) in self.rows(width).enumerate() {
            let base = options.vram_address as u32 + y as u32 * ROW_STRIDE as u32;
            let base = u16::try_from(base)
                .map_err(|_| EncodeError::AddressOverflow { base, width })?;
            let before = out.len();
            encode_row(row, width, base, &mut out)?;
            debug!(
                "row {y} at 0x{base:04X}: {width} tiles -> {} bytes",
                out.len() - before
            );
        }
        info!(
            "packed {} rows of {width} tiles into {} bytes",
            self.len / width,
            out.len()
        );
        Ok(out)
    }
}

/// Parses an integer the way C's `strtol` does with base 0:
/// `0x` for hex, a leading `0` for octal, decimal otherwise.
pub fn parse_number(s: &str) -> Result<u64, ParseIntError> {
    let s = s.trim();
    let digits = s.strip_prefix('+').unwrap_or(s);
    if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16)
    } else if digits.len() > 1 && digits.starts_with('0') {
        u64::from_str_radix(&digits[1..], 8)
    } else {
        digits.parse()
    }
}

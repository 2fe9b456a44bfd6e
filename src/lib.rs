//! # Nametable Packing Scheme
//!
//! A nametable is packed row by row into a flat stream of commands.
//! Every command starts with a big-endian VRAM address followed by a header byte.
//!
//! ```text
//!         MSB     LSB
//!          │       │
//!          ▼       ▼
//!         X1LL LLLL  VVVV VVVV
//!          ▲└──┬──┘  └───┬───┘
//!  REPEAT ─┘  len      value
//! ```
//!
//! A repeat command writes `value` `len` times starting at the address.
//! `len` is between 4 and 63.
//!
//! ```text
//!         MSB     LSB
//!          │       │
//!          ▼       ▼
//!         X0LL LLLL  VVVV VVVV ... (len bytes)
//!          ▲└──┬──┘
//!  LITERAL─┘  len
//! ```
//!
//! A literal command writes the `len` following bytes starting at the address.
//! `len` is between 1 and 63.
//!
//! Tile 0 is never written. It is skipped, the address still advances, and
//! whatever the destination held at that position is left untouched.
//!
//! There is no header, footer or end marker. Each row starts at
//! `vram_address + 32 * row`, whatever the row width is.

#[macro_use]
extern crate log;

mod buffer;
mod error;
mod nametable;
mod row;
#[cfg(test)]
mod test_util;

pub use buffer::{CommandBuffer, PatchOffset};
pub use error::EncodeError;
pub use nametable::{parse_number, EncodeOptions, Nametable};
pub use row::encode_row;

/// tile value that is never written
pub const SENTINEL: u8 = 0;
/// header bit marking a repeat command
pub const REPEAT_FLAG: u8 = 0x40;
/// the length field is 6 bits wide
pub const MAX_RUN_LEN: u8 = 0x3F;
/// shortest run worth a repeat command
pub const MIN_REPEAT_LEN: u8 = 4;

/// address advance between two consecutive rows
pub const ROW_STRIDE: u16 = 32;
pub const DEFAULT_WIDTH: usize = 32;
pub const DEFAULT_VRAM_ADDRESS: u16 = 0x2000;
/// bytes of input a nametable holds
pub const NAMETABLE_CAPACITY: usize = 1024;

use crate::{CommandBuffer, EncodeError, PatchOffset, MAX_RUN_LEN, MIN_REPEAT_LEN, SENTINEL};
use std::fmt;
use std::fmt::Debug;

/// Encodes `tiles[..width]` as the row starting at `base_address`,
/// appending its commands to `out`.
///
/// Nothing is written when the arguments are rejected.
pub fn encode_row(
    tiles: &[u8],
    width: usize,
    base_address: u16,
    out: &mut CommandBuffer,
) -> Result<(), EncodeError> {
    if width == 0 || width > tiles.len() {
        return Err(EncodeError::InvalidWidth {
            width,
            available: tiles.len(),
        });
    }
    let base = base_address as u32;
    if base + width as u32 > 0x1_0000 {
        return Err(EncodeError::AddressOverflow { base, width });
    }
    RowEncoder {
        row: &tiles[..width],
        x: 0,
        addr: base,
        status: RowStatus::Scanning,
        out,
    }
    .run()
}

struct RowEncoder<'r, 'o> {
    row: &'r [u8],
    /// index of the next tile to read
    x: usize,
    /// VRAM address of the next command
    addr: u32,
    status: RowStatus,
    out: &'o mut CommandBuffer,
}

#[derive(Copy, Clone)]
enum RowStatus {
    /// classify the tile under the cursor
    Scanning,
    /// open a command, trusting a lookahead taken earlier
    Starting { is_run: bool },
    InRepeat { value: u8, len: u8 },
    InLiteral { len: u8, patch: PatchOffset },
}

impl<'r, 'o> RowEncoder<'r, 'o> {
    fn run(mut self) -> Result<(), EncodeError> {
        let base = self.addr;
        while self.x < self.row.len() {
            trace!(
                "x: {}, addr: 0x{:04X}, status: {:?}",
                self.x,
                self.addr,
                self.status
            );
            self.status = match self.status {
                RowStatus::Scanning => {
                    let is_run = self.lookahead();
                    self.start(is_run, RowStatus::Scanning)?
                }
                RowStatus::Starting { is_run } => {
                    self.start(is_run, RowStatus::Starting { is_run: false })?
                }
                RowStatus::InRepeat { value, len } => self.extend_repeat(value, len)?,
                RowStatus::InLiteral { len, patch } => self.extend_literal(len, patch)?,
            };
        }
        self.finalize()?;
        debug_assert_eq!(self.addr, base + self.row.len() as u32);
        Ok(())
    }

    /// Whether the tile under the cursor and the three after it are equal.
    #[inline(always)]
    fn lookahead(&self) -> bool {
        let end = self.x + MIN_REPEAT_LEN as usize;
        if end > self.row.len() {
            return false;
        }
        let tile = self.row[self.x];
        self.row[self.x + 1..end].iter().all(|&t| t == tile)
    }

    /// Opens a command at the cursor.
    ///
    /// A sentinel is stepped over and `after_skip` is kept as status, so a
    /// start that did not scan does not scan for the next tile either.
    fn start(&mut self, is_run: bool, after_skip: RowStatus) -> Result<RowStatus, EncodeError> {
        let tile = self.row[self.x];
        if tile == SENTINEL {
            trace!("skip sentinel at 0x{:04X}", self.addr);
            self.x += 1;
            self.addr += 1;
            return Ok(after_skip);
        }
        self.out.push_address(self.addr as u16)?;
        let next = if is_run {
            self.x += MIN_REPEAT_LEN as usize;
            RowStatus::InRepeat {
                value: tile,
                len: MIN_REPEAT_LEN,
            }
        } else {
            let patch = self.out.push_literal_placeholder()?;
            self.out.push_tile(tile)?;
            self.x += 1;
            RowStatus::InLiteral { len: 1, patch }
        };
        trace!("transit to {:?}", next);
        Ok(next)
    }

    fn extend_repeat(&mut self, value: u8, mut len: u8) -> Result<RowStatus, EncodeError> {
        let tile = self.row[self.x];
        if tile == value {
            len += 1;
            self.x += 1;
        }
        if tile != value || len == MAX_RUN_LEN {
            self.close_repeat(value, len)?;
            return Ok(RowStatus::Scanning);
        }
        Ok(RowStatus::InRepeat { value, len })
    }

    fn extend_literal(&mut self, len: u8, patch: PatchOffset) -> Result<RowStatus, EncodeError> {
        let tile = self.row[self.x];
        if tile == SENTINEL {
            self.close_literal(len, patch)?;
            return Ok(RowStatus::Scanning);
        }
        if self.lookahead() {
            self.close_literal(len, patch)?;
            return Ok(RowStatus::Starting { is_run: true });
        }
        self.out.push_tile(tile)?;
        self.x += 1;
        let len = len + 1;
        if len == MAX_RUN_LEN {
            self.close_literal(len, patch)?;
            return Ok(RowStatus::Starting { is_run: false });
        }
        Ok(RowStatus::InLiteral { len, patch })
    }

    fn close_repeat(&mut self, value: u8, len: u8) -> Result<(), EncodeError> {
        trace!("repeat 0x{:04X}: {} x 0x{:02X}", self.addr, len, value);
        self.out.push_repeat(len, value)?;
        self.addr += len as u32;
        Ok(())
    }

    fn close_literal(&mut self, len: u8, patch: PatchOffset) -> Result<(), EncodeError> {
        trace!(
            "literal 0x{:04X}: {}",
            self.addr,
            hex::encode(&self.row[self.x - len as usize..self.x])
        );
        self.out.patch_literal_len(patch, len)?;
        self.addr += len as u32;
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), EncodeError> {
        trace!("last status: {:?}", self.status);
        match self.status {
            RowStatus::InRepeat { value, len } => self.close_repeat(value, len),
            RowStatus::InLiteral { len, patch } => self.close_literal(len, patch),
            RowStatus::Scanning | RowStatus::Starting { .. } => Ok(()),
        }
    }
}

impl Debug for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowStatus::Scanning => f.write_str("Scanning"),
            RowStatus::Starting { is_run } => f
                .debug_struct("Starting")
                .field("is_run", &is_run)
                .finish(),
            RowStatus::InRepeat { value, len } => f
                .debug_struct("InRepeat")
                .field("value", &format!("0x{value:02X}"))
                .field("len", &len)
                .finish(),
            RowStatus::InLiteral { len, patch } => f
                .debug_struct("InLiteral")
                .field("len", &len)
                .field("patch", &patch)
                .finish(),
        }
    }
}

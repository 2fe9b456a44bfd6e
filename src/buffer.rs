use crate::{EncodeError, MAX_RUN_LEN, MIN_REPEAT_LEN, REPEAT_FLAG};
use std::fmt;
use std::io;

/// capacity added each time the buffer runs short
const GROWTH_STEP: usize = 64;

/// Owned output of the encoder.
///
/// Only ever appended to, except for the length byte of a literal command,
/// which is written as a placeholder and patched once the run is closed.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct CommandBuffer {
    bytes: Vec<u8>,
}

/// Position of a literal length placeholder inside a [`CommandBuffer`].
///
/// It is an index, so it stays valid when the buffer reallocates.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PatchOffset(usize);

impl CommandBuffer {
    pub fn new() -> Self {
        CommandBuffer { bytes: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        CommandBuffer {
            bytes: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn write_to<W: io::Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(&self.bytes)?;
        writer.flush()
    }

    #[inline(always)]
    fn reserve(&mut self, additional: usize) -> Result<(), EncodeError> {
        if self.bytes.capacity() - self.bytes.len() < additional {
            self.bytes.try_reserve_exact(GROWTH_STEP.max(additional))?;
            trace!("grew output buffer to {} bytes", self.bytes.capacity());
        }
        Ok(())
    }

    pub fn push_address(&mut self, addr: u16) -> Result<(), EncodeError> {
        self.reserve(2)?;
        self.bytes.extend_from_slice(&addr.to_be_bytes());
        Ok(())
    }

    pub fn push_tile(&mut self, tile: u8) -> Result<(), EncodeError> {
        self.reserve(1)?;
        self.bytes.push(tile);
        Ok(())
    }

    /// Writes a zero length byte to be filled in by [`Self::patch_literal_len`].
    pub fn push_literal_placeholder(&mut self) -> Result<PatchOffset, EncodeError> {
        self.reserve(1)?;
        let offset = PatchOffset(self.bytes.len());
        self.bytes.push(0);
        Ok(offset)
    }

    pub fn patch_literal_len(&mut self, at: PatchOffset, len: u8) -> Result<(), EncodeError> {
        if len == 0 || len > MAX_RUN_LEN {
            return Err(EncodeError::RunLengthOverflow {
                kind: "literal",
                len: len as usize,
            });
        }
        debug_assert_eq!(self.bytes[at.0], 0);
        self.bytes[at.0] = len;
        Ok(())
    }

    pub fn push_repeat(&mut self, len: u8, value: u8) -> Result<(), EncodeError> {
        if !(MIN_REPEAT_LEN..=MAX_RUN_LEN).contains(&len) {
            return Err(EncodeError::RunLengthOverflow {
                kind: "repeat",
                len: len as usize,
            });
        }
        self.reserve(2)?;
        self.bytes.extend_from_slice(&[REPEAT_FLAG | len, value]);
        Ok(())
    }
}

impl AsRef<[u8]> for CommandBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for CommandBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandBuffer")
            .field("len", &self.bytes.len())
            .field("bytes", &hex::encode(&self.bytes))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_backpatch_survives_growth() {
        let mut buf = CommandBuffer::new();
        buf.push_address(0x2000).unwrap();
        let at = buf.push_literal_placeholder().unwrap();
        for tile in 1..=62u8 {
            buf.push_tile(tile).unwrap();
        }
        // forces at least one reallocation past the first 64 bytes
        assert!(buf.bytes.capacity() >= 65);
        buf.patch_literal_len(at, 62).unwrap();
        assert_eq!(&buf.as_bytes()[..4], &[0x20, 0x00, 62, 1]);
        assert_eq!(buf.len(), 2 + 1 + 62);
    }

    #[test]
    fn test_repeat_header() {
        let mut buf = CommandBuffer::new();
        buf.push_address(0x23C0).unwrap();
        buf.push_repeat(63, 0xAA).unwrap();
        assert_eq!(buf.into_bytes(), hex::decode("23c07faa").unwrap());
    }

    #[test]
    fn test_header_lengths_are_guarded() {
        let mut buf = CommandBuffer::new();
        assert!(matches!(
            buf.push_repeat(64, 1),
            Err(EncodeError::RunLengthOverflow { kind: "repeat", len: 64 })
        ));
        assert!(matches!(
            buf.push_repeat(3, 1),
            Err(EncodeError::RunLengthOverflow { kind: "repeat", len: 3 })
        ));
        let at = buf.push_literal_placeholder().unwrap();
        assert!(matches!(
            buf.patch_literal_len(at, 64),
            Err(EncodeError::RunLengthOverflow { kind: "literal", len: 64 })
        ));
        assert!(buf.patch_literal_len(at, 0).is_err());
        assert_eq!(buf.as_bytes(), &[0]);
    }

    #[test]
    fn test_write_to() {
        let mut buf = CommandBuffer::with_capacity(4);
        buf.push_address(0x2001).unwrap();
        buf.push_tile(7).unwrap();
        let mut out = vec![];
        buf.write_to(&mut out).unwrap();
        assert_eq!(out, vec![0x20, 0x01, 7]);
    }
}

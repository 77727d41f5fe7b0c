use crate::core::error::{ErrorContext, ErrorKind, Res, ResultBuilder};

pub const MAGIC: [u8; 2] = [0x1F, 0x9D];
/// Widest code the format allows.
pub const MAX_BITS: u8 = 16;

const BIT_MASK: u8 = 0x1F;
const BLOCK_MODE: u8 = 0x80;

/// The three bytes in front of every `.Z` code stream.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Header {
    /// Upper bound on the code width.
    pub max_bits: u8,
    /// Whether code 256 resets the dictionary.
    pub block_mode: bool,
}

struct RawHeader<'a>(&'a [u8]);

impl ErrorContext for RawHeader<'_> {
    fn describe(&self) -> Option<String> {
        Some(format!("header {:02x?}", self.0))
    }
}

impl Header {
    pub const LEN: usize = 3;

    /// Parses the leading bytes of a stream. Anything after the header is ignored.
    pub fn parse(bytes: &[u8]) -> Res<Header> {
        let raw = RawHeader(&bytes[..bytes.len().min(Self::LEN)]);
        if bytes.len() < MAGIC.len() || bytes[..MAGIC.len()] != MAGIC {
            raw.raise::<()>(ErrorKind::BadMagic, "not a compress stream".into())?;
        }
        let flags = bytes
            .get(2)
            .copied()
            .kind(ErrorKind::CorruptInput)
            .message(|_| "truncated header".into())?;
        let header = Header {
            max_bits: flags & BIT_MASK,
            block_mode: flags & BLOCK_MODE != 0,
        };
        raw.assert_le(ErrorKind::MaxBitsExceeded, header.max_bits, MAX_BITS)?;
        log::debug!("Parsed header {:?}", header);
        Ok(header)
    }

    /// `1 << max_bits`, one past the largest code the stream may define.
    pub fn max_max_code(&self) -> u32 {
        1 << self.max_bits
    }

    /// First code handed out by the dictionary after a reset.
    pub fn first_free(&self) -> u32 {
        if self.block_mode {
            FIRST
        } else {
            CLEAR
        }
    }
}

/// Dictionary reset signal in block mode, otherwise an ordinary code.
pub const CLEAR: u32 = 256;
/// First dictionary code in block mode.
pub const FIRST: u32 = 257;

use crate::core::error::{ErrorContext, ErrorKind, Res, ResultBuilder, WithContext};
use crate::core::header::Header;
use std::io::Read;

/// Bytes requested from the input per refill.
pub const IBUFSIZ: usize = 8192;
/// The input is only read while fewer than this many bytes are buffered.
const SLACK: usize = 64;
/// Width of the first code, and of the first code after a CLEAR.
pub const INIT_BITS: u32 = 9;

/// Cuts the input into codes of a width chosen by the caller.
///
/// Codes are packed LSB first and written in groups of eight, so a group of
/// `n_bits` codes always spans exactly `n_bits` bytes.
pub(crate) struct CodeReader<In: Read> {
    input: In,
    /// Input staging area. Two spare bytes at the end keep the 24 bit window of
    /// the last buffered code in range.
    buf: Vec<u8>,
    /// Number of valid bytes in |buf|.
    insize: usize,
    /// Bit position of the next code, counted from the start of |buf|.
    posbits: usize,
    /// A code can be read while |posbits| is below this.
    inbits: usize,
    /// Bytes delivered by the most recent read. Zero once the input is exhausted.
    rsize: usize,
    n_bits: u32,
}

impl<In: Read> ErrorContext for CodeReader<In> {
    fn describe(&self) -> Option<String> {
        Some(format!(
            "posbits {} inbits {} insize {} n_bits {}",
            self.posbits, self.inbits, self.insize, self.n_bits
        ))
    }
}

impl<In: Read> CodeReader<In> {
    pub fn new(input: In) -> Res<Self> {
        let mut reader = CodeReader {
            input,
            buf: vec![0; IBUFSIZ + SLACK + 2],
            insize: 0,
            posbits: 0,
            inbits: 0,
            rsize: 0,
            n_bits: INIT_BITS,
        };
        while reader.insize < Header::LEN {
            if reader.read_input()? == 0 {
                break;
            }
        }
        reader.rsize = reader.insize;
        Ok(reader)
    }

    /// Parses the header from the first buffered bytes and positions the
    /// cursor at the first code.
    pub fn header(&mut self) -> Res<Header> {
        let header = Header::parse(&self.buf[..self.insize])?;
        self.posbits = Header::LEN << 3;
        Ok(header)
    }

    /// Reads once from the input into the free part of the buffer.
    fn read_input(&mut self) -> Res<usize> {
        let end = self.insize + IBUFSIZ;
        let read = loop {
            match self.input.read(&mut self.buf[self.insize..end]) {
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                r => break r,
            }
        };
        let count = read
            .at(self)
            .kind(ErrorKind::CorruptInput)
            .message(|_| "read failed".into())?;
        self.insize += count;
        Ok(count)
    }

    /// Drops the consumed bytes, tops the buffer up if it runs low and works
    /// out how far codes can be read.
    pub fn refill(&mut self) -> Res<()> {
        let consumed = (self.posbits >> 3).min(self.insize);
        self.buf.copy_within(consumed..self.insize, 0);
        self.insize -= consumed;
        self.posbits = 0;

        if self.insize < SLACK {
            self.rsize = self.read_input()?;
        }

        let n_bits = self.n_bits as usize;
        self.inbits = if self.rsize > 0 {
            // More input may follow, so only whole groups are safe to read.
            (self.insize - self.insize % n_bits) << 3
        } else {
            (self.insize << 3).saturating_sub(n_bits - 1)
        };
        log::debug!(
            "refilled: {} bytes buffered, last read {}, {} readable bits",
            self.insize,
            self.rsize,
            self.inbits
        );
        Ok(())
    }

    pub fn has_code(&self) -> bool {
        self.inbits > self.posbits
    }

    /// True once a read has come back empty.
    pub fn exhausted(&self) -> bool {
        self.rsize == 0
    }

    pub fn width(&self) -> u32 {
        self.n_bits
    }

    /// Extracts the code at the cursor. Only valid while `has_code` holds.
    pub fn read_code(&mut self) -> u32 {
        debug_assert!(self.has_code());
        let i = self.posbits >> 3;
        let window = u32::from_le_bytes([self.buf[i], self.buf[i + 1], self.buf[i + 2], 0]);
        let code = (window >> (self.posbits & 7)) & ((1 << self.n_bits) - 1);
        self.posbits += self.n_bits as usize;
        code
    }

    /// Switches to a new code width. The rest of the current group (sized by
    /// the old width) is padding, so the cursor skips to its end first.
    pub fn set_width(&mut self, n_bits: u32) -> Res<()> {
        let group = (self.n_bits as usize) << 3;
        self.posbits = self.posbits.next_multiple_of(group);
        log::debug!(
            "code width {} -> {}, resuming at bit {}",
            self.n_bits,
            n_bits,
            self.posbits
        );
        self.n_bits = n_bits;
        self.refill()
    }
}

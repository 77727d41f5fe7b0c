//! A compress(1) compatible encoder for building test streams.

use crate::core::bit_reader::INIT_BITS;
use crate::core::header::{CLEAR, FIRST, MAGIC};
use std::collections::HashMap;
use std::io::Read;

/// Packs codes LSB first, padding to the end of the current group on width
/// changes the way compress does.
pub(crate) struct BitWriter {
    bytes: Vec<u8>,
    bits: usize,
    /// Start of the current run of equal width codes.
    group_start: usize,
    pub n_bits: u32,
}

impl BitWriter {
    pub fn new() -> Self {
        BitWriter {
            bytes: vec![],
            bits: 0,
            group_start: 0,
            n_bits: INIT_BITS,
        }
    }

    pub fn put(&mut self, code: u32) {
        assert!(code < 1 << self.n_bits, "{} does not fit {} bits", code, self.n_bits);
        let end = (self.bits + self.n_bits as usize).div_ceil(8);
        if self.bytes.len() < end {
            self.bytes.resize(end, 0);
        }
        for i in 0..self.n_bits as usize {
            let bit = self.bits + i;
            if (code >> i) & 1 != 0 {
                self.bytes[bit >> 3] |= 1 << (bit & 7);
            }
        }
        self.bits += self.n_bits as usize;
    }

    pub fn set_width(&mut self, n_bits: u32) {
        let group = (self.n_bits as usize) << 3;
        self.bits = self.group_start + (self.bits - self.group_start).next_multiple_of(group);
        self.group_start = self.bits;
        self.n_bits = n_bits;
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.bytes.resize(self.bits.div_ceil(8), 0);
        self.bytes
    }
}

pub(crate) struct Encoder {
    max_bits: u8,
    block_mode: bool,
    writer: BitWriter,
    table: HashMap<(u32, u8), u32>,
    /// Next code the encoder hands out.
    free_ent: u32,
    /// Next free code of a decoder about to read the next code. Trails
    /// |free_ent| by one, since the decoder learns an entry one code late.
    dec_free: u32,
    /// The next code starts a string table (first code, or first after CLEAR).
    fresh: bool,
    ent: Option<u32>,
}

impl Encoder {
    pub fn new(max_bits: u8, block_mode: bool) -> Self {
        let first = if block_mode { FIRST } else { CLEAR };
        Encoder {
            max_bits,
            block_mode,
            writer: BitWriter::new(),
            table: HashMap::new(),
            free_ent: first,
            dec_free: first,
            fresh: true,
            ent: None,
        }
    }

    fn max_max_code(&self) -> u32 {
        1 << self.max_bits
    }

    fn emit(&mut self, code: u32) {
        let n_bits = self.writer.n_bits;
        if n_bits < self.max_bits as u32 && self.dec_free > (1 << n_bits) - 1 {
            self.writer.set_width(n_bits + 1);
        }
        self.writer.put(code);
        if self.fresh {
            self.fresh = false;
        } else if self.dec_free < self.max_max_code() {
            self.dec_free += 1;
        }
    }

    pub fn write(&mut self, data: &[u8]) {
        for &c in data {
            let Some(ent) = self.ent else {
                self.ent = Some(c.into());
                continue;
            };
            if let Some(&code) = self.table.get(&(ent, c)) {
                self.ent = Some(code);
                continue;
            }
            self.emit(ent);
            if self.free_ent < self.max_max_code() {
                self.table.insert((ent, c), self.free_ent);
                self.free_ent += 1;
            }
            self.ent = Some(c.into());
        }
    }

    /// Ends the pending string and emits CLEAR.
    pub fn clear(&mut self) {
        assert!(self.block_mode);
        if let Some(ent) = self.ent.take() {
            self.emit(ent);
        }
        self.emit(CLEAR);
        self.writer.set_width(INIT_BITS);
        self.table.clear();
        self.free_ent = FIRST;
        self.dec_free = FIRST;
        self.fresh = true;
    }

    pub fn finish(mut self) -> Vec<u8> {
        if let Some(ent) = self.ent.take() {
            self.emit(ent);
        }
        let flags = self.max_bits | if self.block_mode { 0x80 } else { 0 };
        let mut stream = vec![MAGIC[0], MAGIC[1], flags];
        stream.extend(self.writer.finish());
        stream
    }
}

pub(crate) fn compress(data: &[u8], max_bits: u8, block_mode: bool) -> Vec<u8> {
    let mut encoder = Encoder::new(max_bits, block_mode);
    encoder.write(data);
    encoder.finish()
}

/// Hands out the input in chunks of the given sizes, in rotation.
pub(crate) struct Chunked<'a> {
    data: &'a [u8],
    sizes: Vec<usize>,
    turn: usize,
}

impl<'a> Chunked<'a> {
    pub fn new(data: &'a [u8], sizes: &[usize]) -> Self {
        assert!(sizes.iter().all(|&s| s > 0));
        Chunked {
            data,
            sizes: sizes.to_vec(),
            turn: 0,
        }
    }
}

impl Read for Chunked<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.sizes[self.turn % self.sizes.len()]
            .min(buf.len())
            .min(self.data.len());
        self.turn += 1;
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

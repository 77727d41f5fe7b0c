pub(crate) mod bit_reader;
pub(crate) mod dictionary;
#[cfg(test)]
pub(crate) mod encoder;
pub mod error;
pub mod header;
pub(crate) mod output;

use crate::core::bit_reader::{CodeReader, INIT_BITS};
use crate::core::dictionary::{Dictionary, Expander};
use crate::core::error::{ErrorContext, ErrorKind, Res};
use crate::core::header::{Header, CLEAR};
use crate::core::output::OutputAssembler;
use std::io::Read;

/// Everything one decode owns.
pub(crate) struct Core<In: Read> {
    pub reader: CodeReader<In>,
    pub header: Header,
    pub dictionary: Dictionary,
    pub expander: Expander,
    pub output: OutputAssembler,
    /// The previous code, none before the first one.
    pub old_code: Option<u32>,
    /// First byte of the previous code's string.
    pub final_byte: u8,
    /// Set by CLEAR. The code after it starts a fresh string and defines
    /// nothing, since compress gives the slot it would fill to CLEAR itself.
    pub restarted: bool,
}

impl<In: Read> ErrorContext for Core<In> {
    fn describe(&self) -> Option<String> {
        Some(format!(
            "old code {:?}, next free code {}, width {}",
            self.old_code,
            self.dictionary.next_free(),
            self.reader.width()
        ))
    }
}

impl<In: Read> Core<In> {
    /// Reads the header and sets up the tables it asks for.
    pub fn new(input: In) -> Res<Self> {
        let mut reader = CodeReader::new(input)?;
        let header = reader.header()?;
        Ok(Core {
            reader,
            header,
            dictionary: Dictionary::new(&header),
            expander: Expander::new(&header),
            output: OutputAssembler::new(),
            old_code: None,
            final_byte: 0,
            restarted: false,
        })
    }

    /// Decodes codes until the input runs out.
    pub fn decode(&mut self) -> Res<()> {
        loop {
            self.reader.refill()?;
            while let Some(code) = self.next_code()? {
                self.process(code)?;
            }
            if self.reader.exhausted() {
                break;
            }
        }
        log::info!(
            "Decoded {} bytes, {} codes defined",
            self.output.len(),
            self.dictionary.next_free()
        );
        Ok(())
    }

    fn needs_widening(&self) -> bool {
        let n_bits = self.reader.width();
        n_bits < u32::from(self.header.max_bits) && self.dictionary.next_free() > (1 << n_bits) - 1
    }

    fn next_code(&mut self) -> Res<Option<u32>> {
        while self.reader.has_code() {
            if self.needs_widening() {
                self.reader.set_width(self.reader.width() + 1)?;
                continue;
            }
            return Ok(Some(self.reader.read_code()));
        }
        Ok(None)
    }

    fn process(&mut self, code: u32) -> Res<()> {
        let Some(old_code) = self.old_code else {
            self.assert_lt(ErrorKind::Other, code, 256)?;
            self.literal(code);
            return Ok(());
        };

        if code == CLEAR && self.header.block_mode {
            log::debug!(
                "CLEAR with {} codes defined at width {}",
                self.dictionary.next_free(),
                self.reader.width()
            );
            self.dictionary.reset();
            self.reader.set_width(INIT_BITS)?;
            self.restarted = true;
            return Ok(());
        }

        if self.restarted {
            self.assert_lt(ErrorKind::CorruptInput, code, 256)?;
            self.restarted = false;
            self.literal(code);
            return Ok(());
        }

        let string = self
            .expander
            .expand(&self.dictionary, code, old_code, self.final_byte)?;
        self.final_byte = string[0];
        self.output.extend(string);
        self.dictionary.insert(old_code, self.final_byte);
        self.old_code = Some(code);
        Ok(())
    }

    fn literal(&mut self, code: u32) {
        self.final_byte = code as u8;
        self.output.push(self.final_byte);
        self.old_code = Some(code);
    }

    pub fn finish(self) -> Vec<u8> {
        self.output.finish()
    }
}

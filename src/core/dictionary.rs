use crate::core::error::{ErrorContext, ErrorKind, Res, ResultBuilder};
use crate::core::header::Header;

/// What a code stands for: the string of |prefix| followed by |suffix|.
/// Literals have no prefix.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Entry {
    pub prefix: Option<u32>,
    pub suffix: u8,
}

/// The string table rebuilt while decoding. Codes below 256 are literals and
/// never stored.
pub(crate) struct Dictionary {
    prefix: Vec<u16>,
    suffix: Vec<u8>,
    next_free: u32,
    first: u32,
    max_max_code: u32,
}

impl ErrorContext for Dictionary {
    fn describe(&self) -> Option<String> {
        Some(format!("next free code {}", self.next_free))
    }
}

impl Dictionary {
    pub fn new(header: &Header) -> Self {
        let max_max_code = header.max_max_code();
        let size = max_max_code.max(256) as usize;
        Dictionary {
            prefix: vec![0; size],
            suffix: vec![0; size],
            next_free: header.first_free(),
            first: header.first_free(),
            max_max_code,
        }
    }

    /// Forgets every entry above the literals.
    pub fn reset(&mut self) {
        self.next_free = self.first;
    }

    pub fn next_free(&self) -> u32 {
        self.next_free
    }

    pub fn is_full(&self) -> bool {
        self.next_free >= self.max_max_code
    }

    /// Binds the next free code. A full table stays as it is.
    pub fn insert(&mut self, prefix: u32, suffix: u8) -> Option<u32> {
        if self.is_full() {
            return None;
        }
        let code = self.next_free;
        self.prefix[code as usize] = prefix as u16;
        self.suffix[code as usize] = suffix;
        self.next_free += 1;
        Some(code)
    }

    pub fn lookup(&self, code: u32) -> Option<Entry> {
        if code < 256 {
            Some(Entry {
                prefix: None,
                suffix: code as u8,
            })
        } else if (self.first..self.next_free).contains(&code) {
            Some(Entry {
                prefix: Some(self.prefix[code as usize].into()),
                suffix: self.suffix[code as usize],
            })
        } else {
            None
        }
    }
}

/// Turns codes back into bytes by walking prefix chains. The chain is
/// walked from the end of the string, so bytes are stacked from the top of
/// a buffer down and come out in order.
pub(crate) struct Expander {
    stack: Vec<u8>,
}

impl Expander {
    pub fn new(header: &Header) -> Self {
        // a chain visits each entry at most once, plus one byte for KwKwK
        Expander {
            stack: vec![0; header.max_max_code().max(256) as usize + 1],
        }
    }

    /// Returns the string for |code|. Its first byte is the new final byte.
    ///
    /// A code equal to the next free code is the one the encoder defined
    /// right before using it: the previous string plus its own first byte.
    pub fn expand(
        &mut self,
        dictionary: &Dictionary,
        code: u32,
        old_code: u32,
        final_byte: u8,
    ) -> Res<&[u8]> {
        let mut top = self.stack.len();
        let mut code = code;
        if code >= dictionary.next_free() {
            dictionary.assert_le(ErrorKind::CorruptInput, code, dictionary.next_free())?;
            top -= 1;
            self.stack[top] = final_byte;
            code = old_code;
        }
        loop {
            let entry = dictionary
                .lookup(code)
                .kind(ErrorKind::CorruptInput)
                .message(|_| format!("code {} is not defined", code))?;
            top = top
                .checked_sub(1)
                .message(|_| format!("prefix chain of {} is too long", code))?;
            self.stack[top] = entry.suffix;
            match entry.prefix {
                Some(prefix) => code = prefix,
                None => break,
            }
        }
        Ok(&self.stack[top..])
    }
}

//! Decoder for the `.Z` files written by Unix `compress`.
//!
//! The whole stream is decoded up front and handed back as a seekable cursor,
//! ready for an archive reader or anything else that wants `Read + Seek`.

mod core;

use crate::core::error::ResultBuilder;
use crate::core::Core;
use std::io::{Cursor, Read};

pub use crate::core::error::{ErrorKind, Res, ZError};
pub use crate::core::header::Header;

/// Where an [`Extractor`] is in its work.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum State {
    Init,
    ReadingHeader,
    Decoding,
    Done,
    Failed(ErrorKind),
}

pub struct Extractor<In: Read> {
    input: Option<In>,
    state: State,
    header: Option<Header>,
}

impl<In: Read> Extractor<In> {
    pub fn new(input: In) -> Extractor<In> {
        Extractor {
            input: Some(input),
            state: State::Init,
            header: None,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// The stream header, once it has been read.
    pub fn header(&self) -> Option<Header> {
        self.header
    }

    /// Decodes the entire input. Fails without output if any part of it is bad.
    pub fn extract(&mut self) -> Res<Cursor<Vec<u8>>> {
        let input = self
            .input
            .take()
            .message(|_| format!("input already consumed ({:?})", self.state))?;
        let result = self.run(input);
        self.state = match &result {
            Ok(_) => State::Done,
            Err(e) => State::Failed(e.kind()),
        };
        result
    }

    fn run(&mut self, input: In) -> Res<Cursor<Vec<u8>>> {
        self.state = State::ReadingHeader;
        let mut core = Core::new(input)?;
        self.header = Some(core.header);
        self.state = State::Decoding;
        core.decode()?;
        Ok(Cursor::new(core.finish()))
    }
}

/// Decodes a `.Z` stream into memory.
pub fn decompress<In: Read>(input: In) -> Res<Cursor<Vec<u8>>> {
    Extractor::new(input).extract()
}

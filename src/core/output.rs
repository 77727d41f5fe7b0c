/// Size of the staging chunk.
pub const OBUFSIZ: usize = 8192;

/// Collects decoded bytes in a fixed chunk and moves full chunks into the
/// result.
pub(crate) struct OutputAssembler {
    staging: Vec<u8>,
    outpos: usize,
    output: Vec<u8>,
}

impl OutputAssembler {
    pub fn new() -> Self {
        OutputAssembler {
            staging: vec![0; OBUFSIZ],
            outpos: 0,
            output: Vec::new(),
        }
    }

    pub fn push(&mut self, byte: u8) {
        self.extend(&[byte]);
    }

    pub fn extend(&mut self, mut bytes: &[u8]) {
        while !bytes.is_empty() {
            let count = bytes.len().min(OBUFSIZ - self.outpos);
            self.staging[self.outpos..][..count].copy_from_slice(&bytes[..count]);
            self.outpos += count;
            bytes = &bytes[count..];
            if self.outpos == OBUFSIZ {
                self.flush();
            }
        }
    }

    fn flush(&mut self) {
        self.output.extend_from_slice(&self.staging[..self.outpos]);
        self.outpos = 0;
    }

    /// Total bytes assembled so far.
    pub fn len(&self) -> usize {
        self.output.len() + self.outpos
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.flush();
        self.output
    }
}

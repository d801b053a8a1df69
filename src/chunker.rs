use std::io::{self, ErrorKind, Read};

/// Splits a reader into consecutive blocks of `block_len` bytes; only the last
/// block may be shorter.
pub(crate) struct Chunker<R> {
    input: R,
    block_len: usize,
    done: bool,
}

impl<R: Read> Chunker<R> {
    /// `block_len` must be positive; callers check it through `SignatureParams::validate`.
    pub(crate) fn new(input: R, block_len: usize) -> Self {
        debug_assert!(block_len > 0, "block length must be positive");
        Self {
            input,
            block_len,
            done: false,
        }
    }

    // a single read may return fewer bytes than asked for without being at EOF,
    // so keep reading until the block is full or the input is drained
    fn fill_block(&mut self) -> io::Result<Vec<u8>> {
        let mut block = vec![0; self.block_len];
        let mut filled = 0;
        while filled < self.block_len {
            match self.input.read(&mut block[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        block.truncate(filled);
        Ok(block)
    }
}

impl<R: Read> Iterator for Chunker<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.fill_block() {
            Ok(block) if block.is_empty() => {
                self.done = true;
                None
            }
            Ok(block) => {
                if block.len() < self.block_len {
                    self.done = true;
                }
                Some(Ok(block))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

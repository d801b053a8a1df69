//! Plain Adler-32 as the weak checksum, for matchers that roll zlib's checksum
//! instead of the rdiff one. Nothing in the signature header records which weak
//! checksum was used, so both ends have to agree on it out of band.

use super::RollingChecksum;

pub struct RollingAdler32 {
    sum: adler32::RollingAdler32,
    window_len: usize,
}

impl RollingAdler32 {
    /// Slides the window by one byte, keeping its length.
    pub fn rotate(&mut self, old_byte: u8, new_byte: u8) {
        self.sum.remove(self.window_len, old_byte);
        self.sum.update(new_byte);
    }
}

impl RollingChecksum for RollingAdler32 {
    type ChecksumType = u32;

    fn new(initial_data: &[u8]) -> Self {
        RollingAdler32 {
            sum: adler32::RollingAdler32::from_buffer(initial_data),
            window_len: initial_data.len(),
        }
    }

    fn checksum(&self) -> Self::ChecksumType {
        self.sum.hash()
    }

    fn push_byte(&mut self, new_byte: u8) {
        self.sum.update(new_byte);
        self.window_len += 1;
    }

    fn pop_byte(&mut self, old_byte: u8, window_len: usize) {
        self.sum.remove(window_len, old_byte);
        self.window_len = window_len.saturating_sub(1);
    }
}

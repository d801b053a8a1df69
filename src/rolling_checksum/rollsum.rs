//! The rdiff rolling checksum: an Adler-style pair of sums where every byte is
//! offset by a constant before being added, so runs of zero bytes still move the sum.

use super::RollingChecksum;

const CHAR_OFFSET: u32 = 31;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rollsum {
    count: u32,
    s1: u32,
    s2: u32,
}

impl Rollsum {
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.push_byte(byte);
        }
    }

    /// Slides a window of the current size by one byte.
    pub fn rotate(&mut self, old_byte: u8, new_byte: u8) {
        let old = u32::from(old_byte).wrapping_add(CHAR_OFFSET);
        self.s1 = self
            .s1
            .wrapping_add(u32::from(new_byte))
            .wrapping_sub(u32::from(old_byte));
        self.s2 = self
            .s2
            .wrapping_add(self.s1)
            .wrapping_sub(self.count.wrapping_mul(old));
    }
}

/// One-shot weak checksum of a whole block.
///
/// ```
/// use rolling_signature::rolling_checksum::rollsum::weak_checksum;
///
/// assert_eq!(weak_checksum(b""), 0);
/// // s1 = 'a' + 31 = 128, s2 = s1
/// assert_eq!(weak_checksum(b"a"), (128 << 16) | 128);
/// ```
pub fn weak_checksum(data: &[u8]) -> u32 {
    Rollsum::new(data).checksum()
}

impl RollingChecksum for Rollsum {
    type ChecksumType = u32;

    fn new(initial_data: &[u8]) -> Self {
        let mut sum = Rollsum::default();
        sum.update(initial_data);
        sum
    }

    fn checksum(&self) -> Self::ChecksumType {
        (self.s2 << 16) | (self.s1 & 0xffff)
    }

    fn push_byte(&mut self, new_byte: u8) {
        self.s1 = self
            .s1
            .wrapping_add(u32::from(new_byte))
            .wrapping_add(CHAR_OFFSET);
        self.s2 = self.s2.wrapping_add(self.s1);
        self.count = self.count.wrapping_add(1);
    }

    fn pop_byte(&mut self, old_byte: u8, window_len: usize) {
        let old = u32::from(old_byte).wrapping_add(CHAR_OFFSET);
        self.s1 = self.s1.wrapping_sub(old);
        self.s2 = self.s2.wrapping_sub((window_len as u32).wrapping_mul(old));
        self.count = self.count.wrapping_sub(1);
    }
}

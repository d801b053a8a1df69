pub mod rolling_adler32;
pub mod rollsum;

/// Weak checksum with the rolling property: the value for a window shifted by one
/// byte can be derived from the previous value without rescanning the window.
pub trait RollingChecksum {
    type ChecksumType;

    fn new(initial_data: &[u8]) -> Self;
    fn checksum(&self) -> Self::ChecksumType;

    fn push_byte(&mut self, new_byte: u8);
    /// `window_len` is the length of the window before `old_byte` leaves it.
    fn pop_byte(&mut self, old_byte: u8, window_len: usize);
}

use md4::{Digest, Md4};

use crate::strong_hash::StrongHash;

pub struct Md4Sum {}

impl StrongHash for Md4Sum {
    const DIGEST_LENGTH: usize = 16;

    fn hash(data: &[u8]) -> Vec<u8> {
        Md4::digest(data).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 1320 test suite
    #[test]
    fn test_md4_known_vectors() {
        assert_eq!(
            Md4Sum::hash(b""),
            [
                0x31, 0xd6, 0xcf, 0xe0, 0xd1, 0x6a, 0xe9, 0x31, 0xb7, 0x3c, 0x59, 0xd7, 0xe0, 0xc0,
                0x89, 0xc0,
            ]
        );
        assert_eq!(
            Md4Sum::hash(b"abc"),
            [
                0xa4, 0x48, 0x01, 0x7a, 0xaf, 0x21, 0xd8, 0x52, 0x5f, 0xc1, 0x0a, 0xe8, 0x7a, 0xa6,
                0x72, 0x9d,
            ]
        );
    }
}

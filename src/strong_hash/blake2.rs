use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

use crate::strong_hash::StrongHash;

type Blake2b256 = Blake2b<U32>;

/// BLAKE2b parameterized for a 32 byte output, not a truncated BLAKE2b-512.
pub struct Blake2Sum {}

impl StrongHash for Blake2Sum {
    const DIGEST_LENGTH: usize = 32;

    fn hash(data: &[u8]) -> Vec<u8> {
        Blake2b256::digest(data).to_vec()
    }
}

use serde::{Deserialize, Serialize};

use crate::error::{Result, SignatureError};

pub mod blake2;
pub mod md4;

use self::blake2::Blake2Sum;
use self::md4::Md4Sum;

pub trait StrongHash {
    const DIGEST_LENGTH: usize;

    /// Full, untruncated digest of `data`.
    fn hash(data: &[u8]) -> Vec<u8>;
}

/// Magic tag written at the start of every signature.
pub type MagicNumber = u32;

pub const BLAKE2_SIG_MAGIC: MagicNumber = 0x7273_0137;
pub const MD4_SIG_MAGIC: MagicNumber = 0x7273_0136;

/// Strong checksum algorithms a signature can be built with.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    /// BLAKE2b with a 256 bit output.
    Blake2,
    /// MD4, kept for signatures produced by older rdiff builds.
    Md4,
}

impl Default for SignatureAlgorithm {
    fn default() -> Self {
        SignatureAlgorithm::Blake2
    }
}

impl SignatureAlgorithm {
    pub fn magic(self) -> MagicNumber {
        match self {
            SignatureAlgorithm::Blake2 => BLAKE2_SIG_MAGIC,
            SignatureAlgorithm::Md4 => MD4_SIG_MAGIC,
        }
    }

    pub fn from_magic(magic: MagicNumber) -> Result<Self> {
        match magic {
            BLAKE2_SIG_MAGIC => Ok(SignatureAlgorithm::Blake2),
            MD4_SIG_MAGIC => Ok(SignatureAlgorithm::Md4),
            other => Err(SignatureError::UnsupportedAlgorithm(other)),
        }
    }

    pub fn digest_length(self) -> usize {
        match self {
            SignatureAlgorithm::Blake2 => Blake2Sum::DIGEST_LENGTH,
            SignatureAlgorithm::Md4 => Md4Sum::DIGEST_LENGTH,
        }
    }

    pub fn validate_strong_length(self, strong_len: u32) -> Result<()> {
        if strong_len == 0 {
            return Err(SignatureError::InvalidConfiguration(
                "strong length must be positive".to_string(),
            ));
        }
        if strong_len as usize > self.digest_length() {
            return Err(SignatureError::InvalidConfiguration(format!(
                "strong length {} exceeds the {} byte digest of {:?}",
                strong_len,
                self.digest_length(),
                self
            )));
        }
        Ok(())
    }

    /// The first `strong_len` bytes of the digest of `data`.
    ///
    /// ```
    /// use rolling_signature::strong_hash::SignatureAlgorithm;
    ///
    /// let full = SignatureAlgorithm::Md4.strong_sum(b"abcd", 16).unwrap();
    /// let short = SignatureAlgorithm::Md4.strong_sum(b"abcd", 8).unwrap();
    /// assert_eq!(&full[..8], short.as_slice());
    /// assert!(SignatureAlgorithm::Md4.strong_sum(b"abcd", 17).is_err());
    /// ```
    pub fn strong_sum(self, data: &[u8], strong_len: u32) -> Result<Vec<u8>> {
        self.validate_strong_length(strong_len)?;
        let mut digest = match self {
            SignatureAlgorithm::Blake2 => Blake2Sum::hash(data),
            SignatureAlgorithm::Md4 => Md4Sum::hash(data),
        };
        digest.truncate(strong_len as usize);
        Ok(digest)
    }
}

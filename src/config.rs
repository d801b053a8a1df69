use serde::{Deserialize, Serialize};

use crate::error::{Result, SignatureError};
use crate::strong_hash::SignatureAlgorithm;

pub const DEFAULT_BLOCK_LEN: u32 = 2048;

/// Parameters a signature is built with; they end up in the signature header.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureParams {
    pub algorithm: SignatureAlgorithm,
    pub block_len: u32,
    pub strong_len: u32,
}

impl Default for SignatureParams {
    fn default() -> Self {
        Self::new(SignatureAlgorithm::default())
    }
}

impl SignatureParams {
    /// Default block length and the untruncated digest of `algorithm`.
    pub fn new(algorithm: SignatureAlgorithm) -> Self {
        Self {
            algorithm,
            block_len: DEFAULT_BLOCK_LEN,
            strong_len: algorithm.digest_length() as u32,
        }
    }

    pub fn with_block_len(mut self, block_len: u32) -> Self {
        self.block_len = block_len;
        self
    }

    pub fn with_strong_len(mut self, strong_len: u32) -> Self {
        self.strong_len = strong_len;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.block_len == 0 {
            return Err(SignatureError::InvalidConfiguration(
                "block length must be positive".to_string(),
            ));
        }
        self.algorithm.validate_strong_length(self.strong_len)
    }
}

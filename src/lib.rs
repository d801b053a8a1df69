use std::collections::HashMap;

use bitvec::vec::BitVec;
use serde::{Deserialize, Serialize};

mod chunker;
pub mod config;
pub mod error;
pub mod signature_format;
pub mod signature_generation;

pub mod rolling_checksum;
pub mod strong_hash;

pub use config::SignatureParams;
pub use error::{Result, SignatureError};
pub use signature_format::{read_signature, read_signature_file, write_signature};
pub use signature_generation::generate_signature;
pub use strong_hash::SignatureAlgorithm;

pub type BlockNumber = usize;

/// Signature of a basis file: the strong sum of every block in file order plus
/// a weak checksum lookup table.
///
/// The lookup table is single valued. When two blocks share a weak checksum the
/// later block wins and the earlier one can only be reached by its index, so a
/// miss in [`SignatureIndex::lookup`] does not prove the content is absent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "RawSignatureIndex")]
pub struct SignatureIndex {
    algorithm: SignatureAlgorithm,
    block_len: u32,
    strong_len: u32,
    strong_sums: Vec<Vec<u8>>,
    // kept per block so the index can be written back out in full
    weak_sums: Vec<u32>,
    weak_index: HashMap<u32, BlockNumber>,
}

/// Unchecked mirror of [`SignatureIndex`] that deserialization goes through.
#[derive(Deserialize)]
struct RawSignatureIndex {
    algorithm: SignatureAlgorithm,
    block_len: u32,
    strong_len: u32,
    strong_sums: Vec<Vec<u8>>,
    weak_sums: Vec<u32>,
    weak_index: HashMap<u32, BlockNumber>,
}

impl TryFrom<RawSignatureIndex> for SignatureIndex {
    type Error = SignatureError;

    fn try_from(raw: RawSignatureIndex) -> Result<Self> {
        let params = SignatureParams {
            algorithm: raw.algorithm,
            block_len: raw.block_len,
            strong_len: raw.strong_len,
        };
        params.validate()?;
        if raw.weak_sums.len() != raw.strong_sums.len() {
            return Err(SignatureError::MalformedSignature(format!(
                "{} weak sums for {} strong sums",
                raw.weak_sums.len(),
                raw.strong_sums.len()
            )));
        }

        // replaying the blocks rebuilds the only weak index they can have
        let mut index = SignatureIndex::new(&params);
        for (weak, strong) in raw.weak_sums.into_iter().zip(raw.strong_sums) {
            if strong.len() != params.strong_len as usize {
                return Err(SignatureError::MalformedSignature(format!(
                    "strong sum of block {} is {} bytes, expected {}",
                    index.block_count(),
                    strong.len(),
                    params.strong_len
                )));
            }
            index.push_block(weak, strong);
        }
        if index.weak_index != raw.weak_index {
            return Err(SignatureError::MalformedSignature(
                "weak index does not match the weak sums".to_string(),
            ));
        }
        Ok(index)
    }
}

impl SignatureIndex {
    pub(crate) fn new(params: &SignatureParams) -> Self {
        Self {
            algorithm: params.algorithm,
            block_len: params.block_len,
            strong_len: params.strong_len,
            strong_sums: Vec::new(),
            weak_sums: Vec::new(),
            weak_index: HashMap::new(),
        }
    }

    /// Appends the next block. Returns the block it displaced from the weak
    /// lookup table, if any.
    pub(crate) fn push_block(&mut self, weak: u32, strong: Vec<u8>) -> Option<BlockNumber> {
        debug_assert_eq!(strong.len(), self.strong_len as usize);
        let block_number = self.strong_sums.len();
        self.strong_sums.push(strong);
        self.weak_sums.push(weak);
        self.weak_index.insert(weak, block_number)
    }

    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    pub fn block_len(&self) -> u32 {
        self.block_len
    }

    pub fn strong_len(&self) -> u32 {
        self.strong_len
    }

    pub fn params(&self) -> SignatureParams {
        SignatureParams {
            algorithm: self.algorithm,
            block_len: self.block_len,
            strong_len: self.strong_len,
        }
    }

    pub fn strong_sums(&self) -> &[Vec<u8>] {
        &self.strong_sums
    }

    pub fn weak_sums(&self) -> &[u32] {
        &self.weak_sums
    }

    pub fn weak_index(&self) -> &HashMap<u32, BlockNumber> {
        &self.weak_index
    }

    pub fn block_count(&self) -> usize {
        self.strong_sums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strong_sums.is_empty()
    }

    /// Candidate block for a weak checksum seen in the new file. The candidate
    /// still has to be confirmed against its strong sum.
    pub fn lookup(&self, weak: u32) -> Option<BlockNumber> {
        self.weak_index.get(&weak).copied()
    }

    /// Looks `data` up by its weak checksum and confirms the candidate with the
    /// strong sum.
    pub fn find_block(&self, weak: u32, data: &[u8]) -> Option<BlockNumber> {
        let candidate = self.lookup(weak)?;
        let strong = self.algorithm.strong_sum(data, self.strong_len).ok()?;
        if *self.strong_sums.get(candidate)? == strong {
            Some(candidate)
        } else {
            None
        }
    }

    /// Blocks that [`SignatureIndex::lookup`] can return.
    pub fn reachable_blocks(&self) -> BitVec {
        let mut reachable = BitVec::repeat(false, self.block_count());
        for &block_number in self.weak_index.values() {
            reachable.set(block_number, true);
        }
        reachable
    }
}

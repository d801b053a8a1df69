use std::io::{Read, Write};

use log::{debug, info};

use crate::chunker::Chunker;
use crate::config::SignatureParams;
use crate::error::Result;
use crate::rolling_checksum::RollingChecksum;
use crate::signature_format::{write_header, write_record};
use crate::SignatureIndex;

/// Reads `input` block by block, writes the encoded signature to `output` and
/// returns the same signature as an index.
///
/// The parameters are checked before anything is read or written. Any I/O error
/// aborts the build; whatever was already written to `output` is then garbage.
pub fn generate_signature<R, I, W>(
    input: I,
    output: &mut W,
    params: &SignatureParams,
) -> Result<SignatureIndex>
where
    R: RollingChecksum<ChecksumType = u32>,
    I: Read,
    W: Write,
{
    params.validate()?;
    write_header(output, params)?;

    let mut index = SignatureIndex::new(params);
    for block in Chunker::new(input, params.block_len as usize) {
        let block = block?;
        let weak = R::new(&block).checksum();
        let strong = params.algorithm.strong_sum(&block, params.strong_len)?;
        write_record(output, weak, &strong)?;

        if let Some(shadowed) = index.push_block(weak, strong) {
            debug!(
                "weak checksum {:#010x} of block {} shadows block {}",
                weak,
                index.block_count() - 1,
                shadowed
            );
        }
    }

    info!(
        "signature: {} blocks of {} bytes, {:?} strong sums truncated to {} bytes",
        index.block_count(),
        params.block_len,
        params.algorithm,
        params.strong_len
    );
    Ok(index)
}

/// Builds a signature of an in-memory basis, returning the index and its encoding.
///
/// ```
/// use rolling_signature::rolling_checksum::rollsum::Rollsum;
/// use rolling_signature::signature_generation::generate_signature_from_bytes;
/// use rolling_signature::{SignatureAlgorithm, SignatureParams};
///
/// let params = SignatureParams::new(SignatureAlgorithm::Md4).with_block_len(4);
/// let (index, bytes) = generate_signature_from_bytes::<Rollsum>(b"abcdwxyz", &params).unwrap();
/// assert_eq!(index.block_count(), 2);
/// assert_eq!(bytes.len(), 12 + 2 * (4 + 16));
/// ```
pub fn generate_signature_from_bytes<R>(
    content: &[u8],
    params: &SignatureParams,
) -> Result<(SignatureIndex, Vec<u8>)>
where
    R: RollingChecksum<ChecksumType = u32>,
{
    let mut bytes = Vec::new();
    let index = generate_signature::<R, _, _>(content, &mut bytes, params)?;
    Ok((index, bytes))
}

#[cfg(test)]
mod test {
    use std::io;

    use test_case::test_case;

    use crate::error::SignatureError;
    use crate::rolling_checksum::rolling_adler32::RollingAdler32;
    use crate::rolling_checksum::rollsum::{weak_checksum, Rollsum};
    use crate::signature_format::{read_signature_from_bytes, write_signature_to_bytes};
    use crate::strong_hash::SignatureAlgorithm;

    use super::*;

    fn content(len: usize) -> Vec<u8> {
        (0..len).map(|x| (x * 31 % 256) as u8).collect()
    }

    #[test_case(0, 4, 0; "empty input")]
    #[test_case(8, 4, 2; "exact multiple")]
    #[test_case(10, 4, 3; "short last block")]
    #[test_case(3, 2048, 1; "smaller than a block")]
    #[test_case(1000, 1, 1000; "single byte blocks")]
    fn test_block_count(content_len: usize, block_len: u32, blocks: usize) {
        let params = SignatureParams::new(SignatureAlgorithm::Blake2).with_block_len(block_len);
        let (index, bytes) =
            generate_signature_from_bytes::<Rollsum>(&content(content_len), &params).unwrap();

        assert_eq!(index.block_count(), blocks);
        assert_eq!(bytes.len(), 12 + blocks * (4 + 32));
    }

    #[test_case(SignatureAlgorithm::Blake2, 32; "blake2 full")]
    #[test_case(SignatureAlgorithm::Blake2, 8; "blake2 truncated")]
    #[test_case(SignatureAlgorithm::Md4, 16; "md4 full")]
    #[test_case(SignatureAlgorithm::Md4, 3; "md4 truncated")]
    fn test_round_trip(algorithm: SignatureAlgorithm, strong_len: u32) {
        let params = SignatureParams::new(algorithm)
            .with_block_len(64)
            .with_strong_len(strong_len);
        let (index, bytes) = generate_signature_from_bytes::<Rollsum>(&content(1000), &params).unwrap();

        let decoded = read_signature_from_bytes(&bytes).unwrap();
        assert_eq!(decoded, index);
        assert_eq!(write_signature_to_bytes(&decoded).unwrap(), bytes);
    }

    #[test]
    fn test_sums_match_blocks() {
        let data = content(333);
        let params = SignatureParams::new(SignatureAlgorithm::Md4)
            .with_block_len(50)
            .with_strong_len(10);
        let (index, _) = generate_signature_from_bytes::<Rollsum>(&data, &params).unwrap();

        for (block_number, block) in data.chunks(50).enumerate() {
            let full = SignatureAlgorithm::Md4.strong_sum(block, 16).unwrap();
            assert_eq!(index.strong_sums()[block_number], &full[..10]);
            assert_eq!(index.weak_sums()[block_number], weak_checksum(block));
            assert_eq!(index.find_block(weak_checksum(block), block), Some(block_number));
        }
    }

    #[test]
    fn test_deterministic() {
        let params = SignatureParams::default().with_block_len(100);
        let (_, first) = generate_signature_from_bytes::<Rollsum>(&content(5000), &params).unwrap();
        let (_, second) = generate_signature_from_bytes::<Rollsum>(&content(5000), &params).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_abcdwxyz() {
        let params = SignatureParams::new(SignatureAlgorithm::Md4).with_block_len(4);
        let (index, bytes) = generate_signature_from_bytes::<Rollsum>(b"abcdwxyz", &params).unwrap();

        assert_eq!(index.block_count(), 2);
        assert_eq!(index.weak_index().len(), 2);
        assert_eq!(index.lookup(weak_checksum(b"abcd")), Some(0));
        assert_eq!(index.lookup(weak_checksum(b"wxyz")), Some(1));
        assert_eq!(&bytes[..4], &[0x72, 0x73, 0x01, 0x36]);
        assert_eq!(&bytes[12..16], &weak_checksum(b"abcd").to_be_bytes());

        assert_eq!(read_signature_from_bytes(&bytes).unwrap(), index);
    }

    #[test]
    fn test_empty_input() {
        let (index, bytes) =
            generate_signature_from_bytes::<Rollsum>(&[], &SignatureParams::default()).unwrap();
        assert_eq!(bytes.len(), 12);
        assert!(index.is_empty());
        assert!(index.weak_index().is_empty());
        assert!(read_signature_from_bytes(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_repeated_blocks_keep_the_last() {
        let data = b"abcdabcdwxyzabcd";
        let params = SignatureParams::new(SignatureAlgorithm::Md4).with_block_len(4);
        let (index, _) = generate_signature_from_bytes::<Rollsum>(data, &params).unwrap();

        assert_eq!(index.block_count(), 4);
        assert_eq!(index.lookup(weak_checksum(b"abcd")), Some(3));
        assert_eq!(index.strong_sums()[0], index.strong_sums()[3]);
        let reachable: Vec<bool> = index.reachable_blocks().iter().map(|b| *b).collect();
        assert_eq!(reachable, vec![false, false, true, true]);
    }

    struct ConstantChecksum {}

    impl RollingChecksum for ConstantChecksum {
        type ChecksumType = u32;
        fn new(_: &[u8]) -> Self {
            Self {}
        }
        fn checksum(&self) -> Self::ChecksumType {
            69
        }
        fn push_byte(&mut self, _: u8) {}
        fn pop_byte(&mut self, _: u8, _: usize) {}
    }

    #[test]
    fn test_colliding_weak_checksums() {
        let params = SignatureParams::new(SignatureAlgorithm::Blake2).with_block_len(10);
        let (index, bytes) =
            generate_signature_from_bytes::<ConstantChecksum>(&content(95), &params).unwrap();

        assert_eq!(index.block_count(), 10);
        assert_eq!(index.weak_index().len(), 1);
        assert_eq!(index.lookup(69), Some(9));
        assert_eq!(read_signature_from_bytes(&bytes).unwrap(), index);
    }

    #[test]
    fn test_adler32_weak_checksum() {
        let params = SignatureParams::default().with_block_len(16);
        let data = content(40);
        let (index, _) = generate_signature_from_bytes::<RollingAdler32>(&data, &params).unwrap();
        assert_eq!(index.weak_sums()[2], adler32::adler32(&data[32..]).unwrap());
    }

    #[test_case(SignatureAlgorithm::Md4, 4, 17; "strong length too long")]
    #[test_case(SignatureAlgorithm::Blake2, 0, 32; "zero block length")]
    fn test_invalid_params_write_nothing(algorithm: SignatureAlgorithm, block_len: u32, strong_len: u32) {
        let params = SignatureParams {
            algorithm,
            block_len,
            strong_len,
        };
        let mut output = Vec::new();
        let err = generate_signature::<Rollsum, _, _>(&b"abcdwxyz"[..], &mut output, &params)
            .unwrap_err();

        assert!(matches!(err, SignatureError::InvalidConfiguration(_)));
        assert!(output.is_empty());
    }

    struct FailAfter(usize);

    impl Write for FailAfter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.0 < buf.len() {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
            }
            self.0 -= buf.len();
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test_case(0; "while writing the header")]
    #[test_case(16; "while writing a record")]
    fn test_write_errors_abort(budget: usize) {
        let params = SignatureParams::new(SignatureAlgorithm::Md4).with_block_len(4);
        let result =
            generate_signature::<Rollsum, _, _>(&b"abcdwxyz"[..], &mut FailAfter(budget), &params);
        assert!(matches!(result, Err(SignatureError::Io(_))));
    }

    #[test]
    fn test_read_errors_abort() {
        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "gone"))
            }
        }
        let result = generate_signature::<Rollsum, _, _>(Failing, &mut Vec::new(), &SignatureParams::default());
        assert!(matches!(result, Err(SignatureError::Io(_))));
    }
}

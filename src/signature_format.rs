//! Signature wire format, big endian throughout:
//!
//! ```text
//! magic: u32 | block_len: u32 | strong_len: u32 | (weak: u32, strong: [u8; strong_len])*
//! ```
//!
//! The record stream ends at EOF on a record boundary.

use std::fs::File;
use std::io::{self, ErrorKind, Read, Write};
use std::path::Path;

use byteorder::{BigEndian, ByteOrder, ReadBytesExt, WriteBytesExt};
use log::debug;

use crate::config::SignatureParams;
use crate::error::{Result, SignatureError};
use crate::strong_hash::SignatureAlgorithm;
use crate::SignatureIndex;

pub const HEADER_LEN: usize = 12;

pub fn write_header<W: Write>(output: &mut W, params: &SignatureParams) -> Result<()> {
    output.write_u32::<BigEndian>(params.algorithm.magic())?;
    output.write_u32::<BigEndian>(params.block_len)?;
    output.write_u32::<BigEndian>(params.strong_len)?;
    Ok(())
}

pub fn write_record<W: Write>(output: &mut W, weak: u32, strong: &[u8]) -> Result<()> {
    output.write_u32::<BigEndian>(weak)?;
    output.write_all(strong)?;
    Ok(())
}

/// Encodes an existing index. The output is byte for byte what
/// [`crate::generate_signature`] wrote when the index was built.
pub fn write_signature<W: Write>(index: &SignatureIndex, output: &mut W) -> Result<()> {
    write_header(output, &index.params())?;
    for (weak, strong) in index.weak_sums().iter().zip(index.strong_sums()) {
        write_record(output, *weak, strong)?;
    }
    Ok(())
}

pub fn write_signature_to_bytes(index: &SignatureIndex) -> Result<Vec<u8>> {
    let mut bytes =
        Vec::with_capacity(HEADER_LEN + index.block_count() * (4 + index.strong_len() as usize));
    write_signature(index, &mut bytes)?;
    Ok(bytes)
}

fn truncated(what: &str) -> impl FnOnce(io::Error) -> SignatureError + '_ {
    move |e| match e.kind() {
        ErrorKind::UnexpectedEof => {
            SignatureError::MalformedSignature(format!("signature truncated in {}", what))
        }
        _ => SignatureError::Io(e),
    }
}

fn read_header<R: Read>(input: &mut R) -> Result<SignatureParams> {
    let magic = input.read_u32::<BigEndian>().map_err(truncated("magic"))?;
    let block_len = input.read_u32::<BigEndian>().map_err(truncated("block length"))?;
    let strong_len = input.read_u32::<BigEndian>().map_err(truncated("strong length"))?;

    let algorithm = SignatureAlgorithm::from_magic(magic)?;
    let params = SignatureParams {
        algorithm,
        block_len,
        strong_len,
    };
    params.validate().map_err(|e| match e {
        SignatureError::InvalidConfiguration(reason) => {
            SignatureError::MalformedSignature(format!("bad header: {}", reason))
        }
        other => other,
    })?;
    Ok(params)
}

/// Reads the weak checksum opening the next record. `None` means the input
/// ended cleanly before the record began.
fn read_weak<R: Read>(input: &mut R) -> Result<Option<u32>> {
    let mut buf = [0u8; 4];
    let mut filled = 0;
    while filled < buf.len() {
        match input.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => {
                return Err(SignatureError::MalformedSignature(format!(
                    "got only {}/4 bytes of a weak checksum",
                    filled
                )))
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(Some(BigEndian::read_u32(&buf)))
}

pub fn read_signature<R: Read>(mut input: R) -> Result<SignatureIndex> {
    let params = read_header(&mut input)?;
    let mut index = SignatureIndex::new(&params);

    while let Some(weak) = read_weak(&mut input)? {
        let mut strong = vec![0; params.strong_len as usize];
        input.read_exact(&mut strong).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => SignatureError::MalformedSignature(format!(
                "record {} has an incomplete strong sum of {} bytes",
                index.block_count(),
                params.strong_len
            )),
            _ => SignatureError::Io(e),
        })?;
        index.push_block(weak, strong);
    }

    debug!(
        "read signature: {:?}, block length {}, strong length {}, {} blocks",
        params.algorithm,
        params.block_len,
        params.strong_len,
        index.block_count()
    );
    Ok(index)
}

pub fn read_signature_from_bytes(bytes: &[u8]) -> Result<SignatureIndex> {
    read_signature(bytes)
}

/// Same as [`read_signature`] on the opened file; the file is closed on return
/// whether or not decoding succeeded.
pub fn read_signature_file<P: AsRef<Path>>(path: P) -> Result<SignatureIndex> {
    let file = File::open(path)?;
    read_signature(io::BufReader::new(file))
}

// Layout follows the safetensors container: https://docs.rs/safetensors/latest/src/safetensors/tensor.rs.html

use std::io::Read;

use serde_json::{Map, Value};

use super::error::HeaderCodecError;

pub const METADATA_KEY: &str = "__metadata__";
pub const LENGTH_PREFIX_SIZE: usize = size_of::<u64>();
pub const MAX_HEADER_SIZE: usize = 100_000_000;

/// A parsed container header together with its position in the container.
#[derive(Debug, Clone)]
pub struct DecodedHeader {
    pub raw_header: Map<String, Value>,
    pub header_length: u64,
    pub payload_offset: usize,
}

impl DecodedHeader {
    /// Tensor descriptor keys, in header order.
    pub fn tensor_names(&self) -> impl Iterator<Item = &str> {
        self.raw_header
            .keys()
            .filter(|key| key.as_str() != METADATA_KEY)
            .map(String::as_str)
    }

    /// The payload part of `bytes`, or `None` when `bytes` ends before it.
    pub fn payload<'a>(
        &self,
        bytes: &'a [u8],
    ) -> Option<&'a [u8]> {
        bytes.get(self.payload_offset..)
    }
}

fn header_length(bytes: &[u8]) -> Result<u64, HeaderCodecError> {
    let prefix: [u8; LENGTH_PREFIX_SIZE] = bytes
        .get(..LENGTH_PREFIX_SIZE)
        .and_then(|prefix| prefix.try_into().ok())
        .ok_or(HeaderCodecError::TruncatedInput {
            required: LENGTH_PREFIX_SIZE as u64,
            available: bytes.len(),
        })?;
    let header_length = u64::from_le_bytes(prefix);
    if header_length > u64::from(u32::MAX) {
        return Err(HeaderCodecError::malformed(format!(
            "declared header length {header_length} has a non-zero high word"
        )));
    }
    Ok(header_length)
}

/// Decodes the header of a container.
///
/// `bytes` only has to cover the length prefix and the header itself, the
/// payload is never looked at.
pub fn decode(bytes: &[u8]) -> Result<DecodedHeader, HeaderCodecError> {
    let header_length = header_length(bytes)?;
    let required = header_length + LENGTH_PREFIX_SIZE as u64;
    let payload_offset = usize::try_from(required)
        .ok()
        .filter(|&stop| stop <= bytes.len())
        .ok_or(HeaderCodecError::TruncatedInput {
            required,
            available: bytes.len(),
        })?;

    let text = std::str::from_utf8(&bytes[LENGTH_PREFIX_SIZE..payload_offset])
        .map_err(|_| HeaderCodecError::InvalidEncoding)?;
    let raw_header = match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            return Err(HeaderCodecError::malformed(
                "header is not a JSON object",
            ));
        },
        Err(err) => return Err(HeaderCodecError::malformed(err.to_string())),
    };

    Ok(DecodedHeader {
        raw_header,
        header_length,
        payload_offset,
    })
}

/// Reads only the length prefix and the header from `reader`.
pub fn read_header<R: Read>(
    reader: &mut R
) -> Result<DecodedHeader, HeaderCodecError> {
    read_header_with_limit(reader, MAX_HEADER_SIZE)
}

pub fn read_header_with_limit<R: Read>(
    reader: &mut R,
    max_header_size: usize,
) -> Result<DecodedHeader, HeaderCodecError> {
    let mut buffer = Vec::with_capacity(LENGTH_PREFIX_SIZE);
    read_until(reader, &mut buffer, LENGTH_PREFIX_SIZE)?;
    let header_length = header_length(&buffer)?;
    let header_size = usize::try_from(header_length)
        .ok()
        .filter(|&size| size <= max_header_size)
        .ok_or(HeaderCodecError::HeaderTooLarge)?;

    buffer.reserve_exact(header_size);
    read_until(reader, &mut buffer, LENGTH_PREFIX_SIZE + header_size)?;
    decode(&buffer)
}

/// Fills `buffer` up to `total` bytes.
fn read_until<R: Read>(
    reader: &mut R,
    buffer: &mut Vec<u8>,
    total: usize,
) -> Result<(), HeaderCodecError> {
    let missing = total.saturating_sub(buffer.len()) as u64;
    reader.by_ref().take(missing).read_to_end(buffer)?;
    if buffer.len() < total {
        return Err(HeaderCodecError::TruncatedInput {
            required: total as u64,
            available: buffer.len(),
        });
    }
    Ok(())
}

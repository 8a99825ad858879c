use serde_json::Value;

use super::{
    error::HeaderCodecError,
    header::{LENGTH_PREFIX_SIZE, MAX_HEADER_SIZE, METADATA_KEY, decode},
    metadata::{Metadata, format_metadata},
};

/// Produces a complete new container with `new_metadata` stored under
/// `__metadata__`.
///
/// Tensor descriptors keep their keys, values and order, and the payload is
/// copied byte for byte. Nothing is returned unless the whole container could
/// be assembled.
pub fn encode_update(
    full_bytes: &[u8],
    new_metadata: &Metadata,
) -> Result<Vec<u8>, HeaderCodecError> {
    encode_update_with_limit(full_bytes, new_metadata, MAX_HEADER_SIZE)
}

/// Like [`encode_update`], refusing to produce a header longer than
/// `max_header_size` bytes.
pub fn encode_update_with_limit(
    full_bytes: &[u8],
    new_metadata: &Metadata,
    max_header_size: usize,
) -> Result<Vec<u8>, HeaderCodecError> {
    let decoded = decode(full_bytes)?;
    let mut raw_header = decoded.raw_header;
    raw_header.insert(
        METADATA_KEY.to_string(),
        Value::Object(format_metadata(new_metadata)),
    );

    let header_bytes = serde_json::to_vec(&raw_header)
        .map_err(HeaderCodecError::Serialization)?;
    if header_bytes.len() > max_header_size {
        return Err(HeaderCodecError::HeaderTooLarge);
    }
    let header_length = u64::try_from(header_bytes.len())
        .ok()
        .filter(|&length| length <= u64::from(u32::MAX))
        .ok_or_else(|| {
            HeaderCodecError::malformed("encoded header does not fit in 32 bits")
        })?;

    let payload = &full_bytes[decoded.payload_offset..];
    let mut output = Vec::with_capacity(
        LENGTH_PREFIX_SIZE + header_bytes.len() + payload.len(),
    );
    output.extend_from_slice(&header_length.to_le_bytes());
    output.extend_from_slice(&header_bytes);
    output.extend_from_slice(payload);
    Ok(output)
}

//! Codec for the length-prefixed safetensors container: a little-endian
//! `u64` header length, a JSON header, then the tensor payload.
//!
//! Only the header is ever interpreted. Updates rebuild the whole container
//! in memory and leave persisting it to the caller.

mod error;
mod header;
mod metadata;
mod writer;

pub use error::HeaderCodecError;
pub use header::{
    DecodedHeader, LENGTH_PREFIX_SIZE, MAX_HEADER_SIZE, METADATA_KEY, decode,
    read_header, read_header_with_limit,
};
pub use metadata::{
    ExtractedMetadata, Metadata, MetadataValue, extract_metadata,
    format_metadata, to_metadata,
};
pub use writer::{encode_update, encode_update_with_limit};

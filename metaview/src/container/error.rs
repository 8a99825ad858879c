use thiserror::Error;

#[derive(Debug, Error)]
pub enum HeaderCodecError {
    #[error(
        "The container is truncated: {required} bytes required, {available} available."
    )]
    TruncatedInput {
        required: u64,
        available: usize,
    },
    #[error("The header is an invalid UTF-8 string and cannot be read.")]
    InvalidEncoding,
    #[error("The header is malformed: {0}")]
    MalformedHeader(String),
    #[error("The header does not contain any metadata.")]
    NoMetadata,
    #[error("The header exceeds the maximum allowed header size.")]
    HeaderTooLarge,
    #[error("Metadata cannot be serialized to JSON: {0}")]
    Serialization(#[source] serde_json::Error),
    #[error("Metadata must be a JSON object.")]
    MetadataNotObject,
    #[error("Failed to read the header: {0}")]
    Io(#[from] std::io::Error),
}

impl HeaderCodecError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedHeader(reason.into())
    }
}

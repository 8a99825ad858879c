pub mod container;
pub use container::{
    DecodedHeader, ExtractedMetadata, HeaderCodecError, Metadata,
    MetadataValue, decode, encode_update, extract_metadata,
};

pub mod library;
pub use library::{
    FileInfo, FileMetadata, Library, LibraryError, MetadataStore, ModelFormat,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

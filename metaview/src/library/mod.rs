mod error;
mod file_info;
mod format;
mod library;
mod store;

pub use error::LibraryError;
pub use file_info::FileInfo;
pub use format::ModelFormat;
pub use library::Library;
pub use store::{FileMetadata, MetadataStore};

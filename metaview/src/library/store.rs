use std::{
    collections::HashMap,
    fs::File,
    io::{BufReader, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use serde::Serialize;
use tempfile::NamedTempFile;

use super::{
    error::LibraryError, file_info::FileInfo, format::ModelFormat,
    library::Library,
};
use crate::container::{
    ExtractedMetadata, HeaderCodecError, MAX_HEADER_SIZE, Metadata,
    encode_update_with_limit, extract_metadata, read_header_with_limit,
};

#[derive(Debug, Clone, Serialize)]
pub struct FileMetadata {
    pub file: FileInfo,
    #[serde(flatten)]
    pub extracted: ExtractedMetadata,
}

/// Reads and rewrites the metadata of files inside a [`Library`].
///
/// Updates to the same path are serialized; the file is replaced by renaming
/// a fully written sibling temp file over it.
pub struct MetadataStore {
    library: Library,
    max_header_size: usize,
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl MetadataStore {
    pub fn new(library: Library) -> Self {
        Self {
            library,
            max_header_size: MAX_HEADER_SIZE,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Headers above this size are neither read nor written.
    pub fn with_max_header_size(
        mut self,
        max_header_size: usize,
    ) -> Self {
        self.max_header_size = max_header_size;
        self
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Fails with a `NoMetadata` codec error when the header carries none.
    pub fn read_metadata(
        &self,
        relative: &str,
    ) -> Result<FileMetadata, LibraryError> {
        let (path, file) = self.safetensors_file(relative)?;
        let extracted = self.read_extracted(&path)?;
        Ok(FileMetadata {
            file,
            extracted,
        })
    }

    pub fn write_metadata(
        &self,
        relative: &str,
        metadata: &Metadata,
    ) -> Result<FileMetadata, LibraryError> {
        let (path, _) = self.safetensors_file(relative)?;

        let lock = self.lock_for(&path);
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.replace_metadata(&path, metadata)
        };
        self.release_lock(&path, lock);
        let extracted = result?;

        let file = FileInfo::from_path(
            self.library.root(),
            &path,
            ModelFormat::Safetensors,
        )?;
        Ok(FileMetadata {
            file,
            extracted,
        })
    }

    fn replace_metadata(
        &self,
        path: &Path,
        metadata: &Metadata,
    ) -> Result<ExtractedMetadata, LibraryError> {
        let bytes = std::fs::read(path)?;
        let updated =
            encode_update_with_limit(&bytes, metadata, self.max_header_size)?;
        drop(bytes);
        replace_file(path, &updated)?;

        match self.read_extracted(path) {
            Err(LibraryError::Codec(HeaderCodecError::NoMetadata)) => {
                Ok(ExtractedMetadata::default())
            },
            other => other,
        }
    }

    fn read_extracted(
        &self,
        path: &Path,
    ) -> Result<ExtractedMetadata, LibraryError> {
        let mut reader = BufReader::new(File::open(path)?);
        let decoded = read_header_with_limit(&mut reader, self.max_header_size)?;
        Ok(extract_metadata(&decoded.raw_header)?)
    }

    fn safetensors_file(
        &self,
        relative: &str,
    ) -> Result<(PathBuf, FileInfo), LibraryError> {
        let (path, file) = self.library.file(relative)?;
        if !file.format.has_metadata() {
            return Err(LibraryError::UnsupportedFormat(relative.to_string()));
        }
        Ok((path, file))
    }

    fn lock_for(
        &self,
        path: &Path,
    ) -> Arc<Mutex<()>> {
        let mut locks =
            self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(path.to_path_buf()).or_default().clone()
    }

    /// Forgets the lock of `path` once no other update holds or awaits it.
    fn release_lock(
        &self,
        path: &Path,
        lock: Arc<Mutex<()>>,
    ) {
        let mut locks =
            self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference in the map, one here.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(path);
        }
    }
}

fn replace_file(
    path: &Path,
    bytes: &[u8],
) -> Result<(), LibraryError> {
    let directory = path.parent().unwrap_or(Path::new("."));
    let permissions = std::fs::metadata(path)?.permissions();

    let mut temp = NamedTempFile::new_in(directory)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.as_file().set_permissions(permissions)?;
    temp.persist(path).map_err(|err| LibraryError::Io(err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::container::to_metadata;

    fn store_with_lora(dir: &TempDir) -> MetadataStore {
        let header = br#"{"__metadata__":{"name":"a"},"w":{"dtype":"U8","shape":[2],"data_offsets":[0,2]}}"#;
        let mut bytes = (header.len() as u64).to_le_bytes().to_vec();
        bytes.extend_from_slice(header);
        bytes.extend_from_slice(&[5, 6]);
        std::fs::write(dir.path().join("a.safetensors"), bytes).unwrap();
        MetadataStore::new(Library::open(dir.path()).unwrap())
    }

    #[test]
    fn test_locks_are_released_after_updates() {
        let dir = TempDir::new().unwrap();
        let store = store_with_lora(&dir);
        let metadata = to_metadata(&json!({"name": "b"})).unwrap();

        store.write_metadata("a.safetensors", &metadata).unwrap();
        assert!(store.locks.lock().unwrap().is_empty());

        let mut corrupt = 99u64.to_le_bytes().to_vec();
        corrupt.extend_from_slice(b"{}");
        std::fs::write(dir.path().join("b.safetensors"), corrupt).unwrap();
        assert!(store.write_metadata("b.safetensors", &metadata).is_err());
        assert!(store.locks.lock().unwrap().is_empty());
    }

    #[test]
    fn test_held_lock_is_kept() {
        let dir = TempDir::new().unwrap();
        let store = store_with_lora(&dir);
        let path = dir.path().join("a.safetensors");

        let first = store.lock_for(&path);
        let second = store.lock_for(&path);
        store.release_lock(&path, first);
        assert_eq!(store.locks.lock().unwrap().len(), 1);
        store.release_lock(&path, second);
        assert!(store.locks.lock().unwrap().is_empty());
    }
}

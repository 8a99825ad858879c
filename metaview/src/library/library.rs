use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use super::{error::LibraryError, file_info::FileInfo, format::ModelFormat};

/// A served directory of model files.
///
/// Every caller-supplied path goes through [`Library::resolve`], which refuses
/// anything that ends up outside of the root.
#[derive(Debug, Clone)]
pub struct Library {
    root: PathBuf,
}

impl Library {
    pub fn open(root: impl AsRef<Path>) -> Result<Self, LibraryError> {
        let root = root.as_ref();
        if !root.exists() {
            return Err(LibraryError::DirectoryNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(LibraryError::NotADirectory(root.to_path_buf()));
        }
        Ok(Self {
            root: root.canonicalize()?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All compatible files below the root, sorted by case-insensitive name.
    pub fn list(&self) -> Result<Vec<FileInfo>, LibraryError> {
        if !self.root.is_dir() {
            return Err(LibraryError::DirectoryNotFound(self.root.clone()));
        }

        let mut files: Vec<FileInfo> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    log::warn!("Skipping unreadable entry: {err}");
                    None
                },
            })
            .filter(|entry| entry.path().is_file())
            .filter(|entry| !entry.path_is_symlink() || self.contains(entry.path()))
            .filter_map(|entry| {
                let format = ModelFormat::from_path(entry.path())?;
                match FileInfo::from_path(&self.root, entry.path(), format) {
                    Ok(info) => Some(info),
                    Err(err) => {
                        log::warn!(
                            "Error getting file info for {}: {err}",
                            entry.path().display()
                        );
                        None
                    },
                }
            })
            .collect();
        files.sort_by_cached_key(|file| file.name.to_lowercase());
        Ok(files)
    }

    /// Maps a path relative to the root onto the filesystem.
    pub fn resolve(
        &self,
        relative: &str,
    ) -> Result<PathBuf, LibraryError> {
        let denied = || LibraryError::AccessDenied(relative.to_string());

        let mut resolved = self.root.clone();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {},
                Component::ParentDir => {
                    if resolved == self.root {
                        return Err(denied());
                    }
                    resolved.pop();
                },
                Component::RootDir | Component::Prefix(_) => {
                    return Err(denied());
                },
            }
        }

        // Symlinks may still point elsewhere.
        if let Ok(canonical) = resolved.canonicalize() {
            if !canonical.starts_with(&self.root) {
                return Err(denied());
            }
            return Ok(canonical);
        }
        Ok(resolved)
    }

    fn contains(
        &self,
        path: &Path,
    ) -> bool {
        path.canonicalize()
            .is_ok_and(|canonical| canonical.starts_with(&self.root))
    }

    /// Resolves `relative` and requires it to be an existing compatible file.
    pub fn file(
        &self,
        relative: &str,
    ) -> Result<(PathBuf, FileInfo), LibraryError> {
        let path = self.resolve(relative)?;
        if !path.is_file() {
            return Err(LibraryError::FileNotFound(relative.to_string()));
        }
        let format = ModelFormat::from_path(&path)
            .ok_or_else(|| LibraryError::UnsupportedFormat(relative.to_string()))?;
        let info = FileInfo::from_path(&self.root, &path, format)?;
        Ok((path, info))
    }
}

use std::{
    path::{Component, Path},
    time::UNIX_EPOCH,
};

use serde::Serialize;

use super::format::ModelFormat;

#[derive(Debug, Clone, Serialize)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    /// Seconds since the Unix epoch.
    pub modified: f64,
    pub path: String,
    pub relative_path: String,
    pub format: ModelFormat,
}

impl FileInfo {
    pub fn from_path(
        root: &Path,
        path: &Path,
        format: ModelFormat,
    ) -> std::io::Result<Self> {
        let stat = std::fs::metadata(path)?;
        let modified = stat
            .modified()?
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs_f64())
            .unwrap_or_default();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            name,
            size: stat.len(),
            modified,
            path: path.display().to_string(),
            relative_path: relative_path(root, path),
            format,
        })
    }
}

/// `/`-separated path of `path` below `root`.
fn relative_path(
    root: &Path,
    path: &Path,
) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

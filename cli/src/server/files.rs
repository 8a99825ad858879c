use metaview::{FileInfo, LibraryError};
use rocket::{
    Responder, State,
    fs::NamedFile,
    get,
    http::{
        Header,
        uri::{Segments, fmt::Path},
    },
    serde::json::Json,
};
use serde::Serialize;

use crate::server::{ApiError, ServerState};

#[derive(Serialize)]
pub struct FileListing {
    files: Vec<FileInfo>,
    total: usize,
    directory: String,
}

#[derive(Responder)]
#[response(content_type = "application/octet-stream")]
pub struct RawFile {
    file: NamedFile,
    disposition: Header<'static>,
}

/// Joins the raw request segments so that `..` reaches the library's own
/// path check instead of being folded away.
pub fn relative_path(segments: Segments<'_, Path>) -> String {
    segments.collect::<Vec<_>>().join("/")
}

#[get("/api/files")]
pub async fn list_files(
    state: &State<ServerState>
) -> Result<Json<FileListing>, ApiError> {
    let files = state.run_blocking(|store| store.library().list()).await?;
    let listing = FileListing {
        total: files.len(),
        files,
        directory: state.store.library().root().display().to_string(),
    };
    Ok(Json(listing))
}

#[get("/api/file/<path..>")]
pub async fn serve_file(
    path: Segments<'_, Path>,
    state: &State<ServerState>,
) -> Result<RawFile, ApiError> {
    let relative = relative_path(path);
    let resolved = state
        .run_blocking(move |store| {
            let resolved = store.library().resolve(&relative)?;
            if !resolved.is_file() {
                return Err(LibraryError::FileNotFound(relative));
            }
            Ok(resolved)
        })
        .await?;

    let name = resolved
        .file_name()
        .map(|name| name.to_string_lossy().replace('"', ""))
        .unwrap_or_default();
    let file = NamedFile::open(&resolved)
        .await
        .map_err(|err| ApiError::Library(err.into()))?;
    Ok(RawFile {
        file,
        disposition: Header::new(
            "Content-Disposition",
            format!("inline; filename=\"{name}\""),
        ),
    })
}

use metaview::{FileMetadata, Metadata};
use rocket::{
    State, get,
    http::uri::{Segments, fmt::Path},
    put,
    serde::json::{self, Json},
};
use uuid::Uuid;

use crate::server::{ApiError, ServerState, files::relative_path};

#[get("/api/metadata/<path..>")]
pub async fn get_metadata(
    path: Segments<'_, Path>,
    state: &State<ServerState>,
) -> Result<Json<FileMetadata>, ApiError> {
    let relative = relative_path(path);
    let result = state
        .run_blocking(move |store| store.read_metadata(&relative))
        .await?;
    Ok(Json(result))
}

#[put("/api/metadata/<path..>", data = "<metadata>")]
pub async fn put_metadata(
    path: Segments<'_, Path>,
    metadata: Result<Json<Metadata>, json::Error<'_>>,
    state: &State<ServerState>,
) -> Result<Json<FileMetadata>, ApiError> {
    let metadata =
        metadata.map_err(|err| ApiError::BadRequest(err.to_string()))?;
    let relative = relative_path(path);
    let id = Uuid::new_v4();

    log::info!(
        "[{id}] Updating {} metadata key(s) of \"{relative}\"",
        metadata.len()
    );
    let start_time = std::time::Instant::now();
    let target = relative.clone();
    let result = state
        .run_blocking(move |store| {
            store.write_metadata(&target, &metadata.into_inner())
        })
        .await;
    match &result {
        Ok(written) => log::info!(
            "[{id}] Wrote \"{relative}\" ({} bytes) in {:.3}s",
            written.file.size,
            start_time.elapsed().as_secs_f64()
        ),
        Err(err) => log::warn!("[{id}] Update of \"{relative}\" failed: {err}"),
    }
    Ok(Json(result?))
}

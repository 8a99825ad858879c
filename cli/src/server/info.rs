use metaview::{ModelFormat, VERSION};
use rocket::{
    State, get,
    response::{content::RawHtml, status::NotFound},
    serde::json::Json,
};
use serde::Serialize;

use crate::server::ServerState;

#[derive(Serialize)]
pub struct ServerInfo {
    files_directory: String,
    server_mode: bool,
    supported_formats: Vec<&'static str>,
    version: &'static str,
}

#[get("/")]
pub async fn index(
    state: &State<ServerState>
) -> Result<RawHtml<String>, NotFound<String>> {
    let index_path = &state.config.index_path;
    tokio::fs::read_to_string(index_path).await.map(RawHtml).map_err(|_| {
        NotFound(format!(
            "index.html not found. Looking for it at: {}",
            index_path.display()
        ))
    })
}

#[get("/api/info")]
pub fn server_info(state: &State<ServerState>) -> Json<ServerInfo> {
    Json(ServerInfo {
        files_directory: state.store.library().root().display().to_string(),
        server_mode: true,
        supported_formats: ModelFormat::ALL
            .iter()
            .map(ModelFormat::extension)
            .collect(),
        version: VERSION,
    })
}

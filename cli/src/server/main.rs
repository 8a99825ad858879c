use metaview::{Library, MetadataStore};
use rocket::{Build, Rocket, catchers, routes};

use crate::server::{
    ServerConfig, ServerState,
    cors::{Cors, preflight},
    error::default_catcher,
    files::{list_files, serve_file},
    info::{index, server_info},
    metadata::{get_metadata, put_metadata},
};

pub fn build_rocket(
    config: ServerConfig,
    library: Library,
) -> Rocket<Build> {
    let rocket_config = config.rocket_config();
    let state = ServerState::new(config, MetadataStore::new(library));

    rocket::custom(rocket_config)
        .manage(state)
        .attach(Cors)
        .mount(
            "/",
            routes![
                index,
                server_info,
                list_files,
                serve_file,
                get_metadata,
                put_metadata,
                preflight
            ],
        )
        .register("/", catchers![default_catcher])
}

pub async fn run_server(
    config: ServerConfig,
    library: Library,
) {
    if let Err(err) = build_rocket(config, library).launch().await {
        eprintln!("❌ Server stopped: {err}");
    }
}

pub mod cors;
pub mod error;
pub mod files;
pub mod info;
pub mod main;
pub mod metadata;
pub mod state;
pub use error::{ApiError, ErrorBody};
pub use main::{build_rocket, run_server};
pub use state::{ServerConfig, ServerState};

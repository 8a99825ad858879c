use std::time::Duration;

use metaview::{HeaderCodecError, LibraryError};
use rocket::{
    Request, catch,
    http::Status,
    response::{self, Responder},
    serde::json::Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Library(#[from] LibraryError),
    #[error("Invalid request body: {0}")]
    BadRequest(String),
    #[error("Operation timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::Library(err) => match err {
                LibraryError::AccessDenied(_) => Status::Forbidden,
                LibraryError::FileNotFound(_)
                | LibraryError::DirectoryNotFound(_) => Status::NotFound,
                LibraryError::UnsupportedFormat(_) => Status::BadRequest,
                LibraryError::Codec(HeaderCodecError::NoMetadata) => {
                    Status::NotFound
                },
                LibraryError::Codec(HeaderCodecError::Io(_)) => {
                    Status::InternalServerError
                },
                LibraryError::Codec(_) => Status::UnprocessableEntity,
                LibraryError::NotADirectory(_) | LibraryError::Io(_) => {
                    Status::InternalServerError
                },
            },
            ApiError::BadRequest(_) => Status::BadRequest,
            ApiError::Timeout(_) => Status::GatewayTimeout,
            ApiError::Internal(_) => Status::InternalServerError,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Library(err) if err.is_no_metadata() => {
                "No metadata found".to_string()
            },
            other => other.to_string(),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(
        self,
        request: &'r Request<'_>,
    ) -> response::Result<'static> {
        let status = self.status();
        if status.class().is_server_error() {
            log::error!("{} {}: {self}", request.method(), request.uri());
        } else {
            log::warn!("{} {}: {self}", request.method(), request.uri());
        }
        let body = ErrorBody {
            error: self.message(),
        };
        (status, Json(body)).respond_to(request)
    }
}

#[catch(default)]
pub fn default_catcher(
    status: Status,
    _request: &Request<'_>,
) -> (Status, Json<ErrorBody>) {
    let body = ErrorBody {
        error: status.reason_lossy().to_string(),
    };
    (status, Json(body))
}

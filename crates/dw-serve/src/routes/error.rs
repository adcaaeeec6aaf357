use crate::signature::SignatureError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dw_core::error::{ConfigError, GithubError, PayloadError};
use dw_core::WatcherError;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorEnvelope {
    pub code: &'static str,
    pub message: String,
    pub correlation_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum ServeError {
    #[error(transparent)]
    Watcher(#[from] WatcherError),
    #[error(transparent)]
    Signature(#[from] SignatureError),
}

impl From<PayloadError> for ServeError {
    fn from(value: PayloadError) -> Self {
        ServeError::Watcher(WatcherError::Payload(value))
    }
}

pub fn map_error(err: &ServeError, correlation_id: Option<String>) -> Response {
    let (status, code) = match err {
        ServeError::Signature(_) => (StatusCode::UNAUTHORIZED, "invalid_signature"),
        ServeError::Watcher(WatcherError::Payload(_)) => {
            (StatusCode::BAD_REQUEST, "invalid_payload")
        }
        ServeError::Watcher(WatcherError::Config(config)) => map_config_error(config),
        ServeError::Watcher(WatcherError::Github(github)) => map_github_error(github),
    };
    if status.is_server_error() {
        tracing::error!(%err, code, "webhook failed");
    } else {
        tracing::warn!(%err, code, "webhook rejected");
    }

    (
        status,
        Json(ErrorEnvelope {
            code,
            message: err.to_string(),
            correlation_id,
        }),
    )
        .into_response()
}

fn map_config_error(err: &ConfigError) -> (StatusCode, &'static str) {
    match err {
        ConfigError::InvalidRepoConfig { .. } | ConfigError::InvalidBranchPattern { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "invalid_repo_config")
        }
        ConfigError::InvalidSettings { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        }
    }
}

fn map_github_error(err: &GithubError) -> (StatusCode, &'static str) {
    match err {
        GithubError::Transport { .. } => (StatusCode::BAD_GATEWAY, "github_unreachable"),
        GithubError::Status { .. } | GithubError::Decode { .. } => {
            (StatusCode::BAD_GATEWAY, "github_error")
        }
    }
}

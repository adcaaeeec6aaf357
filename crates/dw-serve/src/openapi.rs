use utoipa::OpenApi;

use crate::routes::error::ErrorEnvelope;
use crate::routes::health::Health;
use crate::routes::webhook::Ignored;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use dw_core::scanner::AbortReason;
use dw_core::types::{
    Account, PullRequest, PullRequestAction, PullRequestEvent, PullRequestHead, Repository,
    ReviewComment,
};
use dw_core::{WatchReport, WatchStatus};

#[derive(OpenApi)]
#[openapi(
    info(title = "disable-watcher", description = "Flags new lint suppressions in pull requests"),
    paths(crate::routes::webhook::receive, crate::routes::health::health),
    components(schemas(
        WatchReport,
        WatchStatus,
        ReviewComment,
        AbortReason,
        PullRequestEvent,
        PullRequestAction,
        PullRequest,
        PullRequestHead,
        Repository,
        Account,
        Ignored,
        Health,
        ErrorEnvelope
    ))
)]
struct ApiDoc;

pub fn generate_spec() -> String {
    ApiDoc::openapi()
        .to_pretty_json()
        .unwrap_or_else(|_| "{}".to_string())
}

pub fn router() -> Router {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

use crate::middleware::correlation::CorrelationId;
use crate::routes::error::{map_error, ServeError};
use crate::signature::{self, SIGNATURE_HEADER};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Extension, Json, Router};
use dw_core::types::PullRequestEvent;
use serde::Serialize;
use utoipa::ToSchema;

pub const EVENT_HEADER: &str = "x-github-event";
pub const DELIVERY_HEADER: &str = "x-github-delivery";

#[derive(Debug, Serialize, ToSchema)]
pub struct Ignored {
    pub status: &'static str,
    pub event: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(receive))
        .with_state(state)
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn ignored(event: &str) -> Response {
    (
        StatusCode::ACCEPTED,
        Json(Ignored {
            status: "ignored",
            event: event.to_string(),
        }),
    )
        .into_response()
}

#[utoipa::path(
    post,
    path = "/api/webhook",
    request_body = PullRequestEvent,
    params(
        ("x-github-event" = String, Header, description = "Webhook event name"),
        ("x-hub-signature-256" = Option<String>, Header, description = "HMAC-SHA256 of the body"),
    ),
    responses(
        (status = 200, body = dw_core::WatchReport),
        (status = 202, body = Ignored),
        (status = 400, body = crate::routes::error::ErrorEnvelope),
        (status = 401, body = crate::routes::error::ErrorEnvelope),
        (status = 502, body = crate::routes::error::ErrorEnvelope)
    )
)]
pub(crate) async fn receive(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(secret) = state.webhook_secret.as_deref() {
        if let Err(err) = signature::verify(secret, header(&headers, SIGNATURE_HEADER), &body) {
            return map_error(&ServeError::from(err), Some(correlation.0));
        }
    }

    let event_name = header(&headers, EVENT_HEADER).unwrap_or_default();
    if event_name != "pull_request" {
        tracing::debug!(event = event_name, "ignoring event");
        return ignored(event_name);
    }

    let event = match PullRequestEvent::from_slice(&body) {
        Ok(event) => event,
        Err(err) => return map_error(&ServeError::from(err), Some(correlation.0)),
    };
    if !event.action.is_watched() {
        tracing::debug!(pull = %event.pull_ref(), action = ?event.action, "ignoring action");
        return ignored(event_name);
    }

    tracing::info!(pull = %event.pull_ref(), action = ?event.action, "handling pull request");
    match state.watcher.handle_event(&event).await {
        Ok(report) => Json(report).into_response(),
        Err(err) => map_error(&ServeError::from(err), Some(correlation.0)),
    }
}

#[cfg(test)]
mod tests {
    use crate::signature::sign;
    use crate::testing::{post_webhook, pull_request_body, state_with, StubGithub};
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use std::sync::Arc;

    const PATCH: &str = "@@ -1 +1,2 @@\n x\n+// eslint-disable-line";

    #[tokio::test]
    async fn opened_pull_request_gets_a_review() {
        let github = Arc::new(StubGithub::with_patch("a.js", PATCH));
        let state = state_with(github.clone(), None);
        let (status, body) =
            post_webhook(state, "pull_request", pull_request_body("opened"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "submitted");
        assert_eq!(body["comments"][0]["position"], 2);
        assert_eq!(github.review_count(), 1);
    }

    #[tokio::test]
    async fn other_events_and_actions_are_ignored() {
        let github = Arc::new(StubGithub::with_patch("a.js", PATCH));
        let state = state_with(github.clone(), None);

        let (status, body) =
            post_webhook(state.clone(), "issues", json!({ "action": "opened" }), None).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body, json!({ "status": "ignored", "event": "issues" }));

        let (status, _) =
            post_webhook(state, "pull_request", pull_request_body("closed"), None).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(github.review_count(), 0);
    }

    #[tokio::test]
    async fn signed_deliveries_are_verified() {
        let github = Arc::new(StubGithub::with_patch("a.js", PATCH));
        let state = state_with(github.clone(), Some("hush"));
        let body = pull_request_body("synchronize");
        let signature = sign("hush", body.to_string().as_bytes());

        let (status, _) =
            post_webhook(state.clone(), "pull_request", body.clone(), Some(&signature)).await;
        assert_eq!(status, StatusCode::OK);

        let forged = sign("wrong", body.to_string().as_bytes());
        let (status, envelope) =
            post_webhook(state.clone(), "pull_request", body.clone(), Some(&forged)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(envelope["code"], "invalid_signature");
        assert!(envelope["correlation_id"].as_str().unwrap().starts_with("corr_"));

        let (status, _) = post_webhook(state, "pull_request", body, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(github.review_count(), 1);
    }

    #[tokio::test]
    async fn malformed_payload_is_a_bad_request() {
        let github = Arc::new(StubGithub::with_patch("a.js", PATCH));
        let state = state_with(github, None);
        let (status, body) = post_webhook(
            state,
            "pull_request",
            json!({ "action": "opened", "number": 1 }),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_payload");
    }

    #[tokio::test]
    async fn github_failures_surface_as_bad_gateway() {
        let github = Arc::new(StubGithub::with_patch("a.js", PATCH).failing());
        let state = state_with(github, None);
        let (status, body): (StatusCode, Value) =
            post_webhook(state, "pull_request", pull_request_body("opened"), None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "github_error");
    }
}

use crate::AppState;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use dw_core::error::GithubError;
use dw_core::settings::Settings;
use dw_core::types::{
    ChangedFile, CreateReview, PriorComment, PullRequest, PullRequestHead, PullRequestRef,
};
use dw_core::GithubApi;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

/// Serves one changed file and no prior comments; counts submitted reviews.
pub struct StubGithub {
    file: ChangedFile,
    fail: bool,
    reviews: AtomicUsize,
}

impl StubGithub {
    pub fn with_patch(filename: &str, patch: &str) -> Self {
        Self {
            file: ChangedFile::new(filename, Some(patch)),
            fail: false,
            reviews: AtomicUsize::new(0),
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn review_count(&self) -> usize {
        self.reviews.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GithubApi for StubGithub {
    async fn list_review_comments(
        &self,
        _pull: &PullRequestRef,
        _page: u32,
        _per_page: u32,
    ) -> Result<Vec<PriorComment>, GithubError> {
        if self.fail {
            return Err(GithubError::Status {
                operation: "list review comments".to_string(),
                status: 500,
                body: String::new(),
            });
        }
        Ok(Vec::new())
    }

    async fn list_files(
        &self,
        _pull: &PullRequestRef,
        page: u32,
        _per_page: u32,
    ) -> Result<Vec<ChangedFile>, GithubError> {
        Ok(if page == 1 {
            vec![self.file.clone()]
        } else {
            Vec::new()
        })
    }

    async fn get_pull_request(&self, pull: &PullRequestRef) -> Result<PullRequest, GithubError> {
        Ok(PullRequest {
            number: pull.number,
            head: PullRequestHead {
                branch: "feature".to_string(),
                sha: "abc".to_string(),
            },
        })
    }

    async fn create_review(
        &self,
        _pull: &PullRequestRef,
        _review: &CreateReview,
    ) -> Result<(), GithubError> {
        self.reviews.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn read_file(
        &self,
        _owner: &str,
        _repo: &str,
        _path: &str,
    ) -> Result<Option<String>, GithubError> {
        Ok(None)
    }
}

pub fn state_with(github: Arc<StubGithub>, secret: Option<&str>) -> AppState {
    let settings = Settings {
        webhook_secret: secret.map(str::to_string),
        ..Settings::default()
    };
    AppState::new(github, &settings)
}

pub fn pull_request_body(action: &str) -> Value {
    json!({
        "action": action,
        "number": 3,
        "pull_request": { "number": 3, "head": { "ref": "feature", "sha": "abc" } },
        "repository": { "name": "widgets", "owner": { "login": "octo" } }
    })
}

pub async fn post_webhook(
    state: AppState,
    event: &str,
    body: Value,
    signature: Option<&str>,
) -> (StatusCode, Value) {
    let mut request = Request::post("/api/webhook")
        .header("content-type", "application/json")
        .header("x-github-event", event)
        .header("x-github-delivery", "72d3162e-cc78-11e3-81ab-4c9367dc0958");
    if let Some(signature) = signature {
        request = request.header("x-hub-signature-256", signature);
    }
    let request = request.body(Body::from(body.to_string())).unwrap();
    let response = crate::app(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

pub async fn get_json(state: AppState, uri: &str) -> (StatusCode, Value) {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    let response = crate::app(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

use async_trait::async_trait;
use dw_core::error::{ConfigError, GithubError};
use dw_core::settings::Settings;
use dw_core::types::{ChangedFile, CreateReview, PriorComment, PullRequest, PullRequestRef};
use dw_core::GithubApi;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

const API_VERSION: &str = "2022-11-28";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";
const MAX_ERROR_BODY: usize = 800;

/// GitHub REST client authenticated with a bearer token.
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
}

impl GithubClient {
    pub fn new(api_base: &str, token: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("disable-watcher"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));
        let auth = HeaderValue::from_str(&format!("Bearer {}", token.trim())).map_err(|err| {
            ConfigError::InvalidSettings {
                message: format!("invalid github token: {err}"),
            }
        })?;
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|err| ConfigError::InvalidSettings {
                message: format!("failed to build http client: {err}"),
            })?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        Self::new(
            &settings.github_api_url,
            settings.require_token()?,
            Duration::from_secs(settings.request_timeout_secs.max(1)),
        )
    }

    fn pull_url(&self, pull: &PullRequestRef, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}{}",
            self.api_base, pull.owner, pull.repo, pull.number, suffix
        )
    }

    async fn send(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<Response, GithubError> {
        let response = request
            .send()
            .await
            .map_err(|err| GithubError::Transport {
                operation: operation.to_string(),
                message: err.to_string(),
            })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(operation, status = status.as_u16(), "github api error");
        Err(GithubError::Status {
            operation: operation.to_string(),
            status: status.as_u16(),
            body: truncate(&body, MAX_ERROR_BODY),
        })
    }

    async fn get_json<T>(&self, operation: &str, request: RequestBuilder) -> Result<T, GithubError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(operation, request).await?;
        response.json::<T>().await.map_err(|err| GithubError::Decode {
            operation: operation.to_string(),
            message: err.to_string(),
        })
    }

    async fn get_page<T>(
        &self,
        operation: &str,
        url: String,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<T>, GithubError>
    where
        T: DeserializeOwned,
    {
        let request = self.http.get(url).query(&[
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
        ]);
        self.get_json(operation, request).await
    }
}

fn truncate(body: &str, max: usize) -> String {
    match body.char_indices().nth(max) {
        Some((index, _)) => format!("{}...", &body[..index]),
        None => body.to_string(),
    }
}

#[async_trait]
impl GithubApi for GithubClient {
    async fn list_review_comments(
        &self,
        pull: &PullRequestRef,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PriorComment>, GithubError> {
        let url = self.pull_url(pull, "/comments");
        self.get_page("list review comments", url, page, per_page)
            .await
    }

    async fn list_files(
        &self,
        pull: &PullRequestRef,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<ChangedFile>, GithubError> {
        let url = self.pull_url(pull, "/files");
        self.get_page("list pull request files", url, page, per_page)
            .await
    }

    async fn get_pull_request(&self, pull: &PullRequestRef) -> Result<PullRequest, GithubError> {
        let request = self.http.get(self.pull_url(pull, ""));
        self.get_json("get pull request", request).await
    }

    async fn create_review(
        &self,
        pull: &PullRequestRef,
        review: &CreateReview,
    ) -> Result<(), GithubError> {
        let request = self.http.post(self.pull_url(pull, "/reviews")).json(review);
        self.send("create review", request).await?;
        Ok(())
    }

    async fn read_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Option<String>, GithubError> {
        let operation = "read repository file";
        let request = self
            .http
            .get(format!(
                "{}/repos/{owner}/{repo}/contents/{}",
                self.api_base,
                path.trim_start_matches('/')
            ))
            .header(ACCEPT, RAW_MEDIA_TYPE);
        match self.send(operation, request).await {
            Ok(response) => response
                .text()
                .await
                .map(Some)
                .map_err(|err| GithubError::Decode {
                    operation: operation.to_string(),
                    message: err.to_string(),
                }),
            Err(GithubError::Status { status, .. })
                if status == StatusCode::NOT_FOUND.as_u16() =>
            {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

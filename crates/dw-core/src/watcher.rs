use crate::collector::collect_commented_positions;
use crate::config::{RepoConfig, REPO_CONFIG_PATH};
use crate::error::WatcherError;
use crate::github::GithubApi;
use crate::scanner::{scan_pull_request, AbortReason};
use crate::types::{
    CreateReview, PullRequestEvent, PullRequestHead, PullRequestRef, ReviewComment, ReviewEvent,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    Submit,
    DryRun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WatchStatus {
    Submitted,
    NothingToReport,
    SkippedBranch,
    DryRun,
}

/// What happened while handling one pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WatchReport {
    pub status: WatchStatus,
    pub comments: Vec<ReviewComment>,
    pub aborted: Option<AbortReason>,
}

impl WatchReport {
    fn skipped() -> Self {
        Self {
            status: WatchStatus::SkippedBranch,
            comments: Vec::new(),
            aborted: None,
        }
    }
}

pub struct Watcher<A: GithubApi> {
    api: A,
    bot_login: String,
    config_path: String,
}

impl<A: GithubApi> Watcher<A> {
    pub fn new(api: A, bot_login: impl Into<String>) -> Self {
        Self {
            api,
            bot_login: bot_login.into(),
            config_path: REPO_CONFIG_PATH.to_string(),
        }
    }

    pub fn with_config_path(mut self, path: impl Into<String>) -> Self {
        self.config_path = path.into();
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Reads the repository's config file, falling back to defaults when it is absent.
    pub async fn load_config(&self, pull: &PullRequestRef) -> Result<RepoConfig, WatcherError> {
        let content = self
            .api
            .read_file(&pull.owner, &pull.repo, &self.config_path)
            .await?;
        match content {
            Some(content) => Ok(RepoConfig::from_yaml(&content)?),
            None => Ok(RepoConfig::default()),
        }
    }

    /// Handles an `opened` or `synchronize` delivery end to end.
    pub async fn handle_event(
        &self,
        event: &PullRequestEvent,
    ) -> Result<WatchReport, WatcherError> {
        let pull = event.pull_ref();
        let config = self.load_config(&pull).await?;
        self.review(&pull, &event.pull_request.head, &config, SubmitMode::Submit)
            .await
    }

    pub async fn review(
        &self,
        pull: &PullRequestRef,
        head: &PullRequestHead,
        config: &RepoConfig,
        mode: SubmitMode,
    ) -> Result<WatchReport, WatcherError> {
        if let Some(regex) = config.skip_branch_regex()? {
            if regex.is_match(&head.branch) {
                warn!(
                    pull = %pull,
                    branch = %head.branch,
                    pattern = %regex,
                    "skipping branch"
                );
                return Ok(WatchReport::skipped());
            }
        }

        let commented = collect_commented_positions(&self.api, pull, &self.bot_login).await?;
        let outcome = scan_pull_request(&self.api, pull, config, &commented).await?;
        if let Some(reason) = &outcome.aborted {
            info!(pull = %pull, ?reason, "scan stopped early");
        }

        let status = if outcome.comments.is_empty() {
            WatchStatus::NothingToReport
        } else if mode == SubmitMode::DryRun {
            WatchStatus::DryRun
        } else {
            let review = CreateReview {
                commit_id: head.sha.clone(),
                event: ReviewEvent::RequestChanges,
                comments: outcome.comments.clone(),
            };
            self.api.create_review(pull, &review).await?;
            info!(
                pull = %pull,
                commit = %head.sha,
                comments = review.comments.len(),
                "requested changes"
            );
            WatchStatus::Submitted
        };

        Ok(WatchReport {
            status,
            comments: outcome.comments,
            aborted: outcome.aborted,
        })
    }
}

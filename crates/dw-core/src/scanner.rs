use crate::collector::CommentedPositions;
use crate::config::RepoConfig;
use crate::error::GithubError;
use crate::github::GithubApi;
use crate::pagination::{pages, PER_PAGE};
use crate::types::{ChangedFile, PullRequestRef, ReviewComment};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use std::pin::pin;
use utoipa::ToSchema;

/// File suffixes whose diffs are scanned. Everything else is skipped.
pub const SCANNED_EXTENSIONS: [&str; 2] = [".js", ".php"];

/// A lint-suppression directive the scanner looks for on added lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    Eslint,
    Phpcs,
    Jshint,
}

impl Marker {
    /// Checked in this order for every line.
    pub const ALL: [Marker; 3] = [Marker::Eslint, Marker::Phpcs, Marker::Jshint];

    pub fn needle(self) -> &'static str {
        match self {
            Marker::Eslint => "eslint-disable",
            Marker::Phpcs => "phpcs:",
            Marker::Jshint => "jshint ignore",
        }
    }

    pub fn matches(self, line: &str) -> bool {
        line.starts_with('+') && line.contains(self.needle())
    }
}

/// Why a scan stopped before reaching the last changed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum AbortReason {
    LimitExceeded { collected: usize, limit: usize },
    MissingPatch { path: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Continue,
    Abort(AbortReason),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    pub comments: Vec<ReviewComment>,
    pub aborted: Option<AbortReason>,
}

pub fn is_scanned_file(filename: &str) -> bool {
    SCANNED_EXTENSIONS
        .iter()
        .any(|extension| filename.ends_with(extension))
}

/// Accumulates review comments across the changed files of one pull request.
pub struct Scanner<'a> {
    config: &'a RepoConfig,
    commented: &'a CommentedPositions,
    comments: Vec<ReviewComment>,
}

impl<'a> Scanner<'a> {
    pub fn new(config: &'a RepoConfig, commented: &'a CommentedPositions) -> Self {
        Self {
            config,
            commented,
            comments: Vec::new(),
        }
    }

    /// True once enough comments are collected that no further page should be fetched.
    pub fn is_saturated(&self) -> bool {
        self.comments.len() >= self.config.comment_limit
    }

    pub fn scan_page(&mut self, files: &[ChangedFile]) -> FileOutcome {
        for file in files {
            if let FileOutcome::Abort(reason) = self.scan_file(file) {
                return FileOutcome::Abort(reason);
            }
        }
        FileOutcome::Continue
    }

    pub fn scan_file(&mut self, file: &ChangedFile) -> FileOutcome {
        if !is_scanned_file(&file.filename) {
            return FileOutcome::Continue;
        }
        if self.comments.len() > self.config.comment_limit {
            return FileOutcome::Abort(AbortReason::LimitExceeded {
                collected: self.comments.len(),
                limit: self.config.comment_limit,
            });
        }
        let Some(patch) = file.usable_patch() else {
            return FileOutcome::Abort(AbortReason::MissingPatch {
                path: file.filename.clone(),
            });
        };
        self.scan_patch(&file.filename, patch);
        FileOutcome::Continue
    }

    /// Walks one file's unified diff. The position advances once per line of any kind,
    /// hunk headers included, so it addresses lines the way inline review comments do.
    fn scan_patch(&mut self, path: &str, patch: &str) {
        for (position, line) in (0u64..).zip(patch.split('\n')) {
            for marker in Marker::ALL {
                if !marker.matches(line) {
                    continue;
                }
                if self
                    .commented
                    .contains(self.config.dedup_scope, path, position)
                {
                    continue;
                }
                self.comments.push(ReviewComment {
                    path: path.to_string(),
                    position,
                    body: self.config.message_for(marker).to_string(),
                });
            }
        }
    }

    pub fn finish(self, aborted: Option<AbortReason>) -> ScanOutcome {
        ScanOutcome {
            comments: self.comments,
            aborted,
        }
    }
}

/// Pages through the pull request's changed files and builds the comments to post.
pub async fn scan_pull_request<A>(
    api: &A,
    pull: &PullRequestRef,
    config: &RepoConfig,
    commented: &CommentedPositions,
) -> Result<ScanOutcome, GithubError>
where
    A: GithubApi + ?Sized,
{
    let mut scanner = Scanner::new(config, commented);
    let mut file_pages = pin!(pages(move |page| api.list_files(pull, page, PER_PAGE)));
    while let Some(files) = file_pages.try_next().await? {
        if let FileOutcome::Abort(reason) = scanner.scan_page(&files) {
            tracing::debug!(pull = %pull, ?reason, "scan aborted");
            return Ok(scanner.finish(Some(reason)));
        }
        if scanner.is_saturated() {
            break;
        }
    }
    Ok(scanner.finish(None))
}

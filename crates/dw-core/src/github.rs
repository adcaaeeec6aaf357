use crate::error::GithubError;
use crate::types::{ChangedFile, CreateReview, PriorComment, PullRequest, PullRequestRef};
use async_trait::async_trait;
use std::sync::Arc;

/// The slice of the hosting platform's REST API the watcher talks to.
///
/// Page numbers start at 1.
#[async_trait]
pub trait GithubApi: Send + Sync {
    async fn list_review_comments(
        &self,
        pull: &PullRequestRef,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PriorComment>, GithubError>;

    async fn list_files(
        &self,
        pull: &PullRequestRef,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<ChangedFile>, GithubError>;

    async fn get_pull_request(&self, pull: &PullRequestRef) -> Result<PullRequest, GithubError>;

    async fn create_review(
        &self,
        pull: &PullRequestRef,
        review: &CreateReview,
    ) -> Result<(), GithubError>;

    /// Raw contents of a file on the default branch, `None` if it does not exist.
    async fn read_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Option<String>, GithubError>;
}

#[async_trait]
impl<T: GithubApi + ?Sized> GithubApi for Arc<T> {
    async fn list_review_comments(
        &self,
        pull: &PullRequestRef,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PriorComment>, GithubError> {
        (**self).list_review_comments(pull, page, per_page).await
    }

    async fn list_files(
        &self,
        pull: &PullRequestRef,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<ChangedFile>, GithubError> {
        (**self).list_files(pull, page, per_page).await
    }

    async fn get_pull_request(&self, pull: &PullRequestRef) -> Result<PullRequest, GithubError> {
        (**self).get_pull_request(pull).await
    }

    async fn create_review(
        &self,
        pull: &PullRequestRef,
        review: &CreateReview,
    ) -> Result<(), GithubError> {
        (**self).create_review(pull, review).await
    }

    async fn read_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Option<String>, GithubError> {
        (**self).read_file(owner, repo, path).await
    }
}

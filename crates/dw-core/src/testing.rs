use crate::error::GithubError;
use crate::github::GithubApi;
use crate::types::{
    Account, ChangedFile, CreateReview, PriorComment, PullRequest, PullRequestHead,
    PullRequestRef,
};
use async_trait::async_trait;
use std::sync::Mutex;

pub fn prior(login: &str, path: &str, position: Option<u64>) -> PriorComment {
    PriorComment {
        user: Some(Account {
            login: login.to_string(),
        }),
        path: Some(path.to_string()),
        position,
    }
}

/// In-memory GitHub that serves fixed comments and files and records every call.
#[derive(Default)]
pub struct FakeGithub {
    comments: Vec<PriorComment>,
    files: Vec<ChangedFile>,
    config_file: Option<String>,
    fail_reviews: bool,
    calls: Mutex<Vec<String>>,
    comment_pages: Mutex<Vec<u32>>,
    file_pages: Mutex<Vec<u32>>,
    reviews: Mutex<Vec<(PullRequestRef, CreateReview)>>,
}

impl FakeGithub {
    pub fn with_comments(mut self, comments: Vec<PriorComment>) -> Self {
        self.comments = comments;
        self
    }

    pub fn with_files(mut self, files: Vec<ChangedFile>) -> Self {
        self.files = files;
        self
    }

    pub fn with_config(mut self, content: &str) -> Self {
        self.config_file = Some(content.to_string());
        self
    }

    pub fn failing_reviews(mut self) -> Self {
        self.fail_reviews = true;
        self
    }

    pub fn pull(&self) -> PullRequestRef {
        PullRequestRef::new("octo", "widgets", 7)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn comment_pages_requested(&self) -> Vec<u32> {
        self.comment_pages.lock().unwrap().clone()
    }

    pub fn file_pages_requested(&self) -> Vec<u32> {
        self.file_pages.lock().unwrap().clone()
    }

    pub fn reviews(&self) -> Vec<(PullRequestRef, CreateReview)> {
        self.reviews.lock().unwrap().clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

fn page_of<T: Clone>(items: &[T], page: u32, per_page: u32) -> Vec<T> {
    let start = (page.saturating_sub(1) * per_page) as usize;
    items
        .iter()
        .skip(start)
        .take(per_page as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl GithubApi for FakeGithub {
    async fn list_review_comments(
        &self,
        _pull: &PullRequestRef,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PriorComment>, GithubError> {
        self.record("list_review_comments");
        self.comment_pages.lock().unwrap().push(page);
        Ok(page_of(&self.comments, page, per_page))
    }

    async fn list_files(
        &self,
        _pull: &PullRequestRef,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<ChangedFile>, GithubError> {
        self.record("list_files");
        self.file_pages.lock().unwrap().push(page);
        Ok(page_of(&self.files, page, per_page))
    }

    async fn get_pull_request(&self, pull: &PullRequestRef) -> Result<PullRequest, GithubError> {
        self.record("get_pull_request");
        Ok(PullRequest {
            number: pull.number,
            head: PullRequestHead {
                branch: "feature/x".to_string(),
                sha: "abc123".to_string(),
            },
        })
    }

    async fn create_review(
        &self,
        pull: &PullRequestRef,
        review: &CreateReview,
    ) -> Result<(), GithubError> {
        self.record("create_review");
        if self.fail_reviews {
            return Err(GithubError::Status {
                operation: "create review".to_string(),
                status: 422,
                body: "position is invalid".to_string(),
            });
        }
        self.reviews
            .lock()
            .unwrap()
            .push((pull.clone(), review.clone()));
        Ok(())
    }

    async fn read_file(
        &self,
        _owner: &str,
        _repo: &str,
        _path: &str,
    ) -> Result<Option<String>, GithubError> {
        self.record("read_file");
        Ok(self.config_file.clone())
    }
}

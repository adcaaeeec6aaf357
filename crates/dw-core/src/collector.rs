use crate::config::DedupScope;
use crate::error::GithubError;
use crate::github::GithubApi;
use crate::pagination::{pages, PER_PAGE};
use crate::types::{PriorComment, PullRequestRef};
use futures::TryStreamExt;
use std::collections::HashSet;
use std::pin::pin;

/// Diff positions this bot has already commented on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentedPositions {
    positions: HashSet<u64>,
    by_file: HashSet<(String, u64)>,
}

impl CommentedPositions {
    pub fn insert(&mut self, path: Option<String>, position: u64) {
        self.positions.insert(position);
        if let Some(path) = path {
            self.by_file.insert((path, position));
        }
    }

    pub fn contains(&self, scope: DedupScope, path: &str, position: u64) -> bool {
        match scope {
            DedupScope::Global => self.positions.contains(&position),
            DedupScope::File => self.by_file.contains(&(path.to_string(), position)),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Adds the positions of every comment authored by `bot_login`.
    pub fn extend_from_page(&mut self, page: Vec<PriorComment>, bot_login: &str) {
        for comment in page {
            let by_bot = comment
                .user
                .as_ref()
                .is_some_and(|user| user.login == bot_login);
            if !by_bot {
                continue;
            }
            if let Some(position) = comment.position {
                self.insert(comment.path, position);
            }
        }
    }
}

pub async fn collect_commented_positions<A>(
    api: &A,
    pull: &PullRequestRef,
    bot_login: &str,
) -> Result<CommentedPositions, GithubError>
where
    A: GithubApi + ?Sized,
{
    let mut commented = CommentedPositions::default();
    let mut comment_pages = pin!(pages(move |page| {
        api.list_review_comments(pull, page, PER_PAGE)
    }));
    while let Some(page) = comment_pages.try_next().await? {
        commented.extend_from_page(page, bot_login);
    }
    tracing::debug!(pull = %pull, positions = commented.len(), "collected prior bot comments");
    Ok(commented)
}

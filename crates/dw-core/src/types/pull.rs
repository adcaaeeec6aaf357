use crate::error::PayloadError;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Coordinates of a pull request on the hosting platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct PullRequestRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl PullRequestRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }

    /// Parses an `owner/repo` slug.
    pub fn parse(slug: &str, number: u64) -> Result<Self, PayloadError> {
        let invalid = || PayloadError::InvalidSlug {
            value: slug.to_string(),
        };
        let (owner, repo) = slug.trim().split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return Err(invalid());
        }
        Ok(Self::new(owner, repo, number))
    }
}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Account {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Repository {
    pub name: String,
    pub owner: Account,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PullRequestHead {
    #[serde(rename = "ref")]
    pub branch: String,
    pub sha: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PullRequest {
    pub number: u64,
    pub head: PullRequestHead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestAction {
    Opened,
    Synchronize,
    #[serde(other)]
    Other,
}

impl PullRequestAction {
    pub fn is_watched(self) -> bool {
        matches!(self, Self::Opened | Self::Synchronize)
    }
}

/// Body of a `pull_request` webhook delivery, reduced to the fields the watcher reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PullRequestEvent {
    pub action: PullRequestAction,
    pub number: u64,
    pub pull_request: PullRequest,
    pub repository: Repository,
}

impl PullRequestEvent {
    pub fn from_slice(body: &[u8]) -> Result<Self, PayloadError> {
        serde_json::from_slice(body).map_err(|err| PayloadError::Malformed {
            message: err.to_string(),
        })
    }

    pub fn pull_ref(&self) -> PullRequestRef {
        PullRequestRef::new(
            self.repository.owner.login.clone(),
            self.repository.name.clone(),
            self.number,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_owner_repo_slug() {
        let pull = PullRequestRef::parse("octo/widgets", 7).unwrap();
        assert_eq!(pull, PullRequestRef::new("octo", "widgets", 7));
        assert_eq!(pull.to_string(), "octo/widgets#7");
    }

    #[test]
    fn rejects_malformed_slugs() {
        for slug in ["octo", "/widgets", "octo/", "a/b/c"] {
            assert!(matches!(
                PullRequestRef::parse(slug, 1),
                Err(PayloadError::InvalidSlug { .. })
            ));
        }
    }

    #[test]
    fn decodes_webhook_payload() {
        let body = serde_json::json!({
            "action": "synchronize",
            "number": 42,
            "pull_request": {
                "number": 42,
                "title": "ignored",
                "head": { "ref": "feature/x", "sha": "abc123" }
            },
            "repository": { "name": "widgets", "owner": { "login": "octo" } },
            "sender": { "login": "someone" }
        });
        let event = PullRequestEvent::from_slice(body.to_string().as_bytes()).unwrap();
        assert_eq!(event.action, PullRequestAction::Synchronize);
        assert!(event.action.is_watched());
        assert_eq!(event.pull_request.head.branch, "feature/x");
        assert_eq!(event.pull_ref(), PullRequestRef::new("octo", "widgets", 42));
    }

    #[test]
    fn unknown_actions_are_not_watched() {
        let action: PullRequestAction = serde_json::from_str("\"labeled\"").unwrap();
        assert_eq!(action, PullRequestAction::Other);
        assert!(!action.is_watched());
    }

    #[test]
    fn missing_head_is_malformed() {
        let body = br#"{"action":"opened","number":1,"pull_request":{"number":1},"repository":{"name":"r","owner":{"login":"o"}}}"#;
        assert!(matches!(
            PullRequestEvent::from_slice(body),
            Err(PayloadError::Malformed { .. })
        ));
    }
}

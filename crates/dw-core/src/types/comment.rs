use crate::types::pull::Account;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An inline review comment to be attached to a submitted review.
///
/// `position` is the offset into the file's unified diff, not a source line number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReviewComment {
    pub path: String,
    pub position: u64,
    pub body: String,
}

/// A review comment already present on the pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PriorComment {
    /// `null` when the author's account no longer exists.
    #[serde(default)]
    pub user: Option<Account>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub position: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewEvent {
    RequestChanges,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreateReview {
    pub commit_id: String,
    pub event: ReviewEvent,
    pub comments: Vec<ReviewComment>,
}

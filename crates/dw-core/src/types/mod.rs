pub mod comment;
pub mod file;
pub mod pull;

pub use comment::{CreateReview, PriorComment, ReviewComment, ReviewEvent};
pub use file::ChangedFile;
pub use pull::{
    Account, PullRequest, PullRequestAction, PullRequestEvent, PullRequestHead, PullRequestRef,
    Repository,
};

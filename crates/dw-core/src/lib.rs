pub mod collector;
pub mod config;
pub mod error;
pub mod github;
pub mod pagination;
pub mod scanner;
pub mod settings;
pub mod watcher;

pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::error::WatcherError;
pub use crate::github::GithubApi;
pub use crate::watcher::{SubmitMode, WatchReport, WatchStatus, Watcher};

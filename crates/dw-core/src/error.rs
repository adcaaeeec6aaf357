use thiserror::Error;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("{operation} request failed: {message}")]
    Transport { operation: String, message: String },
    #[error("{operation} returned status {status}: {body}")]
    Status {
        operation: String,
        status: u16,
        body: String,
    },
    #[error("failed to decode {operation} response: {message}")]
    Decode { operation: String, message: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid repository config: {message}")]
    InvalidRepoConfig { message: String },
    #[error("invalid skipBranchMatching pattern {pattern:?}: {message}")]
    InvalidBranchPattern { pattern: String, message: String },
    #[error("invalid settings: {message}")]
    InvalidSettings { message: String },
}

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("malformed payload: {message}")]
    Malformed { message: String },
    #[error("invalid repository slug: {value}")]
    InvalidSlug { value: String },
}

#[derive(Debug, Error)]
pub enum WatcherError {
    #[error(transparent)]
    Github(#[from] GithubError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Payload(#[from] PayloadError),
}

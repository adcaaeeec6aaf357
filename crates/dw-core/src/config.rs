use crate::error::ConfigError;
use crate::scanner::Marker;
use regex::Regex;
use serde::Deserialize;

/// Location of the per-repository config file, relative to the repository root.
pub const REPO_CONFIG_PATH: &str = ".github/eslint-disable-bot.yml";

pub const DEFAULT_COMMENT_LIMIT: usize = 10;
pub const DEFAULT_ESLINT_MESSAGE: &str = "Please don't disable eslint rules :pray:";
pub const DEFAULT_PHPCS_MESSAGE: &str = "Please don't disable or ignore phpcs rules :pray:";
pub const DEFAULT_JSHINT_MESSAGE: &str = "Please don't disable jshint rules :pray:";

/// How prior bot comments mask new ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupScope {
    /// A prior comment at position N masks position N in every file.
    #[default]
    Global,
    /// A prior comment masks only the same position in the same file.
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawRepoConfig")]
pub struct RepoConfig {
    pub comment_limit: usize,
    pub eslint_comment_message: String,
    pub phpcs_comment_message: String,
    pub jshint_comment_message: String,
    /// Branch names to leave alone, searched anywhere in the name. Uses the `regex`
    /// crate syntax: lookaround and backreferences are rejected as an invalid pattern.
    pub skip_branch_matching: Option<String>,
    pub dedup_scope: DedupScope,
}

/// The file as written. `jshintCommentMessage` wins over the older
/// `jsHintCommentMessage` spelling when both are present.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawRepoConfig {
    comment_limit: Option<usize>,
    eslint_comment_message: Option<String>,
    phpcs_comment_message: Option<String>,
    jshint_comment_message: Option<String>,
    #[serde(rename = "jsHintCommentMessage")]
    js_hint_comment_message: Option<String>,
    skip_branch_matching: Option<String>,
    dedup_scope: Option<DedupScope>,
}

impl From<RawRepoConfig> for RepoConfig {
    fn from(raw: RawRepoConfig) -> Self {
        let defaults = RepoConfig::default();
        Self {
            comment_limit: raw.comment_limit.unwrap_or(defaults.comment_limit),
            eslint_comment_message: raw
                .eslint_comment_message
                .unwrap_or(defaults.eslint_comment_message),
            phpcs_comment_message: raw
                .phpcs_comment_message
                .unwrap_or(defaults.phpcs_comment_message),
            jshint_comment_message: raw
                .jshint_comment_message
                .or(raw.js_hint_comment_message)
                .unwrap_or(defaults.jshint_comment_message),
            skip_branch_matching: raw.skip_branch_matching,
            dedup_scope: raw.dedup_scope.unwrap_or_default(),
        }
    }
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            comment_limit: DEFAULT_COMMENT_LIMIT,
            eslint_comment_message: DEFAULT_ESLINT_MESSAGE.to_string(),
            phpcs_comment_message: DEFAULT_PHPCS_MESSAGE.to_string(),
            jshint_comment_message: DEFAULT_JSHINT_MESSAGE.to_string(),
            skip_branch_matching: None,
            dedup_scope: DedupScope::Global,
        }
    }
}

impl RepoConfig {
    /// Parses the YAML config file. Keys left out keep their defaults; an empty file
    /// yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let parsed: Option<Self> =
            serde_yaml::from_str(content).map_err(|err| ConfigError::InvalidRepoConfig {
                message: err.to_string(),
            })?;
        Ok(parsed.unwrap_or_default())
    }

    pub fn message_for(&self, marker: Marker) -> &str {
        match marker {
            Marker::Eslint => &self.eslint_comment_message,
            Marker::Phpcs => &self.phpcs_comment_message,
            Marker::Jshint => &self.jshint_comment_message,
        }
    }

    /// Compiled `skipBranchMatching`, or `None` when unset or blank.
    pub fn skip_branch_regex(&self) -> Result<Option<Regex>, ConfigError> {
        let Some(pattern) = self
            .skip_branch_matching
            .as_deref()
            .filter(|pattern| !pattern.is_empty())
        else {
            return Ok(None);
        };
        Regex::new(pattern)
            .map(Some)
            .map_err(|err| ConfigError::InvalidBranchPattern {
                pattern: pattern.to_string(),
                message: err.to_string(),
            })
    }
}

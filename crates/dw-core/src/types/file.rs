use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChangedFile {
    pub filename: String,
    /// Absent for binary files, pure renames, and diffs too large to inline.
    #[serde(default)]
    pub patch: Option<String>,
}

impl ChangedFile {
    pub fn new(filename: impl Into<String>, patch: Option<&str>) -> Self {
        Self {
            filename: filename.into(),
            patch: patch.map(str::to_string),
        }
    }

    /// Patch text, treating an empty patch the same as a missing one.
    pub fn usable_patch(&self) -> Option<&str> {
        self.patch.as_deref().filter(|patch| !patch.is_empty())
    }
}

//! Collaborators the changelog pipeline talks to.

use crate::resolver::{ChangeSet, ChangeSetKind};
use crate::types::{FileChange, Result, VersionTag};
use std::path::Path;

/// Read-only view of the version history
pub trait HistorySource {
    /// Most recent version reachable from the current checkout
    fn latest_version(&self) -> Result<Option<VersionTag>>;
    /// Every known version, oldest first
    fn all_versions(&self) -> Result<Vec<VersionTag>>;
    /// Files changed between two revisions; `from = None` lists every file of `to` as added
    fn changed_files(&self, from: Option<&str>, to: &str) -> Result<Vec<FileChange>>;
    /// One `<short-id> <summary>` line per commit in `from..to`
    fn commit_log(&self, from: Option<&str>, to: &str) -> Result<String>;
    /// Changes recorded in the index but not committed yet
    fn staged_changes(&self) -> Result<Vec<FileChange>>;
    /// Date of a version as `YYYY-MM-DD`
    fn date_of(&self, version: &str) -> Result<String>;
}

/// Input handed to an [`EntryGenerator`] for one version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRequest {
    pub version: VersionTag,
    pub date: String,
    pub commit_log: String,
    pub changed_files: Vec<FileChange>,
    pub staged_changes: Vec<FileChange>,
    pub kind: ChangeSetKind,
}

impl EntryRequest {
    pub fn new(version: impl Into<VersionTag>, date: impl Into<String>, change_set: ChangeSet, kind: ChangeSetKind) -> Self {
        Self {
            version: version.into(),
            date: date.into(),
            commit_log: change_set.commit_log,
            changed_files: change_set.changed_files,
            staged_changes: change_set.staged_changes,
            kind,
        }
    }
}

/// Produces a changelog entry starting with a `## [<version>]` heading
pub trait EntryGenerator {
    fn generate(&self, request: &EntryRequest) -> Result<String>;
}

/// Where the changelog document lives
pub trait ChangelogStore {
    /// Current content, `None` when the document does not exist yet
    fn read(&self, path: &Path) -> Result<Option<String>>;
    fn write(&self, path: &Path, content: &str) -> Result<()>;
}

//! In-memory collaborators for exercising the update pipeline without git,
//! an AI backend or the filesystem.

use crate::error::ChangelogError;
use crate::ports::{ChangelogStore, EntryGenerator, EntryRequest, HistorySource};
use crate::types::{FileChange, Result, VersionTag};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

fn range_key(from: Option<&str>, to: &str) -> String {
    format!("{}..{}", from.unwrap_or(""), to)
}

/// Mock history keyed by `from..to` ranges
#[derive(Debug, Clone, Default)]
pub struct MockHistory {
    pub versions: Vec<VersionTag>,
    pub latest: Option<VersionTag>,
    pub changed_files: HashMap<String, Vec<FileChange>>,
    pub commit_logs: HashMap<String, String>,
    pub staged: Vec<FileChange>,
    pub dates: HashMap<String, String>,
    pub failing_ranges: HashSet<String>,
    pub fail_staged: bool,
}

impl MockHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Versions oldest first; the last one becomes the latest
    pub fn with_versions(mut self, versions: &[&str]) -> Self {
        self.versions = versions.iter().map(|v| v.to_string()).collect();
        self.latest = self.versions.last().cloned();
        self
    }

    pub fn with_latest(mut self, latest: Option<&str>) -> Self {
        self.latest = latest.map(str::to_string);
        self
    }

    pub fn with_range(mut self, from: Option<&str>, to: &str, files: Vec<FileChange>, log: &str) -> Self {
        let key = range_key(from, to);
        self.changed_files.insert(key.clone(), files);
        self.commit_logs.insert(key, log.to_string());
        self
    }

    pub fn with_failing_range(mut self, from: Option<&str>, to: &str) -> Self {
        self.failing_ranges.insert(range_key(from, to));
        self
    }

    pub fn with_staged(mut self, staged: Vec<FileChange>) -> Self {
        self.staged = staged;
        self
    }

    pub fn with_failing_staged(mut self) -> Self {
        self.fail_staged = true;
        self
    }

    pub fn with_date(mut self, version: &str, date: &str) -> Self {
        self.dates.insert(version.to_string(), date.to_string());
        self
    }

    fn check_range(&self, key: &str) -> Result<()> {
        if self.failing_ranges.contains(key) {
            return Err(ChangelogError::Git(format!("Mock failure for {key}")));
        }
        Ok(())
    }
}

impl HistorySource for MockHistory {
    fn latest_version(&self) -> Result<Option<VersionTag>> {
        Ok(self.latest.clone())
    }

    fn all_versions(&self) -> Result<Vec<VersionTag>> {
        Ok(self.versions.clone())
    }

    fn changed_files(&self, from: Option<&str>, to: &str) -> Result<Vec<FileChange>> {
        let key = range_key(from, to);
        self.check_range(&key)?;
        Ok(self.changed_files.get(&key).cloned().unwrap_or_default())
    }

    fn commit_log(&self, from: Option<&str>, to: &str) -> Result<String> {
        let key = range_key(from, to);
        self.check_range(&key)?;
        Ok(self.commit_logs.get(&key).cloned().unwrap_or_default())
    }

    fn staged_changes(&self) -> Result<Vec<FileChange>> {
        if self.fail_staged {
            return Err(ChangelogError::Git("Mock staged failure".to_string()));
        }
        Ok(self.staged.clone())
    }

    fn date_of(&self, version: &str) -> Result<String> {
        self.dates
            .get(version)
            .cloned()
            .ok_or_else(|| ChangelogError::Git(format!("No date found for tag {version}")))
    }
}

/// Mock generator that answers with a canned entry per version
#[derive(Debug, Default)]
pub struct MockGenerator {
    pub responses: HashMap<String, String>,
    pub failing: HashSet<String>,
    pub requests: RefCell<Vec<EntryRequest>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, version: &str, entry: &str) -> Self {
        self.responses.insert(version.to_string(), entry.to_string());
        self
    }

    pub fn with_failure(mut self, version: &str) -> Self {
        self.failing.insert(version.to_string());
        self
    }

    /// Versions requested so far, in call order
    pub fn requested_versions(&self) -> Vec<VersionTag> {
        self.requests
            .borrow()
            .iter()
            .map(|request| request.version.clone())
            .collect()
    }

    pub fn default_entry(request: &EntryRequest) -> String {
        format!(
            "## [{}] - {}\n\n### Added\n\n- Changes for {}",
            request.version, request.date, request.version
        )
    }
}

impl EntryGenerator for MockGenerator {
    fn generate(&self, request: &EntryRequest) -> Result<String> {
        self.requests.borrow_mut().push(request.clone());

        if self.failing.contains(&request.version) {
            return Err(ChangelogError::Generation(format!(
                "Mock failure for {}",
                request.version
            )));
        }

        Ok(self
            .responses
            .get(&request.version)
            .cloned()
            .unwrap_or_else(|| Self::default_entry(request)))
    }
}

/// Store that keeps documents in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub documents: RefCell<HashMap<PathBuf, String>>,
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.documents.borrow_mut().insert(path.into(), content.to_string());
        self
    }

    pub fn with_failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn content(&self, path: impl AsRef<Path>) -> Option<String> {
        self.documents.borrow().get(path.as_ref()).cloned()
    }
}

impl ChangelogStore for MemoryStore {
    fn read(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.documents.borrow().get(path).cloned())
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        if self.fail_writes {
            return Err(ChangelogError::ReadError(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only store",
            )));
        }
        self.documents
            .borrow_mut()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}

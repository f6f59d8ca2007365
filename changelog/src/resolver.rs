use crate::config::ChangelogConfig;
use crate::types::FileChange;

/// Which generation request shape a version's changes call for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSetKind {
    Initial,
    Incremental,
}

impl ChangeSetKind {
    #[must_use]
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::Initial)
    }
}

/// Everything the history reports for one version
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub changed_files: Vec<FileChange>,
    pub commit_log: String,
    pub staged_changes: Vec<FileChange>,
}

impl ChangeSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changed_files.is_empty()
            && self.commit_log.trim().is_empty()
            && self.staged_changes.is_empty()
    }

    fn has_committed_changes(&self) -> bool {
        !self.changed_files.is_empty() || !self.commit_log.trim().is_empty()
    }
}

/// Best-effort guess at whether a change set is a first release.
///
/// A large set made only of added files looks like an initial import; any
/// modification, deletion or rename makes it incremental.
#[derive(Debug, Clone, Copy)]
pub struct ChangeSetResolver {
    initial_threshold: usize,
    staged_initial_threshold: usize,
}

impl Default for ChangeSetResolver {
    fn default() -> Self {
        Self::new(&ChangelogConfig::default())
    }
}

impl ChangeSetResolver {
    pub fn new(config: &ChangelogConfig) -> Self {
        Self {
            initial_threshold: config.initial_threshold,
            staged_initial_threshold: config.staged_initial_threshold,
        }
    }

    #[must_use]
    pub fn classify(&self, change_set: &ChangeSet) -> ChangeSetKind {
        if all_added_over(&change_set.changed_files, self.initial_threshold) {
            return ChangeSetKind::Initial;
        }

        if !change_set.has_committed_changes()
            && all_added_over(&change_set.staged_changes, self.staged_initial_threshold)
        {
            return ChangeSetKind::Initial;
        }

        ChangeSetKind::Incremental
    }
}

fn all_added_over(changes: &[FileChange], threshold: usize) -> bool {
    !changes.is_empty() && changes.iter().all(FileChange::is_added) && changes.len() > threshold
}

/// The version released right before `version`, if any
#[must_use]
pub fn predecessor<'a, S: AsRef<str>>(all_versions: &'a [S], version: &str) -> Option<&'a str> {
    let idx = all_versions
        .iter()
        .position(|candidate| candidate.as_ref() == version)?;
    idx.checked_sub(1)
        .map(|previous| all_versions[previous].as_ref())
}

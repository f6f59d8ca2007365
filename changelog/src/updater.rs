use crate::config::ChangelogConfig;
use crate::error::ChangelogError;
use crate::gap::missing_versions;
use crate::merger::{ChangelogMerger, MergeOutcome};
use crate::ports::{ChangelogStore, EntryGenerator, EntryRequest, HistorySource};
use crate::resolver::{predecessor, ChangeSet, ChangeSetKind, ChangeSetResolver};
use crate::types::{FileChange, Result, VersionTag};
use chrono::Local;
use std::path::{Path, PathBuf};

/// Revision used when the requested version has not been tagged yet
pub const HEAD: &str = "HEAD";

/// Versions known to the history and the ones the changelog lacks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatchUpPlan {
    pub all_versions: Vec<VersionTag>,
    pub missing: Vec<VersionTag>,
}

impl CatchUpPlan {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Progress notifications emitted while catching up, in order
#[derive(Debug)]
pub enum CatchUpEvent<'a> {
    Started {
        index: usize,
        total: usize,
        version: &'a str,
    },
    Generated {
        version: &'a str,
    },
    Skipped {
        version: &'a str,
        error: &'a ChangelogError,
    },
}

#[derive(Debug)]
pub struct SkippedVersion {
    pub version: VersionTag,
    pub error: ChangelogError,
}

/// Entries generated during catch-up, oldest first, plus the versions that failed
#[derive(Debug, Default)]
pub struct CatchUpReport {
    pub entries: Vec<String>,
    pub skipped: Vec<SkippedVersion>,
}

impl CatchUpReport {
    #[must_use]
    pub fn has_entries(&self) -> bool {
        !self.entries.is_empty()
    }
}

/// What a single release entry will be generated from
#[derive(Debug)]
pub struct ReleasePlan {
    pub version: VersionTag,
    /// Version the changes are measured from; `None` for a first release
    pub previous: Option<VersionTag>,
    /// Revision the changes are measured to
    pub target: String,
    pub change_set: ChangeSet,
    pub kind: ChangeSetKind,
    /// Set when staged changes could not be read; the plan proceeds without them
    pub staged_error: Option<ChangelogError>,
}

impl ReleasePlan {
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.change_set.is_empty()
    }
}

/// Drives history, generator and store to keep one changelog current
pub struct ChangelogUpdater<'a> {
    history: &'a dyn HistorySource,
    generator: &'a dyn EntryGenerator,
    store: &'a dyn ChangelogStore,
    path: PathBuf,
    resolver: ChangeSetResolver,
    merger: ChangelogMerger,
}

impl<'a> ChangelogUpdater<'a> {
    pub fn new(
        history: &'a dyn HistorySource,
        generator: &'a dyn EntryGenerator,
        store: &'a dyn ChangelogStore,
        path: impl Into<PathBuf>,
        config: &ChangelogConfig,
    ) -> Self {
        Self {
            history,
            generator,
            store,
            path: path.into(),
            resolver: ChangeSetResolver::new(config),
            merger: ChangelogMerger::new(config),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Compares the history against the versions already in the changelog
    pub fn plan_catch_up(&self) -> Result<CatchUpPlan> {
        let all_versions = self
            .history
            .all_versions()
            .map_err(|e| e.with_context("Failed to list versions"))?;
        if all_versions.is_empty() {
            return Ok(CatchUpPlan::default());
        }

        let content = self.store.read(&self.path)?;
        let missing = missing_versions(&all_versions, content.as_deref());

        Ok(CatchUpPlan {
            all_versions,
            missing,
        })
    }

    /// Generates an entry for every missing version, one after another.
    ///
    /// A version whose history lookup or generation fails is reported through
    /// `on_event` and left out of the report's entries; the loop carries on.
    pub fn catch_up<F>(&self, plan: &CatchUpPlan, mut on_event: F) -> CatchUpReport
    where
        F: FnMut(CatchUpEvent<'_>),
    {
        let staged_changes = self.history.staged_changes().unwrap_or_default();
        let total = plan.missing.len();
        let mut report = CatchUpReport::default();

        for (index, version) in plan.missing.iter().enumerate() {
            on_event(CatchUpEvent::Started {
                index,
                total,
                version,
            });

            let previous = predecessor(&plan.all_versions, version);
            match self.generate_backfill(version, previous, &staged_changes) {
                Ok(entry) => {
                    on_event(CatchUpEvent::Generated { version });
                    report.entries.push(entry);
                }
                Err(error) => {
                    on_event(CatchUpEvent::Skipped {
                        version,
                        error: &error,
                    });
                    report.skipped.push(SkippedVersion {
                        version: version.clone(),
                        error,
                    });
                }
            }
        }

        report
    }

    fn generate_backfill(
        &self,
        version: &str,
        previous: Option<&str>,
        staged_changes: &[FileChange],
    ) -> Result<String> {
        let change_set = ChangeSet {
            changed_files: self.history.changed_files(previous, version)?,
            commit_log: self.history.commit_log(previous, version)?,
            staged_changes: staged_changes.to_vec(),
        };
        let date = self.history.date_of(version).unwrap_or_else(|_| today());
        let kind = self.resolver.classify(&change_set);

        self.generate(EntryRequest::new(version, date, change_set, kind))
    }

    /// Works out the change set for a release that may not be tagged yet
    pub fn plan_release(&self, version: &str) -> Result<ReleasePlan> {
        let latest = self
            .history
            .latest_version()
            .map_err(|e| e.with_context("Failed to get latest version"))?;
        let all_versions = self
            .history
            .all_versions()
            .map_err(|e| e.with_context("Failed to list versions"))?;

        // A tagged version is measured from its predecessor up to itself; an
        // untagged one from the latest tag up to HEAD
        let (previous, target) = if all_versions.iter().any(|v| v == version) {
            (
                predecessor(&all_versions, version).map(str::to_string),
                version.to_string(),
            )
        } else {
            (latest, HEAD.to_string())
        };

        let changed_files = self
            .history
            .changed_files(previous.as_deref(), &target)
            .map_err(|e| e.with_context("Failed to get changed files"))?;
        let commit_log = self
            .history
            .commit_log(previous.as_deref(), &target)
            .map_err(|e| e.with_context("Failed to get commit messages"))?;
        let (staged_changes, staged_error) = match self.history.staged_changes() {
            Ok(staged) => (staged, None),
            Err(err) => (Vec::new(), Some(err)),
        };

        let change_set = ChangeSet {
            changed_files,
            commit_log,
            staged_changes,
        };
        let kind = self.resolver.classify(&change_set);

        Ok(ReleasePlan {
            version: version.to_string(),
            previous,
            target,
            change_set,
            kind,
            staged_error,
        })
    }

    /// Generates the entry for a planned release, dated today
    pub fn generate_release(&self, plan: &ReleasePlan) -> Result<String> {
        let request = EntryRequest::new(plan.version.clone(), today(), plan.change_set.clone(), plan.kind);
        self.generate(request)
    }

    fn generate(&self, request: EntryRequest) -> Result<String> {
        let entry = self
            .generator
            .generate(&request)
            .map_err(|e| e.with_operation_context("Generating entry", Some(request.version.clone())))?;

        if entry.trim().is_empty() {
            return Err(ChangelogError::EmptyEntry(request.version));
        }
        Ok(entry)
    }

    /// Merges one entry into the changelog and writes it back
    pub fn apply(&self, entry: &str) -> Result<MergeOutcome> {
        let existing = self.store.read(&self.path)?;
        let merged = self.merger.merge(existing.as_deref(), entry);
        self.store.write(&self.path, &merged.content)?;
        Ok(merged.outcome)
    }

    /// Merges a batch of catch-up entries as one block and writes it back
    pub fn apply_batch(&self, entries: &[String]) -> Result<MergeOutcome> {
        let existing = self.store.read(&self.path)?;
        let merged = self.merger.merge_batch(existing.as_deref(), entries)?;
        self.store.write(&self.path, &merged.content)?;
        Ok(merged.outcome)
    }
}

/// Today's local date as `YYYY-MM-DD`
#[must_use]
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

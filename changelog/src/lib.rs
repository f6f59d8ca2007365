//! Keeps a Keep-a-Changelog style `CHANGELOG.md` in sync with a version history.
//!
//! The document is handled as plain lines: version headings (`## [<tag>]`)
//! split it into blocks, new entries go above the newest block, and an entry
//! for an already recorded version replaces that version's block only.

pub mod config;
pub mod document;
pub mod error;
pub mod gap;
pub mod heading;
pub mod merger;
pub mod ports;
pub mod resolver;
pub mod store;
pub mod types;
pub mod updater;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::ChangelogConfig;
pub use document::ChangelogDocument;
pub use error::ChangelogError;
pub use gap::{detect_gaps, missing_versions, recorded_versions};
pub use heading::{entry_version, is_heading, parse_heading};
pub use merger::{ChangelogMerger, MergeOutcome, Merged};
pub use ports::{ChangelogStore, EntryGenerator, EntryRequest, HistorySource};
pub use resolver::{ChangeSet, ChangeSetKind, ChangeSetResolver};
pub use store::FileStore;
pub use types::{ChangeStatus, FileChange, Result, VersionTag};
pub use updater::{CatchUpEvent, CatchUpPlan, CatchUpReport, ChangelogUpdater, ReleasePlan};

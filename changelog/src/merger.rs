use crate::config::ChangelogConfig;
use crate::document::ChangelogDocument;
use crate::error::ChangelogError;
use crate::heading::entry_version;
use crate::types::{Result, VersionTag};

/// What a merge did to the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The document did not exist and was created with the preamble
    Created,
    /// The block of an already recorded version was replaced
    Replaced(VersionTag),
    /// The entry was placed above the first version heading
    Inserted,
    /// The document had no version headings; the entry was appended
    Appended,
}

/// New document content together with how it was produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged {
    pub content: String,
    pub outcome: MergeOutcome,
}

/// Folds generated entries into existing changelog content
#[derive(Debug, Clone)]
pub struct ChangelogMerger {
    preamble: String,
}

impl Default for ChangelogMerger {
    fn default() -> Self {
        Self::new(&ChangelogConfig::default())
    }
}

impl ChangelogMerger {
    pub fn new(config: &ChangelogConfig) -> Self {
        Self {
            preamble: config.preamble.clone(),
        }
    }

    /// Merges one entry block into `existing`.
    ///
    /// An entry whose first line is not a version heading is always inserted,
    /// never used to replace a block.
    #[must_use]
    pub fn merge(&self, existing: Option<&str>, entry: &str) -> Merged {
        let Some(content) = existing else {
            return Merged {
                content: format!("{}{entry}\n", self.preamble),
                outcome: MergeOutcome::Created,
            };
        };

        let version = entry_version(entry);
        let document = ChangelogDocument::parse(content);
        let location = document.locate(version);
        let lines = document.lines();

        match (location.block, location.first_heading) {
            (Some(block), _) => {
                let mut new_lines: Vec<String> = lines[..block.start].to_vec();
                new_lines.extend(entry.split('\n').map(str::to_string));

                if block.end < lines.len() {
                    if !lines[block.end - 1].trim().is_empty() {
                        new_lines.push(String::new());
                    }
                    new_lines.extend_from_slice(&lines[block.end..]);
                }

                Merged {
                    content: ChangelogDocument::from(new_lines).to_string(),
                    outcome: MergeOutcome::Replaced(version.unwrap_or_default().to_string()),
                }
            }
            (None, Some(first_heading)) => {
                let mut new_lines: Vec<String> = lines[..first_heading].to_vec();
                new_lines.extend(entry.split('\n').map(str::to_string));
                new_lines.push(String::new());
                new_lines.extend_from_slice(&lines[first_heading..]);

                Merged {
                    content: ChangelogDocument::from(new_lines).to_string(),
                    outcome: MergeOutcome::Inserted,
                }
            }
            (None, None) => Merged {
                content: format!("{content}\n{entry}\n"),
                outcome: MergeOutcome::Appended,
            },
        }
    }

    /// Merges several entries as one block, newest last in `entries`.
    ///
    /// Entries are joined with a blank line and merged in a single pass, so
    /// only the first entry's tag takes part in replacement matching.
    pub fn merge_batch<S: AsRef<str>>(&self, existing: Option<&str>, entries: &[S]) -> Result<Merged> {
        if entries.is_empty() {
            return Err(ChangelogError::EmptyBatch);
        }

        Ok(self.merge(existing, &join_entries(entries)))
    }
}

/// Joins entry blocks with one blank line between them
#[must_use]
pub fn join_entries<S: AsRef<str>>(entries: &[S]) -> String {
    entries
        .iter()
        .map(|entry| entry.as_ref())
        .collect::<Vec<_>>()
        .join("\n\n")
}

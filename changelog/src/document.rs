use crate::heading::{is_heading, parse_heading};
use crate::types::VersionTag;
use std::fmt::{self, Display, Formatter};
use std::ops::Range;

/// A changelog held as its raw lines.
///
/// Lines are split on `\n` only, so joining them back reproduces the
/// original text byte for byte, trailing newline included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogDocument {
    lines: Vec<String>,
}

/// Result of a single scan over the document for one version
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockLocation {
    /// Index of the first version heading anywhere in the document
    pub first_heading: Option<usize>,
    /// Lines owned by the first heading matching the requested version
    pub block: Option<Range<usize>>,
}

impl ChangelogDocument {
    pub fn parse(content: &str) -> Self {
        Self {
            lines: content.split('\n').map(str::to_string).collect(),
        }
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Every heading as `(line index, version)` in document order
    pub fn headings(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.lines
            .iter()
            .enumerate()
            .filter_map(|(idx, line)| parse_heading(line).map(|version| (idx, version)))
    }

    /// Versions recorded in the document, top to bottom, duplicates kept
    #[must_use]
    pub fn versions(&self) -> Vec<VersionTag> {
        self.headings().map(|(_, version)| version.to_string()).collect()
    }

    #[must_use]
    pub fn first_heading(&self) -> Option<usize> {
        self.lines.iter().position(|line| is_heading(line))
    }

    /// Finds the first heading and the block of `version` in one pass.
    ///
    /// Only the first heading equal to `version` is considered; its block
    /// ends at the next heading of any version or at the end of the document.
    /// `None` never matches.
    #[must_use]
    pub fn locate(&self, version: Option<&str>) -> BlockLocation {
        let mut location = BlockLocation::default();
        let mut block_start = None;

        for (idx, found) in self.headings() {
            if location.first_heading.is_none() {
                location.first_heading = Some(idx);
            }

            match block_start {
                Some(start) => {
                    location.block = Some(start..idx);
                    return location;
                }
                None if version == Some(found) => block_start = Some(idx),
                None => {}
            }
        }

        if let Some(start) = block_start {
            location.block = Some(start..self.lines.len());
        }
        location
    }

    /// The lines of the block owned by `version`, heading included
    #[must_use]
    pub fn block(&self, version: &str) -> Option<&[String]> {
        self.locate(Some(version))
            .block
            .map(|range| &self.lines[range])
    }
}

impl Display for ChangelogDocument {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

impl From<Vec<String>> for ChangelogDocument {
    fn from(lines: Vec<String>) -> Self {
        Self { lines }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHANGELOG: &str = "# Changelog

## [v0.9.0] - 2025-08-01

### Added

- Feature

## [v0.8.0] - 2025-07-01

### Fixed

- Bug
";

    #[test]
    fn test_round_trip_is_exact() {
        let document = ChangelogDocument::parse(CHANGELOG);
        assert_eq!(document.to_string(), CHANGELOG);
        assert_eq!(document.lines().last().map(String::as_str), Some(""));
    }

    #[test]
    fn test_versions_in_document_order() {
        let document = ChangelogDocument::parse(CHANGELOG);
        assert_eq!(document.versions(), vec!["v0.9.0", "v0.8.0"]);
        assert_eq!(document.first_heading(), Some(2));
    }

    #[test]
    fn test_locate_block_ends_at_next_heading() {
        let document = ChangelogDocument::parse(CHANGELOG);
        let location = document.locate(Some("v0.9.0"));
        assert_eq!(location.first_heading, Some(2));
        assert_eq!(location.block, Some(2..8));
    }

    #[test]
    fn test_locate_last_block_runs_to_end() {
        let document = ChangelogDocument::parse(CHANGELOG);
        let location = document.locate(Some("v0.8.0"));
        assert_eq!(location.block, Some(8..document.lines().len()));
    }

    #[test]
    fn test_locate_without_version_only_finds_first_heading() {
        let document = ChangelogDocument::parse(CHANGELOG);
        assert_eq!(
            document.locate(None),
            BlockLocation {
                first_heading: Some(2),
                block: None,
            }
        );
    }

    #[test]
    fn test_locate_first_duplicate_only() {
        let document = ChangelogDocument::parse("## [v1]\n- a\n## [v1]\n- b\n");
        assert_eq!(document.locate(Some("v1")).block, Some(0..2));
    }

    #[test]
    fn test_block_extraction() {
        let document = ChangelogDocument::parse(CHANGELOG);
        let block = document.block("v0.8.0").unwrap();
        assert_eq!(block[0], "## [v0.8.0] - 2025-07-01");
        assert!(block.iter().any(|line| line == "- Bug"));
        assert!(document.block("v0.7.0").is_none());
    }

    #[test]
    fn test_headings_ignore_lookalikes() {
        let document = ChangelogDocument::parse("### [v1]\n## v2\n## [v3]\n");
        assert_eq!(document.versions(), vec!["v3"]);
    }
}

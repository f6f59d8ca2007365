use once_cell::sync::Lazy;
use regex::Regex;

/// `## [<tag>]` at the start of a line. Bracket contents are kept verbatim,
/// surrounding whitespace included, so lookups match what was written.
pub static VERSION_HEADING_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^##\s+\[([^\]]+)\]").expect("Failed to compile version heading regex")
});

/// Extracts the version tag from a level-2 version heading line
#[must_use]
pub fn parse_heading(line: &str) -> Option<&str> {
    VERSION_HEADING_PATTERN
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

#[must_use]
pub fn is_heading(line: &str) -> bool {
    VERSION_HEADING_PATTERN.is_match(line)
}

/// Tag of an entry block, read from its first line
#[must_use]
pub fn entry_version(entry: &str) -> Option<&str> {
    entry.lines().next().and_then(parse_heading)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_heading() {
        assert!(is_heading("## [v1.0.0] - 2025-08-27"));
        assert!(!is_heading("### [v1.0.0]"));
        assert!(!is_heading("## v1.0.0 - 2025-08-27"));
        assert!(!is_heading("# Changelog"));
    }

    #[test]
    fn test_parse_standard_heading() {
        assert_eq!(parse_heading("## [v1.0.0] - 2025-08-27"), Some("v1.0.0"));
        assert_eq!(parse_heading("## [1.0.0]"), Some("1.0.0"));
        assert_eq!(parse_heading("## [3.0.0-beta] - 2025-01-01"), Some("3.0.0-beta"));
    }

    #[test]
    fn test_inner_whitespace_is_preserved() {
        assert_eq!(
            parse_heading("##  [ v1.0.0 ]  - 2025-08-27"),
            Some(" v1.0.0 ")
        );
    }

    #[test]
    fn test_rejects_other_heading_levels() {
        assert_eq!(parse_heading("### [v1.0.0]"), None);
        assert_eq!(parse_heading("# [v1.0.0]"), None);
        assert_eq!(parse_heading(" ## [v1.0.0]"), None);
    }

    #[test]
    fn test_rejects_missing_brackets() {
        assert_eq!(parse_heading("## v1.0.0 - 2025-08-27"), None);
        assert_eq!(parse_heading("## [] - 2025-08-27"), None);
        assert_eq!(parse_heading("##[v1.0.0]"), None);
    }

    #[test]
    fn test_entry_version_reads_first_line_only() {
        assert_eq!(entry_version("## [v2.0.0] - 2025-02-01\n\n### Added\n"), Some("v2.0.0"));
        assert_eq!(entry_version("Here is your entry:\n## [v2.0.0]"), None);
        assert_eq!(entry_version(""), None);
    }
}

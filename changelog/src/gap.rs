use crate::document::ChangelogDocument;
use crate::types::VersionTag;
use std::collections::HashSet;

/// Versions from `all_versions` that have no block in the document.
///
/// `all_versions` must already be oldest-first; the result keeps that order.
/// Matching is verbatim, so `v1.0.0` and ` v1.0.0 ` are different versions.
#[must_use]
pub fn detect_gaps<S: AsRef<str>>(all_versions: &[S], recorded_versions: &HashSet<&str>) -> Vec<VersionTag> {
    all_versions
        .iter()
        .map(|version| version.as_ref())
        .filter(|version| !recorded_versions.contains(version))
        .map(str::to_string)
        .collect()
}

/// Versions recorded in changelog content; a missing document records none
#[must_use]
pub fn recorded_versions(content: Option<&str>) -> Vec<VersionTag> {
    content
        .map(|content| ChangelogDocument::parse(content).versions())
        .unwrap_or_default()
}

/// Convenience wrapper running [`detect_gaps`] against changelog content
#[must_use]
pub fn missing_versions<S: AsRef<str>>(all_versions: &[S], content: Option<&str>) -> Vec<VersionTag> {
    let recorded = recorded_versions(content);
    let recorded: HashSet<&str> = recorded.iter().map(String::as_str).collect();
    detect_gaps(all_versions, &recorded)
}

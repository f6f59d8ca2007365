use semver::Version;
use std::cmp::Ordering;

/// Orders tag names the way `git tag --sort=version:refname` roughly does.
///
/// Tags that parse as semantic versions (with or without a leading `v`) are
/// compared as such, so pre-releases sort before their release. Other tags
/// sort before them, compared with embedded numbers taken numerically.
#[must_use]
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (parse_semver(a), parse_semver(b)) {
        (Some(left), Some(right)) => left.cmp(&right).then_with(|| a.cmp(b)),
        (None, None) => natural_cmp(a, b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
    }
}

/// Sorts tags oldest first
pub fn sort_versions(tags: &mut [String]) {
    tags.sort_by(|a, b| compare_versions(a, b));
}

fn parse_semver(tag: &str) -> Option<Version> {
    Version::parse(tag.strip_prefix('v').unwrap_or(tag)).ok()
}

fn natural_cmp(a: &str, b: &str) -> Ordering {
    let left = chunks(a);
    let right = chunks(b);

    for (x, y) in left.iter().zip(right.iter()) {
        let ordering = compare_chunk(x, y);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    left.len().cmp(&right.len()).then_with(|| a.cmp(b))
}

fn compare_chunk(x: &str, y: &str) -> Ordering {
    let numeric = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if numeric(x) && numeric(y) {
        let x_trimmed = x.trim_start_matches('0');
        let y_trimmed = y.trim_start_matches('0');
        x_trimmed
            .len()
            .cmp(&y_trimmed.len())
            .then_with(|| x_trimmed.cmp(y_trimmed))
            .then_with(|| x.cmp(y))
    } else {
        x.cmp(y)
    }
}

/// Splits into maximal runs of ASCII digits and non-digits
fn chunks(s: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut previous_is_digit = None;

    for (idx, ch) in s.char_indices() {
        let is_digit = ch.is_ascii_digit();
        if previous_is_digit.is_some_and(|previous| previous != is_digit) {
            chunks.push(&s[start..idx]);
            start = idx;
        }
        previous_is_digit = Some(is_digit);
    }
    if start < s.len() {
        chunks.push(&s[start..]);
    }
    chunks
}

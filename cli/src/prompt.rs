//! Prompt templates that ask a model for one Keep a Changelog entry.

use changelog::types::format_listing;
use changelog::{ChangeSetKind, EntryRequest};
use std::fmt::Write;

/// Section order of a Keep a Changelog release, each with what it lists
const CATEGORIES: &[(&str, &str)] = &[
    ("Added", "new features"),
    ("Changed", "changes in existing functionality"),
    ("Deprecated", "soon-to-be removed features"),
    ("Removed", "now removed features"),
    ("Fixed", "bug fixes"),
    ("Security", "vulnerability fixes"),
];

/// Builds the prompt for `request`, with list items written in `language`
pub fn build_prompt(request: &EntryRequest, language: &str) -> String {
    match request.kind {
        ChangeSetKind::Initial => initial_prompt(request, language),
        ChangeSetKind::Incremental => incremental_prompt(request, language),
    }
}

fn initial_prompt(request: &EntryRequest, language: &str) -> String {
    let mut prompt = String::from(
        "This is the first release. Based on the information below, write a CHANGELOG.md entry in Keep a Changelog format.\n\n",
    );
    push_release(&mut prompt, request);

    if !request.commit_log.is_empty() {
        push_block(&mut prompt, "Commit messages", &request.commit_log);
    }
    if !request.changed_files.is_empty() {
        push_block(&mut prompt, "Added files", &format_listing(&request.changed_files));
    }
    if !request.staged_changes.is_empty() {
        push_block(&mut prompt, "Staged files", &format_listing(&request.staged_changes));
    }

    let _ = write!(
        prompt,
        "Write the entry in this form, starting at heading level 2:\n\
         ## [{version}] - {date}\n\n\
         ### Added\n\n\
         - Initial release\n\
         - The main features of the project as bullet points\n\n",
        version = request.version,
        date = request.date,
    );

    push_rules(
        &mut prompt,
        language,
        &[
            "Describe the purpose and the main features of the project clearly",
            "Mention the technology stack that the file layout suggests",
        ],
    );
    prompt
}

fn incremental_prompt(request: &EntryRequest, language: &str) -> String {
    let mut prompt = String::from(
        "Based on the git changes and commit messages below, write a CHANGELOG.md entry in Keep a Changelog format.\n\n",
    );
    push_release(&mut prompt, request);
    push_block(&mut prompt, "Commit messages", &request.commit_log);
    push_block(&mut prompt, "Committed changes", &format_listing(&request.changed_files));
    if !request.staged_changes.is_empty() {
        push_block(
            &mut prompt,
            "Staged changes (not committed yet)",
            &format_listing(&request.staged_changes),
        );
    }

    let _ = writeln!(
        prompt,
        "Write the entry in this form, starting at heading level 2:\n## [{}] - {}\n",
        request.version, request.date
    );
    prompt.push_str("Use these sections in this order, only when there are matching changes:\n");
    for (name, description) in CATEGORIES {
        let _ = write!(prompt, "### {name}\n\n- {description}\n\n");
    }

    push_rules(
        &mut prompt,
        language,
        &[
            "Leave out categories without changes",
            "Merge committed and staged changes into one entry",
            "Explain the impact and the reason of each change",
            "Focus on what users notice rather than technical details",
        ],
    );
    prompt
}

fn push_release(prompt: &mut String, request: &EntryRequest) {
    let _ = write!(
        prompt,
        "New version tag: {}\nDate: {}\n\n",
        request.version, request.date
    );
}

fn push_block(prompt: &mut String, title: &str, body: &str) {
    let _ = write!(prompt, "{title}:\n---\n{body}\n---\n\n");
}

fn push_rules(prompt: &mut String, language: &str, extra: &[&str]) {
    prompt.push_str("Rules:\n");
    let common = [
        "Always put a blank line after each section header (### Added and so on)".to_string(),
        "Follow the Keep a Changelog principles (https://keepachangelog.com/en/1.1.0/)".to_string(),
        "Do not include any preamble or explanation".to_string(),
        "Output only the changelog entry itself".to_string(),
        format!("Write every item in {language}, in a form people can read easily"),
    ];
    for rule in common.iter().map(String::as_str).chain(extra.iter().copied()) {
        let _ = writeln!(prompt, "- {rule}");
    }
}

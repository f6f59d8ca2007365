use crate::error::ChangelogError;

/// Type alias for Result with `ChangelogError`
pub type Result<T> = std::result::Result<T, ChangelogError>;

/// Name of a release point, usually a git tag. Compared verbatim.
pub type VersionTag = String;

/// How a file changed between two revisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    TypeChanged,
    Unknown,
}

impl ChangeStatus {
    /// Maps a `git diff --name-status` letter to a status
    #[must_use]
    pub fn from_code(code: char) -> Self {
        match code {
            'A' => Self::Added,
            'M' => Self::Modified,
            'D' => Self::Deleted,
            'R' => Self::Renamed,
            'C' => Self::Copied,
            'T' => Self::TypeChanged,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Added => 'A',
            Self::Modified => 'M',
            Self::Deleted => 'D',
            Self::Renamed => 'R',
            Self::Copied => 'C',
            Self::TypeChanged => 'T',
            Self::Unknown => 'X',
        }
    }
}

/// A single changed-file record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub status: ChangeStatus,
    pub path: String,
}

impl FileChange {
    pub fn new(status: ChangeStatus, path: impl Into<String>) -> Self {
        Self {
            status,
            path: path.into(),
        }
    }

    pub fn added(path: impl Into<String>) -> Self {
        Self::new(ChangeStatus::Added, path)
    }

    #[must_use]
    pub fn is_added(&self) -> bool {
        self.status == ChangeStatus::Added
    }

    /// Reads a `--name-status` style listing.
    ///
    /// `A\t<path>` and `new file: <path>` lines are additions. Diff header
    /// lines and `+` content lines carry no file record and are skipped; any
    /// other non-blank line that isn't a status record becomes an `Unknown`
    /// record so it still counts as a non-addition.
    #[must_use]
    pub fn parse_listing(listing: &str) -> Vec<Self> {
        listing
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter(|line| !is_diff_noise(line))
            .map(Self::parse_line)
            .collect()
    }

    fn parse_line(line: &str) -> Self {
        if let Some(path) = line.strip_prefix("new file:") {
            return Self::added(path.trim());
        }

        match line.split_once('\t') {
            Some((code, path)) if !code.is_empty() => {
                // Renames and copies carry a similarity score, e.g. R100
                let status = code.chars().next().map_or(ChangeStatus::Unknown, ChangeStatus::from_code);
                let path = path.rsplit('\t').next().unwrap_or(path);
                Self::new(status, path)
            }
            _ => Self::new(ChangeStatus::Unknown, line),
        }
    }
}

fn is_diff_noise(line: &str) -> bool {
    ["diff --git", "index ", "+++", "---", "@@"]
        .iter()
        .any(|prefix| line.starts_with(prefix))
        || line.starts_with('+')
}

impl std::fmt::Display for FileChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}", self.status.code(), self.path)
    }
}

/// Renders records back into a `--name-status` listing, one per line
#[must_use]
pub fn format_listing(changes: &[FileChange]) -> String {
    changes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

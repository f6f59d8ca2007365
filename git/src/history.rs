use std::path::Path;
use std::process::Command;

use crate::error::{GitError, Result, ResultExt};
use crate::ordering::sort_versions;
use changelog::{ChangeStatus, FileChange, HistorySource, VersionTag};
use chrono::{DateTime, FixedOffset};
use git2::{
    Commit, Delta, DescribeFormatOptions, DescribeOptions, Diff, ErrorCode, Repository, Sort, Time,
    Tree,
};

const HEAD: &str = "HEAD";

/// How a tag fetch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Fetched,
    /// No remote tracking is configured; local tags are used as they are
    LocalOnly,
}

/// Version history read from a git repository, one version per tag
pub struct RealHistorySource {
    repo: Repository,
}

impl RealHistorySource {
    /// Opens the repository containing the current directory
    pub fn open() -> Result<Self> {
        Self::open_at(Path::new("."))
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path).map_err(|e| {
            GitError::RepositoryError(format!("Failed to discover git repository: {}", e))
        })?;
        Ok(Self { repo })
    }

    /// Pulls tags from the remote so the history is complete.
    ///
    /// Tries `git fetch --tags` first and falls back to `git pull --tags`;
    /// a repository without remote tracking is not an error.
    pub fn fetch_tags(&self) -> Result<FetchOutcome> {
        let fetch = self
            .git_command(&["fetch", "--tags"])
            .context("Failed to execute git fetch command")?;
        if fetch.status.success() {
            return Ok(FetchOutcome::Fetched);
        }

        let pull = self
            .git_command(&["pull", "--tags"])
            .context("Failed to execute git pull command")?;
        if pull.status.success() {
            return Ok(FetchOutcome::Fetched);
        }

        let output = format!(
            "{}{}",
            String::from_utf8_lossy(&pull.stdout),
            String::from_utf8_lossy(&pull.stderr)
        );
        if output.contains("no tracking information") {
            return Ok(FetchOutcome::LocalOnly);
        }

        Err(GitError::CommandError(format!(
            "Failed to fetch tags: {}",
            output.trim()
        )))
    }

    fn git_command(&self, args: &[&str]) -> std::io::Result<std::process::Output> {
        let workdir = self.repo.workdir().unwrap_or_else(|| self.repo.path());
        Command::new("git").args(args).current_dir(workdir).output()
    }

    fn head_is_unborn(&self) -> bool {
        matches!(self.repo.head(), Err(ref e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound)
    }

    fn commit_at(&self, revision: &str) -> Result<Commit<'_>> {
        let object = self
            .repo
            .revparse_single(revision)
            .map_err(|_| GitError::RevisionNotFound(revision.to_string()))?;
        object
            .peel_to_commit()
            .with_context(|| format!("'{}' does not point to a commit", revision))
    }

    /// Tree of `revision`, or `None` when asking for `HEAD` before the first commit
    fn tree_at(&self, revision: &str) -> Result<Option<Tree<'_>>> {
        if revision == HEAD && self.head_is_unborn() {
            return Ok(None);
        }
        let tree = self
            .commit_at(revision)?
            .tree()
            .with_context(|| format!("Failed to read tree of '{}'", revision))?;
        Ok(Some(tree))
    }

    fn tag_names(&self) -> Result<Vec<String>> {
        let names = self.repo.tag_names(None).context("Failed to list tags")?;
        let mut tags: Vec<String> = names.iter().flatten().map(str::to_string).collect();
        sort_versions(&mut tags);
        Ok(tags)
    }

    fn describe_head(&self) -> Result<Option<String>> {
        let Ok(head) = self.repo.revparse_single(HEAD) else {
            return Ok(None);
        };

        let mut options = DescribeOptions::new();
        options.describe_tags();
        // No tag reachable from HEAD
        let Ok(describe) = head.describe(&options) else {
            return Ok(None);
        };

        let mut format = DescribeFormatOptions::new();
        format.abbreviated_size(0);
        Ok(Some(describe.format(Some(&format))?))
    }

    fn diff_changes(&self, from: Option<&str>, to: &str) -> Result<Vec<FileChange>> {
        let Some(new_tree) = self.tree_at(to)? else {
            return Ok(Vec::new());
        };
        let old_tree = match from {
            Some(from) => self.tree_at(from)?,
            None => None,
        };

        let mut diff = self
            .repo
            .diff_tree_to_tree(old_tree.as_ref(), Some(&new_tree), None)
            .with_context(|| format!("Failed to diff {}..{}", from.unwrap_or(""), to))?;
        diff.find_similar(None)?;
        Ok(collect_changes(&diff))
    }

    fn log_lines(&self, from: Option<&str>, to: &str) -> Result<String> {
        if to == HEAD && self.head_is_unborn() {
            return Ok(String::new());
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(self.commit_at(to)?.id())?;
        if let Some(from) = from {
            revwalk.hide(self.commit_at(from)?.id())?;
        }

        let mut lines = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            let short_id: String = commit.id().to_string().chars().take(7).collect();
            lines.push(format!("{} {}", short_id, commit.summary().unwrap_or_default()));
        }
        Ok(lines.join("\n"))
    }

    fn index_changes(&self) -> Result<Vec<FileChange>> {
        let head_tree = self.tree_at(HEAD)?;
        let index = self.repo.index().context("Failed to read index")?;
        let diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), Some(&index), None)
            .context("Failed to diff staged changes")?;
        Ok(collect_changes(&diff))
    }

    fn commit_date(&self, revision: &str) -> Result<String> {
        let commit = self.commit_at(revision)?;
        format_date(commit.author().when())
            .ok_or_else(|| GitError::InvalidDate(revision.to_string()))
    }
}

fn collect_changes(diff: &Diff<'_>) -> Vec<FileChange> {
    diff.deltas()
        .filter_map(|delta| {
            let status = match delta.status() {
                Delta::Added => ChangeStatus::Added,
                Delta::Modified => ChangeStatus::Modified,
                Delta::Deleted => ChangeStatus::Deleted,
                Delta::Renamed => ChangeStatus::Renamed,
                Delta::Copied => ChangeStatus::Copied,
                Delta::Typechange => ChangeStatus::TypeChanged,
                Delta::Unmodified | Delta::Ignored | Delta::Untracked => return None,
                _ => ChangeStatus::Unknown,
            };
            let file = if status == ChangeStatus::Deleted {
                delta.old_file()
            } else {
                delta.new_file()
            };
            let path = file.path()?.to_string_lossy().into_owned();
            Some(FileChange::new(status, path))
        })
        .collect()
}

/// Commit time in the committer's own timezone as `YYYY-MM-DD`
fn format_date(time: Time) -> Option<String> {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60)?;
    let date = DateTime::from_timestamp(time.seconds(), 0)?.with_timezone(&offset);
    Some(date.format("%Y-%m-%d").to_string())
}

impl HistorySource for RealHistorySource {
    fn latest_version(&self) -> changelog::Result<Option<VersionTag>> {
        Ok(self.describe_head()?)
    }

    fn all_versions(&self) -> changelog::Result<Vec<VersionTag>> {
        Ok(self.tag_names()?)
    }

    fn changed_files(&self, from: Option<&str>, to: &str) -> changelog::Result<Vec<FileChange>> {
        Ok(self.diff_changes(from, to)?)
    }

    fn commit_log(&self, from: Option<&str>, to: &str) -> changelog::Result<String> {
        Ok(self.log_lines(from, to)?)
    }

    fn staged_changes(&self) -> changelog::Result<Vec<FileChange>> {
        Ok(self.index_changes()?)
    }

    fn date_of(&self, version: &str) -> changelog::Result<String> {
        Ok(self.commit_date(version)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Oid, Signature};
    use std::fs;
    use tempfile::TempDir;

    // 2025-01-01T00:00:00Z
    const JAN_1: i64 = 1_735_689_600;
    const DAY: i64 = 86_400;

    fn init_repo() -> (TempDir, Repository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = Repository::init(temp_dir.path()).unwrap();
        (temp_dir, repo)
    }

    fn stage(repo: &Repository, name: &str, content: Option<&str>) {
        let workdir = repo.workdir().unwrap();
        let mut index = repo.index().unwrap();
        match content {
            Some(content) => {
                fs::write(workdir.join(name), content).unwrap();
                index.add_path(Path::new(name)).unwrap();
            }
            None => {
                fs::remove_file(workdir.join(name)).unwrap();
                index.remove_path(Path::new(name)).unwrap();
            }
        }
        index.write().unwrap();
    }

    fn commit(repo: &Repository, message: &str, time: i64) -> Oid {
        let mut index = repo.index().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let signature = Signature::new("Test User", "test@example.com", &Time::new(time, 0)).unwrap();
        let parents = match repo.head() {
            Ok(head) => vec![head.peel_to_commit().unwrap()],
            Err(_) => Vec::new(),
        };
        let parent_refs: Vec<&Commit<'_>> = parents.iter().collect();
        repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parent_refs)
            .unwrap()
    }

    fn tag(repo: &Repository, name: &str, oid: Oid) {
        let object = repo.find_object(oid, None).unwrap();
        repo.tag_lightweight(name, &object, false).unwrap();
    }

    /// v0.1.0: a, b   v0.2.0: a modified, b deleted, c added   HEAD: d added
    fn sample_history() -> (TempDir, RealHistorySource) {
        let (temp_dir, repo) = init_repo();

        stage(&repo, "a.txt", Some("a"));
        stage(&repo, "b.txt", Some("b"));
        let first = commit(&repo, "Initial commit", JAN_1);
        tag(&repo, "v0.1.0", first);

        stage(&repo, "a.txt", Some("a, changed"));
        stage(&repo, "b.txt", None);
        commit(&repo, "Remove b", JAN_1 + DAY);
        stage(&repo, "c.txt", Some("c"));
        let second = commit(&repo, "Add c", JAN_1 + 2 * DAY);
        tag(&repo, "v0.2.0", second);

        stage(&repo, "d.txt", Some("d"));
        commit(&repo, "Add d", JAN_1 + 3 * DAY);

        let history = RealHistorySource::open_at(temp_dir.path()).unwrap();
        (temp_dir, history)
    }

    #[test]
    fn test_all_versions_oldest_first() {
        let (temp_dir, repo) = init_repo();
        stage(&repo, "a.txt", Some("a"));
        let oid = commit(&repo, "Initial commit", JAN_1);
        for name in ["v0.10.0", "v0.2.0", "v0.9.0"] {
            tag(&repo, name, oid);
        }

        let history = RealHistorySource::open_at(temp_dir.path()).unwrap();
        assert_eq!(history.all_versions().unwrap(), vec!["v0.2.0", "v0.9.0", "v0.10.0"]);
    }

    #[test]
    fn test_latest_version_is_nearest_tag() {
        let (_temp_dir, history) = sample_history();
        assert_eq!(history.latest_version().unwrap().as_deref(), Some("v0.2.0"));
    }

    #[test]
    fn test_first_version_lists_every_file_as_added() {
        let (_temp_dir, history) = sample_history();
        let files = history.changed_files(None, "v0.1.0").unwrap();
        assert_eq!(files, vec![FileChange::added("a.txt"), FileChange::added("b.txt")]);
    }

    #[test]
    fn test_changed_files_between_tags() {
        let (_temp_dir, history) = sample_history();
        let mut files = history.changed_files(Some("v0.1.0"), "v0.2.0").unwrap();
        files.sort_by(|a, b| a.path.cmp(&b.path));
        assert_eq!(
            files,
            vec![
                FileChange::new(ChangeStatus::Modified, "a.txt"),
                FileChange::new(ChangeStatus::Deleted, "b.txt"),
                FileChange::added("c.txt"),
            ]
        );
    }

    #[test]
    fn test_changed_files_up_to_head() {
        let (_temp_dir, history) = sample_history();
        let files = history.changed_files(Some("v0.2.0"), HEAD).unwrap();
        assert_eq!(files, vec![FileChange::added("d.txt")]);
    }

    #[test]
    fn test_commit_log_between_tags() {
        let (_temp_dir, history) = sample_history();
        let log = history.commit_log(Some("v0.1.0"), "v0.2.0").unwrap();
        let summaries: Vec<&str> = log
            .lines()
            .map(|line| line.split_once(' ').unwrap().1)
            .collect();
        assert_eq!(summaries, vec!["Add c", "Remove b"]);
        assert!(log.lines().all(|line| line.split(' ').next().unwrap().len() == 7));
    }

    #[test]
    fn test_commit_log_from_beginning() {
        let (_temp_dir, history) = sample_history();
        let log = history.commit_log(None, "v0.1.0").unwrap();
        assert!(log.ends_with(" Initial commit"));
        assert_eq!(log.lines().count(), 1);
    }

    #[test]
    fn test_unknown_revision_is_an_error() {
        let (_temp_dir, history) = sample_history();
        let err = history.changed_files(Some("v9.9.9"), HEAD).unwrap_err();
        assert!(err.user_message().contains("v9.9.9"));
    }

    #[test]
    fn test_date_of_tag() {
        let (_temp_dir, history) = sample_history();
        assert_eq!(history.date_of("v0.1.0").unwrap(), "2025-01-01");
        assert_eq!(history.date_of("v0.2.0").unwrap(), "2025-01-03");
    }

    #[test]
    fn test_date_uses_commit_timezone() {
        let (temp_dir, repo) = init_repo();
        stage(&repo, "a.txt", Some("a"));
        let mut index = repo.index().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        // 2025-01-01T23:30:00Z committed at UTC+09:00
        let signature = Signature::new("Test", "t@example.com", &Time::new(JAN_1 + 23 * 3600 + 1800, 540)).unwrap();
        let oid = repo.commit(Some("HEAD"), &signature, &signature, "late", &tree, &[]).unwrap();
        tag(&repo, "v1.0.0", oid);

        let history = RealHistorySource::open_at(temp_dir.path()).unwrap();
        assert_eq!(history.date_of("v1.0.0").unwrap(), "2025-01-02");
    }

    #[test]
    fn test_staged_changes() {
        let (temp_dir, history) = sample_history();
        let repo = Repository::open(temp_dir.path()).unwrap();
        stage(&repo, "e.txt", Some("e"));
        stage(&repo, "a.txt", Some("a, staged"));

        let mut staged = history.staged_changes().unwrap();
        staged.sort_by(|a, b| a.path.cmp(&b.path));
        assert_eq!(
            staged,
            vec![
                FileChange::new(ChangeStatus::Modified, "a.txt"),
                FileChange::added("e.txt"),
            ]
        );
    }

    #[test]
    fn test_repository_without_commits() {
        let (temp_dir, repo) = init_repo();
        stage(&repo, "a.txt", Some("a"));
        stage(&repo, "b.txt", Some("b"));

        let history = RealHistorySource::open_at(temp_dir.path()).unwrap();
        assert_eq!(history.latest_version().unwrap(), None);
        assert!(history.all_versions().unwrap().is_empty());
        assert!(history.changed_files(None, HEAD).unwrap().is_empty());
        assert_eq!(history.commit_log(None, HEAD).unwrap(), "");
        assert_eq!(
            history.staged_changes().unwrap(),
            vec![FileChange::added("a.txt"), FileChange::added("b.txt")]
        );
    }

    #[test]
    fn test_repository_without_tags() {
        let (temp_dir, repo) = init_repo();
        stage(&repo, "a.txt", Some("a"));
        commit(&repo, "Initial commit", JAN_1);

        let history = RealHistorySource::open_at(temp_dir.path()).unwrap();
        assert_eq!(history.latest_version().unwrap(), None);
        assert_eq!(history.changed_files(None, HEAD).unwrap(), vec![FileChange::added("a.txt")]);
    }

    #[test]
    fn test_format_date_rejects_out_of_range_timestamp() {
        assert_eq!(format_date(Time::new(i64::MAX, 0)), None);
    }
}

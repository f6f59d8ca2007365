use changelog::testing::MockGenerator;
use changelog::{
    ChangeSetKind, ChangeStatus, ChangelogConfig, ChangelogDocument, ChangelogUpdater, FileChange,
    FileStore, MergeOutcome,
};
use git::RealHistorySource;
use git2::{Commit, Oid, Repository, Signature, Time};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// 2025-01-01T12:00:00Z
const JAN_1_NOON: i64 = 1_735_732_800;
const DAY: i64 = 86_400;

struct Fixture {
    dir: TempDir,
    repo: Repository,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        Self { dir, repo }
    }

    fn write(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
        let mut index = self.repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
    }

    fn commit(&self, message: &str, time: i64) -> Oid {
        let mut index = self.repo.index().unwrap();
        let tree = self.repo.find_tree(index.write_tree().unwrap()).unwrap();
        let signature = Signature::new("Test User", "test@example.com", &Time::new(time, 0)).unwrap();
        let parents: Vec<Commit<'_>> = self
            .repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok())
            .into_iter()
            .collect();
        let parent_refs: Vec<&Commit<'_>> = parents.iter().collect();
        self.repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parent_refs)
            .unwrap()
    }

    fn tag(&self, name: &str, oid: Oid) {
        let object = self.repo.find_object(oid, None).unwrap();
        self.repo.tag_lightweight(name, &object, false).unwrap();
    }

    fn history(&self) -> RealHistorySource {
        RealHistorySource::open_at(self.dir.path()).unwrap()
    }

    fn changelog_path(&self) -> std::path::PathBuf {
        self.dir.path().join("CHANGELOG.md")
    }
}

/// v0.1.0 adds six files, v0.2.0 changes one, v0.3.0 adds one
fn three_releases() -> Fixture {
    let fixture = Fixture::new();
    for name in ["Cargo.toml", "README.md", "src/main.rs", "src/lib.rs", "src/cli.rs", "src/ui.rs"] {
        fixture.write(name, name);
    }
    let first = fixture.commit("Initial import", JAN_1_NOON);
    fixture.tag("v0.1.0", first);

    fixture.write("src/lib.rs", "lib, improved");
    let second = fixture.commit("Improve lib", JAN_1_NOON + 31 * DAY);
    fixture.tag("v0.2.0", second);

    fixture.write("src/export.rs", "export");
    let third = fixture.commit("Add export", JAN_1_NOON + 59 * DAY);
    fixture.tag("v0.3.0", third);

    fixture
}

#[test]
fn test_catch_up_writes_every_tag() {
    let fixture = three_releases();
    let history = fixture.history();
    let generator = MockGenerator::new();
    let store = FileStore;
    let updater = ChangelogUpdater::new(
        &history,
        &generator,
        &store,
        fixture.changelog_path(),
        &ChangelogConfig::default(),
    );

    let plan = updater.plan_catch_up().unwrap();
    assert_eq!(plan.missing, vec!["v0.1.0", "v0.2.0", "v0.3.0"]);

    let report = updater.catch_up(&plan, |_| {});
    assert!(report.skipped.is_empty());

    let requests = generator.requests.borrow();
    assert_eq!(requests[0].kind, ChangeSetKind::Initial);
    assert_eq!(requests[0].date, "2025-01-01");
    assert_eq!(requests[0].changed_files.len(), 6);
    assert_eq!(requests[1].kind, ChangeSetKind::Incremental);
    assert_eq!(requests[1].date, "2025-02-01");
    assert_eq!(
        requests[1].changed_files,
        vec![FileChange::new(ChangeStatus::Modified, "src/lib.rs")]
    );
    assert!(requests[1].commit_log.ends_with(" Improve lib"));
    assert_eq!(requests[2].date, "2025-03-01");
    drop(requests);

    let mut entries = report.entries;
    entries.reverse();
    assert_eq!(updater.apply_batch(&entries).unwrap(), MergeOutcome::Created);

    let content = fs::read_to_string(fixture.changelog_path()).unwrap();
    assert!(content.starts_with("# Changelog\n\n## [v0.3.0] - 2025-03-01"));
    assert_eq!(
        ChangelogDocument::parse(&content).versions(),
        vec!["v0.3.0", "v0.2.0", "v0.1.0"]
    );
    assert!(updater.plan_catch_up().unwrap().is_complete());
}

#[test]
fn test_release_for_latest_tag_uses_previous_tag() {
    let fixture = three_releases();
    let history = fixture.history();
    let generator = MockGenerator::new();
    let store = FileStore;
    let updater = ChangelogUpdater::new(
        &history,
        &generator,
        &store,
        fixture.changelog_path(),
        &ChangelogConfig::default(),
    );

    let plan = updater.plan_release("v0.3.0").unwrap();
    assert_eq!(plan.previous.as_deref(), Some("v0.2.0"));
    assert_eq!(plan.target, "v0.3.0");
    assert_eq!(plan.change_set.changed_files, vec![FileChange::added("src/export.rs")]);
    assert_eq!(plan.kind, ChangeSetKind::Incremental);

    let entry = updater.generate_release(&plan).unwrap();
    assert_eq!(updater.apply(&entry).unwrap(), MergeOutcome::Created);
    let entry = updater.generate_release(&plan).unwrap();
    assert_eq!(
        updater.apply(&entry).unwrap(),
        MergeOutcome::Replaced("v0.3.0".to_string())
    );

    let content = fs::read_to_string(fixture.changelog_path()).unwrap();
    assert_eq!(ChangelogDocument::parse(&content).versions(), vec!["v0.3.0"]);
}

#[test]
fn test_release_for_older_tag_measures_from_its_predecessor() {
    let fixture = three_releases();
    let history = fixture.history();
    let generator = MockGenerator::new();
    let store = FileStore;
    let updater = ChangelogUpdater::new(
        &history,
        &generator,
        &store,
        fixture.changelog_path(),
        &ChangelogConfig::default(),
    );

    let plan = updater.plan_release("v0.2.0").unwrap();
    assert_eq!(plan.previous.as_deref(), Some("v0.1.0"));
    assert_eq!(plan.target, "v0.2.0");
    assert_eq!(
        plan.change_set.changed_files,
        vec![FileChange::new(ChangeStatus::Modified, "src/lib.rs")]
    );
    assert!(plan.change_set.commit_log.ends_with(" Improve lib"));
}

#[test]
fn test_release_for_untagged_version_measures_up_to_head() {
    let fixture = three_releases();
    fixture.write("docs/guide.md", "guide");
    fixture.commit("Add guide", JAN_1_NOON + 70 * DAY);

    let history = fixture.history();
    let generator = MockGenerator::new();
    let store = FileStore;
    let updater = ChangelogUpdater::new(
        &history,
        &generator,
        &store,
        fixture.changelog_path(),
        &ChangelogConfig::default(),
    );

    let plan = updater.plan_release("v0.4.0").unwrap();
    assert_eq!(plan.previous.as_deref(), Some("v0.3.0"));
    assert_eq!(plan.target, "HEAD");
    assert_eq!(plan.change_set.changed_files, vec![FileChange::added("docs/guide.md")]);
    assert!(plan.change_set.commit_log.ends_with(" Add guide"));
    assert!(plan.has_changes());
}

#[test]
fn test_release_without_changes_has_nothing_to_do() {
    let fixture = three_releases();
    let history = fixture.history();
    let generator = MockGenerator::new();
    let store = FileStore;
    let updater = ChangelogUpdater::new(
        &history,
        &generator,
        &store,
        fixture.changelog_path(),
        &ChangelogConfig::default(),
    );

    let plan = updater.plan_release("v0.4.0").unwrap();
    assert!(!plan.has_changes());
    assert!(generator.requested_versions().is_empty());
}

#[test]
fn test_first_release_from_staged_files() {
    let fixture = Fixture::new();
    for name in ["a.rs", "b.rs", "c.rs", "d.rs"] {
        fixture.write(name, name);
    }

    let history = fixture.history();
    let generator = MockGenerator::new();
    let store = FileStore;
    let updater = ChangelogUpdater::new(
        &history,
        &generator,
        &store,
        fixture.changelog_path(),
        &ChangelogConfig::default(),
    );

    let plan = updater.plan_release("v0.1.0").unwrap();
    assert_eq!(plan.previous, None);
    assert!(plan.change_set.changed_files.is_empty());
    assert_eq!(plan.change_set.staged_changes.len(), 4);
    assert_eq!(plan.kind, ChangeSetKind::Initial);
}

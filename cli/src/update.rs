use crate::cli::Cli;
use crate::config::Settings;
use crate::error::{CliError, Result};
use crate::executor::executor_for;
use crate::generator::AiEntryGenerator;
use crate::progress::GenerationProgress;
use crate::ui;
use anyhow::Context;
use changelog::merger::join_entries;
use changelog::{
    CatchUpEvent, ChangeSetKind, ChangelogUpdater, FileStore, MergeOutcome, ReleasePlan,
};
use dialoguer::Confirm;
use git::{FetchOutcome, RealHistorySource};
use std::path::Path;

/// Answers confirmation prompts, either interactively or with `--yes`
struct Prompter {
    auto_yes: bool,
}

impl Prompter {
    fn confirm(&self, question: &str) -> Result<bool> {
        if self.auto_yes {
            ui::info_message(&format!("{question} yes (--yes)"));
            return Ok(true);
        }
        Ok(Confirm::new().with_prompt(question).default(true).interact()?)
    }
}

pub fn execute(cli: &Cli) -> Result<()> {
    let verbose = cli.verbose;
    let settings = Settings::load(cli)?;
    for source in &settings.sources {
        ui::verbose_message(verbose, &format!("Loaded configuration from {}", source.display()));
    }

    let history = RealHistorySource::open()
        .map_err(|e| CliError::Git(e).with_context("Failed to open git repository"))?;

    if settings.skip_pull {
        ui::verbose_message(verbose, "Skipping tag fetch");
    } else {
        fetch_tags(&history);
    }

    let executor = executor_for(&settings.model, &settings)?;
    let generator = AiEntryGenerator::new(executor, settings.language.clone());
    let store = FileStore;
    let updater = ChangelogUpdater::new(
        &history,
        &generator,
        &store,
        settings.changelog_path.clone(),
        &settings.changelog,
    );
    let prompter = Prompter { auto_yes: cli.yes };

    if cli.catch_up {
        catch_up(&updater, &prompter, verbose)?;
    }
    if let Some(tag) = &cli.tag {
        release(&updater, &prompter, tag, verbose)?;
    }
    Ok(())
}

/// Tag fetch problems never stop the run
fn fetch_tags(history: &RealHistorySource) {
    ui::status_message("Fetching tags from remote");
    match history.fetch_tags() {
        Ok(FetchOutcome::Fetched) => ui::success_message("Tags are up to date"),
        Ok(FetchOutcome::LocalOnly) => {
            ui::info_message("No remote tracking branch configured, using local tags")
        }
        Err(err) => ui::warning_message(&format!(
            "Could not fetch tags, continuing with local tags: {}",
            err.user_message()
        )),
    }
}

fn catch_up(updater: &ChangelogUpdater<'_>, prompter: &Prompter, verbose: bool) -> Result<()> {
    ui::section_header("Catch-up");
    let plan = updater.plan_catch_up()?;

    if plan.all_versions.is_empty() {
        ui::info_message("No tags found in this repository");
        return Ok(());
    }
    ui::verbose_message(verbose, &format!("{} tags in history", plan.all_versions.len()));
    if plan.is_complete() {
        ui::success_message(&format!(
            "All {} tags are already in {}",
            plan.all_versions.len(),
            updater.path().display()
        ));
        return Ok(());
    }

    ui::info_message(&format!(
        "{} tags are missing from {}:",
        plan.missing.len(),
        updater.path().display()
    ));
    for version in &plan.missing {
        println!("  - {version}");
    }
    if !prompter.confirm(&format!("Generate entries for {} tags?", plan.missing.len()))? {
        ui::warning_message("Catch-up cancelled");
        return Ok(());
    }

    let mut spinner: Option<GenerationProgress> = None;
    let report = updater.catch_up(&plan, |event| match event {
        CatchUpEvent::Started {
            index,
            total,
            version,
        } => spinner = Some(GenerationProgress::start_batch(index + 1, total, version)),
        CatchUpEvent::Generated { version } => {
            if let Some(progress) = spinner.take() {
                progress.succeed(version);
            }
        }
        CatchUpEvent::Skipped { version, error } => match spinner.take() {
            Some(progress) => progress.skip(version, &error.user_message()),
            None => ui::warning_message(&format!("Skipped {version}: {}", error.user_message())),
        },
    });

    if !report.skipped.is_empty() {
        let skipped: Vec<&str> = report.skipped.iter().map(|s| s.version.as_str()).collect();
        ui::warning_message(&format!(
            "Skipped {} tags: {}",
            skipped.len(),
            skipped.join(", ")
        ));
    }
    if !report.has_entries() {
        ui::error_message("No entries were generated");
        return Ok(());
    }

    // Generated oldest first; the document lists newest first
    let mut entries = report.entries;
    entries.reverse();

    ui::entry_preview("Generated entries", &join_entries(&entries));
    if !prompter.confirm(&format!("Add these entries to {}?", updater.path().display()))? {
        ui::warning_message("Changelog left unchanged");
        return Ok(());
    }

    let outcome = updater
        .apply_batch(&entries)
        .with_context(|| format!("Failed to update {}", updater.path().display()))?;
    report_outcome(&outcome, updater.path());
    ui::success_message(&format!(
        "Added {} entries to {}",
        entries.len(),
        updater.path().display()
    ));
    Ok(())
}

fn release(
    updater: &ChangelogUpdater<'_>,
    prompter: &Prompter,
    tag: &str,
    verbose: bool,
) -> Result<()> {
    ui::section_header(&format!("Release {tag}"));
    let plan = updater.plan_release(tag)?;
    describe_plan(&plan, verbose);

    if !plan.has_changes() {
        ui::info_message("No changes found, nothing to do");
        return Ok(());
    }

    let progress = GenerationProgress::start(tag);
    let entry = match updater.generate_release(&plan) {
        Ok(entry) => {
            progress.succeed(tag);
            entry
        }
        Err(err) => {
            progress.abort(tag);
            return Err(err.into());
        }
    };

    ui::entry_preview("Generated entry", &entry);
    if !prompter.confirm(&format!("Add this entry to {}?", updater.path().display()))? {
        ui::warning_message("Changelog left unchanged");
        return Ok(());
    }

    let outcome = updater
        .apply(&entry)
        .with_context(|| format!("Failed to update {}", updater.path().display()))?;
    report_outcome(&outcome, updater.path());
    ui::success_message(&format!("{} updated", updater.path().display()));

    ui::section_header("Next steps");
    for (number, step) in next_steps(updater.path(), tag).iter().enumerate() {
        ui::step_message(number + 1, step);
    }
    Ok(())
}

fn next_steps(path: &Path, tag: &str) -> Vec<String> {
    vec![
        format!("Review {}", path.display()),
        format!("git add {}", path.display()),
        format!("git commit -m \"docs: update changelog for {tag}\""),
        format!("git tag {tag}"),
        "git push && git push --tags".to_string(),
    ]
}

fn describe_plan(plan: &ReleasePlan, verbose: bool) {
    match &plan.previous {
        Some(previous) => ui::info_message(&format!("Changes since {previous}")),
        None => ui::info_message("No previous tag, treating this as the first release"),
    }
    if let Some(err) = &plan.staged_error {
        ui::warning_message(&format!(
            "Could not read staged changes: {}",
            err.user_message()
        ));
    }

    ui::verbose_message(verbose, &format!("Changes measured up to {}", plan.target));
    ui::verbose_message(
        verbose,
        &format!(
            "{} changed files, {} commits, {} staged files",
            plan.change_set.changed_files.len(),
            plan.change_set.commit_log.lines().count(),
            plan.change_set.staged_changes.len()
        ),
    );
    if plan.kind == ChangeSetKind::Initial {
        ui::verbose_message(verbose, "Writing an initial release entry");
    }
}

fn report_outcome(outcome: &MergeOutcome, path: &Path) {
    match outcome {
        MergeOutcome::Created => ui::info_message(&format!("Created {}", path.display())),
        MergeOutcome::Replaced(version) => ui::info_message(&format!(
            "Replaced the existing entry for {version}"
        )),
        MergeOutcome::Inserted | MergeOutcome::Appended => {}
    }
}

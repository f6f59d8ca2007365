use clap::{ArgGroup, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "changelog-update")]
#[command(
    author,
    version,
    about = "Generate CHANGELOG.md entries for git tags with an AI model"
)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .multiple(true)
        .args(["tag", "catch_up"])
))]
pub struct Cli {
    /// Version tag to write an entry for (e.g. v1.2.0)
    #[clap(short, long)]
    pub tag: Option<String>,

    /// Generate entries for every tag missing from the changelog
    #[clap(long, default_value_t = false)]
    pub catch_up: bool,

    /// AI model used to write entries (currently only claude)
    #[clap(short, long)]
    pub model: Option<String>,

    /// Path of the changelog file (defaults to CHANGELOG.md)
    #[clap(long)]
    pub changelog: Option<PathBuf>,

    /// Skip fetching tags from the remote
    #[clap(long, default_value_t = false)]
    pub skip_pull: bool,

    /// Accept all confirmation prompts
    #[clap(short, long, default_value_t = false)]
    pub yes: bool,

    /// Configuration file (defaults to .changelog-update.toml when present)
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output with additional information
    #[clap(short, long, default_value_t = false)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_tag_or_catch_up() {
        assert!(Cli::try_parse_from(["changelog-update"]).is_err());
        assert!(Cli::try_parse_from(["changelog-update", "--yes"]).is_err());
    }

    #[test]
    fn test_tag_and_catch_up_together() {
        let cli = Cli::try_parse_from(["changelog-update", "--tag", "v1.0.0", "--catch-up"]).unwrap();
        assert_eq!(cli.tag.as_deref(), Some("v1.0.0"));
        assert!(cli.catch_up);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "changelog-update",
            "--catch-up",
            "-m",
            "claude",
            "--changelog",
            "docs/CHANGES.md",
            "--skip-pull",
            "-y",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.tag, None);
        assert_eq!(cli.model.as_deref(), Some("claude"));
        assert_eq!(cli.changelog, Some(PathBuf::from("docs/CHANGES.md")));
        assert!(cli.skip_pull && cli.yes && cli.verbose);
    }
}

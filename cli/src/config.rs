use crate::cli::Cli;
use crate::error::{CliError, Result, ResultExt};
use changelog::ChangelogConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL: &str = "claude";
pub const DEFAULT_CHANGELOG: &str = "CHANGELOG.md";
pub const DEFAULT_LANGUAGE: &str = "English";
pub const PROJECT_CONFIG_FILE: &str = ".changelog-update.toml";
const GLOBAL_CONFIG_DIR: &str = "changelog-update";
const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// One configuration file as written on disk; every key is optional
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub model: Option<String>,
    pub changelog: Option<PathBuf>,
    pub language: Option<String>,
    pub skip_pull: Option<bool>,
    pub preamble: Option<String>,
    pub initial_threshold: Option<usize>,
    pub staged_initial_threshold: Option<usize>,
    pub executor: ExecutorSection,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutorSection {
    pub binary: Option<String>,
}

impl FileConfig {
    /// Keys set in `other` win over keys set in `self`
    pub fn layer(self, other: FileConfig) -> FileConfig {
        FileConfig {
            model: other.model.or(self.model),
            changelog: other.changelog.or(self.changelog),
            language: other.language.or(self.language),
            skip_pull: other.skip_pull.or(self.skip_pull),
            preamble: other.preamble.or(self.preamble),
            initial_threshold: other.initial_threshold.or(self.initial_threshold),
            staged_initial_threshold: other
                .staged_initial_threshold
                .or(self.staged_initial_threshold),
            executor: ExecutorSection {
                binary: other.executor.binary.or(self.executor.binary),
            },
        }
    }
}

/// Reads a configuration file; a missing file yields `None`
pub fn load_file(path: &Path) -> Result<Option<FileConfig>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    let config = toml::from_str(&content).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(config))
}

/// Location of the per-user configuration file
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(GLOBAL_CONFIG_DIR).join(GLOBAL_CONFIG_FILE))
}

/// Values given on the command line; they override every file
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub model: Option<String>,
    pub changelog: Option<PathBuf>,
    pub skip_pull: bool,
}

impl From<&Cli> for Overrides {
    fn from(cli: &Cli) -> Self {
        Self {
            model: cli.model.clone(),
            changelog: cli.changelog.clone(),
            skip_pull: cli.skip_pull,
        }
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub model: String,
    pub changelog_path: PathBuf,
    pub language: String,
    pub skip_pull: bool,
    pub executor_binary: Option<String>,
    pub changelog: ChangelogConfig,
    /// Files that contributed, lowest precedence first
    pub sources: Vec<PathBuf>,
}

impl Settings {
    /// Layers defaults, the global file, the project file (or `--config`) and the command line
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut layers = Vec::new();
        if let Some(global) = global_config_path() {
            layers.push((global, false));
        }
        match &cli.config {
            Some(explicit) => layers.push((explicit.clone(), true)),
            None => layers.push((PathBuf::from(PROJECT_CONFIG_FILE), false)),
        }
        Self::from_layers(&layers, Overrides::from(cli))
    }

    /// `layers` pairs each path with whether it must exist
    pub fn from_layers(layers: &[(PathBuf, bool)], overrides: Overrides) -> Result<Self> {
        let mut merged = FileConfig::default();
        let mut sources = Vec::new();
        for (path, required) in layers {
            match load_file(path)? {
                Some(file) => {
                    merged = merged.layer(file);
                    sources.push(path.clone());
                }
                None if *required => {
                    return Err(CliError::Other(format!(
                        "Configuration file not found: {}",
                        path.display()
                    )));
                }
                None => {}
            }
        }
        Ok(Self::resolve(merged, overrides, sources))
    }

    fn resolve(file: FileConfig, overrides: Overrides, sources: Vec<PathBuf>) -> Self {
        let defaults = ChangelogConfig::default();
        Self {
            model: overrides
                .model
                .or(file.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            changelog_path: overrides
                .changelog
                .or(file.changelog)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CHANGELOG)),
            language: file.language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            skip_pull: overrides.skip_pull || file.skip_pull.unwrap_or(false),
            executor_binary: file.executor.binary,
            changelog: ChangelogConfig {
                preamble: file.preamble.unwrap_or(defaults.preamble),
                initial_threshold: file.initial_threshold.unwrap_or(defaults.initial_threshold),
                staged_initial_threshold: file
                    .staged_initial_threshold
                    .unwrap_or(defaults.staged_initial_threshold),
            },
            sources,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::resolve(FileConfig::default(), Overrides::default(), Vec::new())
    }
}

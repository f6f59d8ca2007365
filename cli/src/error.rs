use changelog::ChangelogError;
use git::GitError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Changelog error: {0}")]
    Changelog(#[from] ChangelogError),

    #[error("Git error: {0}")]
    Git(#[from] GitError),

    #[error("Failed to parse configuration {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid model specified: {0}")]
    InvalidModel(String),

    #[error("Failed to run {binary}: {message}")]
    Executor { binary: String, message: String },

    #[error("Anyhow error: {0}")]
    AnyhowError(#[from] anyhow::Error),

    #[error("Dialoguer error: {0}")]
    DialoguerError(#[from] dialoguer::Error),

    #[error("{0}")]
    Other(String),

    #[error("{0}: {1}")]
    WithContext(String, Box<CliError>),
}

impl CliError {
    pub fn with_context<C: Into<String>>(self, context: C) -> Self {
        Self::WithContext(context.into(), Box::new(self))
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Io(err) => format!("I/O operation failed: {err}"),
            Self::Changelog(err) => err.user_message(),
            Self::Git(err) => err.user_message(),
            Self::Config { path, source } => {
                format!("Invalid configuration in {}: {source}", path.display())
            }
            Self::InvalidModel(model) => format!(
                "Invalid model specified: {model} (supported: {})",
                crate::executor::SUPPORTED_MODELS.join(", ")
            ),
            Self::Executor { binary, message } => format!("{binary} execution failed: {message}"),
            Self::AnyhowError(err) => format!("{err:#}"),
            Self::DialoguerError(err) => format!("UI interaction error: {err}"),
            Self::Other(msg) => msg.clone(),
            Self::WithContext(ctx, err) => format!("{ctx}: {}", err.user_message()),
        }
    }
}

/// Executor failures surface as generation errors inside the changelog pipeline
impl From<CliError> for ChangelogError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Changelog(inner) => inner,
            other => ChangelogError::Generation(other.user_message()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;

pub trait ResultExt<T, E> {
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: Into<CliError>,
{
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|err| {
            let cli_err: CliError = err.into();
            cli_err.with_context(context())
        })
    }
}

use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// Error context to enrich error messages
#[derive(Debug)]
pub struct ErrorContext {
    pub operation: String,
    pub version: Option<String>,
}

impl Display for ErrorContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Operation: {}", self.operation)?;
        if let Some(version) = &self.version {
            write!(f, " (version: {})", version)?;
        }
        Ok(())
    }
}

/// Errors that can occur when working with changelogs
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Failed to read or write changelog file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Git operation failed: {0}")]
    Git(String),

    #[error("Entry generation failed: {0}")]
    Generation(String),

    #[error("Generated entry for {0} is empty")]
    EmptyEntry(String),

    #[error("No entries to merge")]
    EmptyBatch,

    #[error("{0}: {1}")]
    WithContext(String, Box<ChangelogError>),

    #[error("{context}: {source}")]
    ContextualError {
        context: ErrorContext,
        source: Box<ChangelogError>,
    },
}

impl ChangelogError {
    #[must_use]
    pub fn with_context<C: Into<String>>(self, context: C) -> Self {
        Self::WithContext(context.into(), Box::new(self))
    }

    #[must_use]
    pub fn with_operation_context(
        self,
        operation: impl Into<String>,
        version: Option<impl Into<String>>,
    ) -> Self {
        Self::ContextualError {
            context: ErrorContext {
                operation: operation.into(),
                version: version.map(Into::into),
            },
            source: Box::new(self),
        }
    }

    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ReadError(e) => format!("File operation failed: {e}"),
            Self::Git(msg) => format!("Git operation failed: {msg}"),
            Self::Generation(msg) => format!("Entry generation failed: {msg}"),
            Self::EmptyEntry(version) => format!("Generated entry for {version} is empty"),
            Self::EmptyBatch => "No entries could be generated".to_string(),
            Self::WithContext(ctx, err) => format!("{ctx}: {}", err.user_message()),
            Self::ContextualError { context, source } => {
                format!("{}: {}", context, source.user_message())
            }
        }
    }
}

use crate::config::Settings;
use crate::error::{CliError, Result};
use std::io;
use std::process::Command;

/// Models that can write changelog entries
pub const SUPPORTED_MODELS: &[&str] = &["claude"];

const CLAUDE_BINARY: &str = "claude";

/// Runs a prompt through an AI model and returns its answer
pub trait AiExecutor {
    fn execute(&self, prompt: &str) -> Result<String>;
}

/// Calls the Claude CLI in print mode: `claude -p <prompt>`
#[derive(Debug, Clone)]
pub struct ClaudeExecutor {
    binary: String,
}

impl ClaudeExecutor {
    pub fn new() -> Self {
        Self::with_binary(CLAUDE_BINARY)
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for ClaudeExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl AiExecutor for ClaudeExecutor {
    fn execute(&self, prompt: &str) -> Result<String> {
        let output = match Command::new(&self.binary).arg("-p").arg(prompt).output() {
            Ok(output) => output,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(CliError::Executor {
                    binary: self.binary.clone(),
                    message: "command not found; is it installed and on PATH?".to_string(),
                });
            }
            Err(err) => {
                return Err(CliError::Executor {
                    binary: self.binary.clone(),
                    message: err.to_string(),
                });
            }
        };

        if !output.status.success() {
            return Err(CliError::Executor {
                binary: self.binary.clone(),
                message: format!(
                    "{}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Picks the executor for `model`; unknown models are rejected
pub fn executor_for(model: &str, settings: &Settings) -> Result<Box<dyn AiExecutor>> {
    match model {
        "claude" => {
            let executor = match &settings.executor_binary {
                Some(binary) => ClaudeExecutor::with_binary(binary.clone()),
                None => ClaudeExecutor::new(),
            };
            Ok(Box::new(executor))
        }
        other => Err(CliError::InvalidModel(other.to_string())),
    }
}

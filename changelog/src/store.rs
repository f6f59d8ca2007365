use crate::error::ChangelogError;
use crate::ports::ChangelogStore;
use crate::types::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Stores the changelog on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStore;

impl ChangelogStore for FileStore {
    fn read(&self, path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(ChangelogError::ReadError(err)
                .with_context(format!("Failed to read {}", path.display()))),
        }
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        fs::write(path, content).map_err(|err| {
            ChangelogError::ReadError(err).with_context(format!("Failed to write {}", path.display()))
        })
    }
}

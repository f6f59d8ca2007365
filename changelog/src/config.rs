/// Fixed header written when a changelog is created from scratch
pub const DEFAULT_PREAMBLE: &str = "# Changelog\n\n";

/// Configuration options for changelog merging and change-set classification
#[derive(Debug, Clone)]
pub struct ChangelogConfig {
    pub preamble: String,
    /// Committed change sets with more added files than this are initial releases
    pub initial_threshold: usize,
    /// Same gate for staged-only change sets
    pub staged_initial_threshold: usize,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            preamble: DEFAULT_PREAMBLE.to_string(),
            initial_threshold: 5,
            staged_initial_threshold: 3,
        }
    }
}

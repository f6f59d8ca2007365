use crate::executor::AiExecutor;
use crate::prompt::build_prompt;
use changelog::{EntryGenerator, EntryRequest};

/// Writes changelog entries by prompting an AI model
pub struct AiEntryGenerator {
    executor: Box<dyn AiExecutor>,
    language: String,
}

impl AiEntryGenerator {
    pub fn new(executor: Box<dyn AiExecutor>, language: impl Into<String>) -> Self {
        Self {
            executor,
            language: language.into(),
        }
    }
}

impl EntryGenerator for AiEntryGenerator {
    fn generate(&self, request: &EntryRequest) -> changelog::Result<String> {
        let prompt = build_prompt(request, &self.language);
        Ok(self.executor.execute(&prompt)?)
    }
}

pub mod finance;

use async_trait::async_trait;

use crate::error::LlmError;
use crate::llm::TextStream;

pub use finance::{AssistantConfig, FinanceAssistant, FinanceAssistantFactory};

/// A conversational assistant that answers a prompt as a stream of text fragments.
#[async_trait]
pub trait Assistant: Send + Sync {
    fn name(&self) -> &str;

    async fn chat(&self, prompt: &str) -> Result<TextStream, LlmError>;
}

/// Builds a fresh assistant for every request.
pub trait AssistantFactory: Send + Sync {
    fn create(&self) -> Result<Box<dyn Assistant>, LlmError>;
}

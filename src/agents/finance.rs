use async_trait::async_trait;
use tracing::info;

use super::{Assistant, AssistantFactory};
use crate::config::AppConfig;
use crate::error::LlmError;
use crate::llm::{LLMClient, MarketDataTools, TextStream};

/// Everything needed to stand up a finance assistant.
#[derive(Clone, Debug)]
pub struct AssistantConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub tools: MarketDataTools,
}

impl From<&AppConfig> for AssistantConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            model: config.llm.model.clone(),
            api_key: config.llm.api_key.clone(),
            base_url: config.llm.base_url.clone(),
            tools: config.tools.clone(),
        }
    }
}

pub struct FinanceAssistant {
    llm: LLMClient,
    system_prompt: String,
}

impl FinanceAssistant {
    pub fn new(config: &AssistantConfig) -> Self {
        let llm = LLMClient::new(
            config.api_key.clone().unwrap_or_default(),
            config.base_url.clone(),
            config.model.clone(),
        );
        Self {
            llm,
            system_prompt: system_prompt(&config.tools),
        }
    }
}

/// Analyst persona plus the focus areas switched on in config. No data is attached.
pub fn system_prompt(tools: &MarketDataTools) -> String {
    let mut prompt = String::from(
        "You are a Financial Analyst AI specializing in equity research.\n\
         Answer the user's request about the given stock clearly and concisely.\n",
    );

    let enabled = tools.enabled();
    if enabled.is_empty() {
        prompt.push_str("Rely on your general market knowledge.\n");
    } else {
        prompt.push_str("Cover the following areas where relevant:\n");
        for name in enabled {
            prompt.push_str("- ");
            prompt.push_str(name);
            prompt.push('\n');
        }
    }

    prompt.push_str(
        "No live market data is attached to this conversation. Do not state specific prices, \
         ratios or figures as current facts; mark any figure you recall as approximate and dated.\n",
    );
    prompt.push_str("If you return structured data, output a single valid JSON object and nothing else.\n");
    prompt
}

#[async_trait]
impl Assistant for FinanceAssistant {
    fn name(&self) -> &str {
        "Finance-Assistant"
    }

    async fn chat(&self, prompt: &str) -> Result<TextStream, LlmError> {
        info!("🤖 [AGENT] Sending request to {}...", self.name());
        self.llm.chat_stream(&self.system_prompt, prompt).await
    }
}

/// Production factory: a new OpenAI-backed assistant per call.
#[derive(Clone, Debug)]
pub struct FinanceAssistantFactory {
    config: AssistantConfig,
}

impl FinanceAssistantFactory {
    pub fn new(config: AssistantConfig) -> Self {
        Self { config }
    }
}

impl AssistantFactory for FinanceAssistantFactory {
    fn create(&self) -> Result<Box<dyn Assistant>, LlmError> {
        Ok(Box::new(FinanceAssistant::new(&self.config)))
    }
}

pub mod tools;

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use futures_util::stream::{BoxStream, StreamExt};
use tracing::info;

use crate::error::LlmError;

pub use tools::MarketDataTools;

/// Lazy, finite sequence of text fragments from the model.
pub type TextStream = BoxStream<'static, Result<String, LlmError>>;

#[derive(Clone)]
pub struct LLMClient {
    pub client: Client<OpenAIConfig>,
    pub model: String,
}

impl LLMClient {
    pub fn new(api_key: String, base_url: Option<String>, model: String) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(url) = base_url {
            config = config.with_api_base(url);
        }
        let client = Client::with_config(config);
        Self { client, model }
    }

    /// Start a streaming chat completion. Each item is the text content of one delta.
    pub async fn chat_stream(&self, system_prompt: &str, user_input: &str) -> Result<TextStream, LlmError> {
        info!("🤖 Sending streaming request to LLM (Model: {})...", self.model);

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .stream(true)
            .messages([
                ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessageArgs::default()
                        .content(system_prompt)
                        .build()?,
                ),
                ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessageArgs::default()
                        .content(user_input)
                        .build()?,
                ),
            ])
            .build()?;

        let stream = self.client.chat().create_stream(request).await?;

        Ok(stream
            .map(|item| {
                item.map(|response| {
                    response
                        .choices
                        .into_iter()
                        .filter_map(|choice| choice.delta.content)
                        .collect::<String>()
                })
                .map_err(LlmError::from)
            })
            .boxed())
    }
}

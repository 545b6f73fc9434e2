//! Analysis dispatcher: prompt in, parsed analysis out.
//!
//! One linear pipeline per call: build a fresh assistant, stream its answer,
//! concatenate the fragments, then parse. No retries and no backoff.

use futures_util::StreamExt;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::agents::AssistantFactory;
use crate::analysis::Analysis;
use crate::error::{AnalysisError, LlmError};
use crate::llm::TextStream;

/// What to do when the assistant's stream fails part-way through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamErrorPolicy {
    /// Log the error and keep whatever text arrived before it.
    /// The caller cannot tell a truncated answer from a complete one.
    #[default]
    ReturnPartial,
    /// Abort the request with the stream error.
    Fail,
}

#[derive(Clone)]
pub struct AnalysisDispatcher {
    factory: Arc<dyn AssistantFactory>,
    policy: StreamErrorPolicy,
    timeout: Option<Duration>,
}

impl AnalysisDispatcher {
    pub fn new(factory: Arc<dyn AssistantFactory>) -> Self {
        Self {
            factory,
            policy: StreamErrorPolicy::default(),
            timeout: None,
        }
    }

    pub fn with_policy(mut self, policy: StreamErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn policy(&self) -> StreamErrorPolicy {
        self.policy
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub async fn dispatch(&self, prompt: &str) -> Result<Analysis, AnalysisError> {
        let assistant = self.factory.create()?;
        info!("📨 [DISPATCH] {} <- \"{}\"", assistant.name(), prompt);

        let stream = assistant.chat(prompt).await?;
        let raw = collect_response(stream, self.policy, self.timeout).await?;

        info!("📨 [DISPATCH] Collected {} bytes from {}", raw.len(), assistant.name());
        parse_analysis(&raw)
    }
}

/// Concatenate non-empty fragments in arrival order.
///
/// Under `ReturnPartial` a stream error or an expired deadline ends collection
/// and the text gathered so far is returned.
pub async fn collect_response(
    mut stream: TextStream,
    policy: StreamErrorPolicy,
    timeout: Option<Duration>,
) -> Result<String, LlmError> {
    // A deadline past the clock's range is no deadline at all
    let deadline = timeout.and_then(|t| Instant::now().checked_add(t).map(|at| (at, t.as_secs())));
    let mut collected = String::new();

    loop {
        let next = match deadline {
            Some((at, secs)) => match tokio::time::timeout_at(at, stream.next()).await {
                Ok(item) => item,
                Err(_) => Some(Err(LlmError::Timeout { secs })),
            },
            None => stream.next().await,
        };

        match next {
            None => break,
            Some(Ok(chunk)) => {
                if !chunk.is_empty() {
                    collected.push_str(&chunk);
                }
            }
            Some(Err(e)) => match policy {
                StreamErrorPolicy::ReturnPartial => {
                    warn!(
                        "⚠️ [DISPATCH] Error collecting response, returning {} bytes collected so far: {}",
                        collected.len(),
                        e
                    );
                    break;
                }
                StreamErrorPolicy::Fail => return Err(e),
            },
        }
    }

    Ok(collected)
}

/// Empty (after trimming) is an error; otherwise JSON if it parses, raw text if not.
pub fn parse_analysis(raw: &str) -> Result<Analysis, AnalysisError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }
    Ok(Analysis::from_text(trimmed))
}

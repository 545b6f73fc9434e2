//! Unit tests for response collection, parsing and dispatch.

#[cfg(test)]
mod dispatcher_tests {
    use crate::agents::finance::system_prompt;
    use crate::agents::{Assistant, AssistantFactory};
    use crate::analysis::Analysis;
    use crate::error::{AnalysisError, LlmError};
    use crate::llm::{MarketDataTools, TextStream};
    use crate::services::dispatcher::*;
    use async_trait::async_trait;
    use futures_util::stream::{self, StreamExt};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    enum Step {
        Chunk(&'static str),
        Fail(&'static str),
    }

    fn scripted(steps: Vec<Step>) -> TextStream {
        stream::iter(steps.into_iter().map(|step| match step {
            Step::Chunk(text) => Ok(text.to_string()),
            Step::Fail(msg) => Err(LlmError::Stream(msg.to_string())),
        }))
        .boxed()
    }

    fn chunks(items: &[&'static str]) -> TextStream {
        scripted(items.iter().map(|c| Step::Chunk(*c)).collect())
    }

    struct ScriptedAssistant {
        chunks: Vec<&'static str>,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Assistant for ScriptedAssistant {
        fn name(&self) -> &str {
            "Scripted-Assistant"
        }

        async fn chat(&self, prompt: &str) -> Result<TextStream, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(chunks(&self.chunks))
        }
    }

    struct ScriptedFactory {
        chunks: Vec<&'static str>,
        created: AtomicUsize,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedFactory {
        fn new(chunks: Vec<&'static str>) -> Self {
            Self {
                chunks,
                created: AtomicUsize::new(0),
                prompts: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl AssistantFactory for ScriptedFactory {
        fn create(&self) -> Result<Box<dyn Assistant>, LlmError> {
            self.created.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(ScriptedAssistant {
                chunks: self.chunks.clone(),
                prompts: self.prompts.clone(),
            }))
        }
    }

    struct BrokenFactory;

    impl AssistantFactory for BrokenFactory {
        fn create(&self) -> Result<Box<dyn Assistant>, LlmError> {
            Err(LlmError::Stream("connection refused".to_string()))
        }
    }

    // ============= collect_response Tests =============

    #[tokio::test]
    async fn test_collect_concatenates_in_order() {
        let text = collect_response(chunks(&["{\"a\":", "1}"]), StreamErrorPolicy::ReturnPartial, None)
            .await
            .unwrap();
        assert_eq!(text, "{\"a\":1}");
    }

    #[tokio::test]
    async fn test_collect_skips_empty_chunks() {
        let text = collect_response(chunks(&["", "abc", "", "def"]), StreamErrorPolicy::ReturnPartial, None)
            .await
            .unwrap();
        assert_eq!(text, "abcdef");
    }

    #[tokio::test]
    async fn test_collect_returns_partial_on_error() {
        let stream = scripted(vec![Step::Chunk("The outlook "), Step::Fail("reset"), Step::Chunk("never seen")]);
        let text = collect_response(stream, StreamErrorPolicy::ReturnPartial, None)
            .await
            .unwrap();
        assert_eq!(text, "The outlook ");
    }

    #[tokio::test]
    async fn test_collect_fail_policy_propagates_error() {
        let stream = scripted(vec![Step::Chunk("The outlook "), Step::Fail("reset")]);
        let err = collect_response(stream, StreamErrorPolicy::Fail, None)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Stream(ref msg) if msg == "reset"));
    }

    #[tokio::test]
    async fn test_collect_deadline_returns_partial() {
        let stream = chunks(&["partial"]).chain(stream::pending()).boxed();
        let text = collect_response(stream, StreamErrorPolicy::ReturnPartial, Some(Duration::from_millis(50)))
            .await
            .unwrap();
        assert_eq!(text, "partial");
    }

    #[tokio::test]
    async fn test_collect_deadline_fails_under_fail_policy() {
        let stream = chunks(&["partial"]).chain(stream::pending()).boxed();
        let err = collect_response(stream, StreamErrorPolicy::Fail, Some(Duration::from_millis(50)))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_collect_with_unrepresentable_deadline_waits_for_stream() {
        let text = collect_response(chunks(&["still ", "here"]), StreamErrorPolicy::Fail, Some(Duration::MAX))
            .await
            .unwrap();
        assert_eq!(text, "still here");

        let huge = Duration::from_secs(u64::MAX);
        let text = collect_response(chunks(&["ok"]), StreamErrorPolicy::ReturnPartial, Some(huge))
            .await
            .unwrap();
        assert_eq!(text, "ok");
    }

    // ============= parse_analysis Tests =============

    #[test]
    fn test_parse_json_object() {
        let analysis = parse_analysis("  {\"a\": 1}\n").unwrap();
        assert_eq!(analysis, Analysis::Structured(json!({"a": 1})));
    }

    #[test]
    fn test_parse_plain_text_is_trimmed() {
        let analysis = parse_analysis("\n  not json  \n").unwrap();
        assert_eq!(analysis, Analysis::Text("not json".to_string()));
    }

    #[test]
    fn test_parse_whitespace_only_is_empty_response() {
        let err = parse_analysis(" \n\t ").unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyResponse));
        assert_eq!(err.to_string(), "Failed to generate analysis");
    }

    // ============= dispatch Tests =============

    #[tokio::test]
    async fn test_dispatch_builds_fresh_assistant_per_call() {
        let factory = Arc::new(ScriptedFactory::new(vec!["not json"]));
        let dispatcher = AnalysisDispatcher::new(factory.clone());

        let first = dispatcher.dispatch("Evaluate risks for AAPL stock").await.unwrap();
        let second = dispatcher.dispatch("Compare AAPL stock with its peers").await.unwrap();

        assert_eq!(first, Analysis::Text("not json".to_string()));
        assert_eq!(second, first);
        assert_eq!(factory.created.load(Ordering::SeqCst), 2);
        assert_eq!(
            *factory.prompts.lock().unwrap(),
            vec![
                "Evaluate risks for AAPL stock".to_string(),
                "Compare AAPL stock with its peers".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_dispatch_empty_stream_is_empty_response() {
        let dispatcher = AnalysisDispatcher::new(Arc::new(ScriptedFactory::new(vec![])));
        let err = dispatcher.dispatch("Analyze AAPL stock").await.unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_dispatch_factory_failure_surfaces_message() {
        let dispatcher = AnalysisDispatcher::new(Arc::new(BrokenFactory));
        let err = dispatcher.dispatch("Analyze AAPL stock").await.unwrap_err();
        assert_eq!(err.to_string(), "Stream interrupted: connection refused");
    }

    #[test]
    fn test_dispatcher_builder() {
        let dispatcher = AnalysisDispatcher::new(Arc::new(BrokenFactory)).with_policy(StreamErrorPolicy::Fail);
        assert_eq!(dispatcher.policy(), StreamErrorPolicy::Fail);
        assert_eq!(dispatcher.timeout(), None);
    }

    // ============= System Prompt Tests =============

    #[test]
    fn test_system_prompt_lists_enabled_tools() {
        let mut tools = MarketDataTools::all();
        tools.company_news = false;
        let prompt = system_prompt(&tools);

        assert!(prompt.contains("Cover the following areas where relevant:"));
        assert!(prompt.contains("- current stock price"));
        assert!(prompt.contains("- technical indicators"));
        assert!(!prompt.contains("company news"));
        assert!(prompt.contains("No live market data is attached"));
        assert!(!prompt.contains("Base your analysis on the following market data"));
    }

    #[test]
    fn test_system_prompt_without_tools() {
        let prompt = system_prompt(&MarketDataTools::none());
        assert!(prompt.contains("Rely on your general market knowledge"));
        assert!(prompt.contains("No live market data is attached"));
        assert!(!prompt.contains("- "));
    }
}

//! Stock Analyst - LLM-backed stock analysis over HTTP
//!
//! This library maps an analysis request to a prompt, streams the answer from
//! a finance assistant and returns it as JSON when it parses, text otherwise.

pub mod agents;
pub mod analysis;
pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod llm;
pub mod services;

// Re-export commonly used types
pub use analysis::{Analysis, AnalysisRequest, AnalysisResponse, AnalysisType};
pub use api::AppState;
pub use config::AppConfig;
pub use services::{AnalysisDispatcher, StreamErrorPolicy};

//! Request/response types for stock analysis
//!
//! `AnalysisType` is the closed set of analyses callers can ask for; anything
//! outside it fails deserialization and never reaches the dispatcher.

pub mod prompts;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub use prompts::{build_prompt, build_prompt_for_tag, generic_prompt};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    #[default]
    Technical,
    Fundamental,
    Sentiment,
    Comparative,
    NewsBased,
    Risk,
}

impl AnalysisType {
    pub const ALL: [AnalysisType; 6] = [
        AnalysisType::Technical,
        AnalysisType::Fundamental,
        AnalysisType::Sentiment,
        AnalysisType::Comparative,
        AnalysisType::NewsBased,
        AnalysisType::Risk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Technical => "technical",
            AnalysisType::Fundamental => "fundamental",
            AnalysisType::Sentiment => "sentiment",
            AnalysisType::Comparative => "comparative",
            AnalysisType::NewsBased => "news_based",
            AnalysisType::Risk => "risk",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisType::Technical => "Technical Analysis",
            AnalysisType::Fundamental => "Fundamental Analysis",
            AnalysisType::Sentiment => "Sentiment Analysis",
            AnalysisType::Comparative => "Comparative Analysis",
            AnalysisType::NewsBased => "News Analysis",
            AnalysisType::Risk => "Risk Analysis",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AnalysisType::Technical => "Analyze price patterns and technical indicators",
            AnalysisType::Fundamental => "Evaluate financial statements and economic indicators",
            AnalysisType::Sentiment => "Analyze market sentiment and social media trends",
            AnalysisType::Comparative => "Compare with sector peers and competitors",
            AnalysisType::NewsBased => "Analyze recent news and their impact",
            AnalysisType::Risk => "Evaluate volatility and potential risks",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnalysisType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown analysis type: {}", s))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub stock_symbol: String,
    #[serde(default)]
    pub analysis_type: AnalysisType,
}

/// Assistant output: parsed JSON when it parses, the raw text otherwise.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Analysis {
    Structured(Value),
    Text(String),
}

impl Analysis {
    /// Strict JSON parse of `text`, falling back to the text itself.
    pub fn from_text(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Analysis::Structured(value),
            Err(_) => Analysis::Text(text.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalysisResponse {
    pub stock_symbol: String,
    pub analysis: Analysis,
}

/// Catalog entry describing one analysis type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnalysisOption {
    pub value: AnalysisType,
    pub label: &'static str,
    pub description: &'static str,
}

pub fn analysis_options() -> Vec<AnalysisOption> {
    AnalysisType::ALL
        .into_iter()
        .map(|t| AnalysisOption {
            value: t,
            label: t.label(),
            description: t.description(),
        })
        .collect()
}

use super::AnalysisType;

/// Instruction sent to the assistant for a typed request.
pub fn build_prompt(stock_symbol: &str, analysis_type: AnalysisType) -> String {
    match analysis_type {
        AnalysisType::Technical => format!("Perform technical analysis on {} stock", stock_symbol),
        AnalysisType::Fundamental => format!("Provide fundamental analysis for {} stock", stock_symbol),
        AnalysisType::Sentiment => format!("Analyze market sentiment for {} stock", stock_symbol),
        AnalysisType::Comparative => format!("Compare {} stock with its peers", stock_symbol),
        AnalysisType::NewsBased => format!("Analyze recent news impact on {} stock", stock_symbol),
        AnalysisType::Risk => format!("Evaluate risks for {} stock", stock_symbol),
    }
}

/// Same as [`build_prompt`] for an untyped tag; unknown tags get the generic instruction.
pub fn build_prompt_for_tag(stock_symbol: &str, tag: &str) -> String {
    match tag.parse::<AnalysisType>() {
        Ok(analysis_type) => build_prompt(stock_symbol, analysis_type),
        Err(_) => generic_prompt(stock_symbol),
    }
}

pub fn generic_prompt(stock_symbol: &str) -> String {
    format!("Analyze {} stock", stock_symbol)
}

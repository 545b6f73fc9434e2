use serde::Deserialize;

/// Market-data capabilities the assistant is allowed to draw on.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MarketDataTools {
    pub stock_price: bool,
    pub analyst_recommendations: bool,
    pub stock_fundamentals: bool,
    pub company_news: bool,
    pub key_financial_ratios: bool,
    pub income_statements: bool,
    pub technical_indicators: bool,
}

impl Default for MarketDataTools {
    fn default() -> Self {
        Self::all()
    }
}

impl MarketDataTools {
    pub fn all() -> Self {
        Self {
            stock_price: true,
            analyst_recommendations: true,
            stock_fundamentals: true,
            company_news: true,
            key_financial_ratios: true,
            income_statements: true,
            technical_indicators: true,
        }
    }

    pub fn none() -> Self {
        Self {
            stock_price: false,
            analyst_recommendations: false,
            stock_fundamentals: false,
            company_news: false,
            key_financial_ratios: false,
            income_statements: false,
            technical_indicators: false,
        }
    }

    /// Human-readable names of the enabled capabilities, in a fixed order.
    pub fn enabled(&self) -> Vec<&'static str> {
        [
            (self.stock_price, "current stock price"),
            (self.analyst_recommendations, "analyst recommendations"),
            (self.stock_fundamentals, "stock fundamentals"),
            (self.company_news, "company news"),
            (self.key_financial_ratios, "key financial ratios"),
            (self.income_statements, "income statements"),
            (self.technical_indicators, "technical indicators"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect()
    }
}

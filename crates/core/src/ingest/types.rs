use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Statements-and-news bundle for one symbol.
///
/// The three statement tables (line item x period) are passed through to the
/// caller exactly as the provider shipped them; no scoring logic reads them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyStatements {
    #[serde(default)]
    pub news: Vec<NewsHeadline>,
    #[serde(default)]
    pub balance_sheet: Value,
    #[serde(default)]
    pub cashflow: Value,
    #[serde(default)]
    pub income_statement: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsHeadline {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_partial_payloads() {
        let v = json!({
            "news": [{"title": "Q4 results"}],
            "balance_sheet": {"Total Assets": {"2025-03-31": 1.0e12}}
        });
        let s: CompanyStatements = serde_json::from_value(v).unwrap();
        assert_eq!(s.news.len(), 1);
        assert_eq!(s.news[0].title.as_deref(), Some("Q4 results"));
        assert!(s.balance_sheet.is_object());
        assert!(s.cashflow.is_null());
        assert!(s.income_statement.is_null());
    }

    #[test]
    fn default_is_the_empty_bundle() {
        let s = CompanyStatements::default();
        assert!(s.news.is_empty());
        assert!(s.balance_sheet.is_null());
    }
}

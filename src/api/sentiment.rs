//! Sentiment analysis: request building, response projection, layout.
//!
//! This endpoint reports failure through an `error` field in an otherwise
//! successful body, and the page skips silently on an empty symbol instead
//! of raising a validation error. Both quirks are deliberate and preserved.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::FetchError;
use crate::view::{Node, Render};

/// Key inside `fundamental_analysis` holding the Good/Bad/Neutral verdict.
pub const OVERALL_KEY: &str = "Overall Classification";

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentRequest {
    pub symbol: String,
}

/// None on an empty symbol: the page treats that as a silent no-op, not a
/// failure.
pub fn build_request(symbol_raw: &str) -> Option<SentimentRequest> {
    let symbol = symbol_raw.trim();
    if symbol.is_empty() {
        return None;
    }
    Some(SentimentRequest {
        symbol: symbol.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub sentiment: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SentimentResult {
    pub stock: String,
    /// Absent when the fundamentals lookup failed server-side; the rest of
    /// the page still renders.
    pub fundamental_analysis: Option<BTreeMap<String, String>>,
    pub overall_sentiment: String,
    #[serde(default)]
    pub articles: Vec<Article>,
}

pub fn project(raw: Value) -> Result<SentimentResult, FetchError> {
    if let Some(msg) = raw.get("error").and_then(Value::as_str) {
        return Err(FetchError::Application(msg.to_string()));
    }
    serde_json::from_value(raw).map_err(|e| FetchError::Malformed(e.to_string()))
}

impl SentimentResult {
    pub fn classification(&self) -> Option<&str> {
        self.fundamental_analysis
            .as_ref()
            .and_then(|m| m.get(OVERALL_KEY))
            .map(String::as_str)
    }
}

impl Render for SentimentResult {
    fn render(&self) -> Vec<Node> {
        let mut nodes = vec![
            Node::Heading(format!("Stock: {}", self.stock)),
            Node::Heading("Fundamental Analysis".to_string()),
        ];
        match &self.fundamental_analysis {
            Some(metrics) => {
                for (metric, value) in metrics {
                    if metric != OVERALL_KEY {
                        nodes.push(Node::field(metric, value));
                    }
                }
                if let Some(overall) = self.classification() {
                    nodes.push(Node::field("Overall Fundamentals", overall));
                }
            }
            None => nodes.push(Node::Line("No fundamental data available.".to_string())),
        }
        nodes.push(Node::field(
            "Overall Sentiment of the News",
            &self.overall_sentiment,
        ));
        nodes.push(Node::Heading("News Articles".to_string()));
        if self.articles.is_empty() {
            nodes.push(Node::Line("No news articles available.".to_string()));
        } else {
            for article in &self.articles {
                nodes.push(Node::Line(article.title.clone()));
                nodes.push(Node::field("Link", &article.link));
                nodes.push(Node::field("Sentiment", &article.sentiment));
            }
        }
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::flatten;
    use serde_json::json;

    #[test]
    fn test_build_request_empty_is_none() {
        assert!(build_request("").is_none());
        assert!(build_request("   ").is_none());
        assert_eq!(
            build_request(" RELIANCE.NS ").unwrap().symbol,
            "RELIANCE.NS"
        );
    }

    #[test]
    fn test_project_error_body_even_on_success_status() {
        let err = project(json!({"error": "no data"})).unwrap_err();
        assert!(matches!(err, FetchError::Application(_)));
        assert_eq!(err.to_string(), "no data");
    }

    #[test]
    fn test_project_full_body() {
        let result = project(json!({
            "stock": "RELIANCE.NS",
            "fundamental_analysis": {
                "Debt-to-Equity": "Good",
                "P/E Ratio": "Neutral",
                "Overall Classification": "Good"
            },
            "overall_sentiment": "Positive",
            "articles": [
                {"title": "Quarterly results beat estimates", "link": "http://a", "sentiment": "Positive"}
            ]
        }))
        .unwrap();
        assert_eq!(result.classification(), Some("Good"));
        let lines = flatten(&result.render());
        assert!(lines.contains(&"Debt-to-Equity: Good".to_string()));
        assert!(lines.contains(&"Overall Fundamentals: Good".to_string()));
        assert!(lines.contains(&"Sentiment: Positive".to_string()));
        // The reserved key is not repeated as a plain metric row.
        assert!(!lines.contains(&"Overall Classification: Good".to_string()));
    }

    #[test]
    fn test_missing_fundamentals_renders_other_sections() {
        let result = project(json!({
            "stock": "XYZ",
            "overall_sentiment": "Neutral",
            "articles": []
        }))
        .unwrap();
        assert!(result.fundamental_analysis.is_none());
        let lines = flatten(&result.render());
        assert!(lines.contains(&"No fundamental data available.".to_string()));
        assert!(lines.contains(&"Overall Sentiment of the News: Neutral".to_string()));
        assert!(lines.contains(&"No news articles available.".to_string()));
    }
}

//! Loss averaging: request building, response projection, layout.
//!
//! The recommendation fields come back as an all-or-nothing group; they are
//! modeled as one sum type rather than three independently optional fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FetchError;
use crate::view::{Node, Render};

const INVALID_INPUT: &str =
    "All inputs must be positive values and stock symbol cannot be empty.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LossAveragingRequest {
    pub stock_symbol: String,
    pub avg_price: f64,
    pub num_shares: u64,
    pub invest_amount: f64,
}

/// Any violation yields the one combined message; there is no per-field
/// reporting on this page.
pub fn build_request(
    symbol_raw: &str,
    avg_price_raw: &str,
    num_shares_raw: &str,
    invest_amount_raw: &str,
) -> Result<LossAveragingRequest, FetchError> {
    let stock_symbol = symbol_raw.trim();
    let avg_price: Option<f64> = avg_price_raw.trim().parse().ok();
    let num_shares: Option<u64> = num_shares_raw.trim().parse().ok();
    let invest_amount: Option<f64> = invest_amount_raw.trim().parse().ok();

    match (avg_price, num_shares, invest_amount) {
        (Some(avg_price), Some(num_shares), Some(invest_amount))
            if !stock_symbol.is_empty()
                && avg_price.is_finite()
                && avg_price > 0.0
                && num_shares > 0
                && invest_amount.is_finite()
                && invest_amount > 0.0 =>
        {
            Ok(LossAveragingRequest {
                stock_symbol: stock_symbol.to_string(),
                avg_price,
                num_shares,
                invest_amount,
            })
        }
        _ => Err(FetchError::validation(INVALID_INPUT)),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AveragingPlan {
    NotRecommended,
    Recommended {
        additional_shares: u64,
        new_avg_price: f64,
        total_shares: u64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LossAveragingResult {
    pub current_price: f64,
    pub percentage_loss: f64,
    pub amount_loss: f64,
    pub plan: AveragingPlan,
    /// Server-side summary text, shown when present.
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Wire {
    current_price: Option<f64>,
    percentage_loss: Option<f64>,
    amount_loss: Option<f64>,
    additional_shares: Option<u64>,
    new_avg_price: Option<f64>,
    total_shares: Option<u64>,
    message: Option<String>,
}

pub fn project(raw: Value) -> Result<LossAveragingResult, FetchError> {
    let wire: Wire =
        serde_json::from_value(raw).map_err(|e| FetchError::Malformed(e.to_string()))?;

    let (current_price, percentage_loss, amount_loss) =
        match (wire.current_price, wire.percentage_loss, wire.amount_loss) {
            (Some(c), Some(p), Some(a)) => (c, p, a),
            // Some failure bodies carry only a message (e.g. the investment
            // amount buys zero shares); surface that text instead of a
            // generic parse error.
            _ => {
                return Err(match wire.message {
                    Some(msg) => FetchError::Application(msg),
                    None => FetchError::Malformed("missing required loss fields".to_string()),
                })
            }
        };

    let plan = match (wire.additional_shares, wire.new_avg_price, wire.total_shares) {
        (Some(additional_shares), Some(new_avg_price), Some(total_shares)) => {
            AveragingPlan::Recommended {
                additional_shares,
                new_avg_price,
                total_shares,
            }
        }
        (None, None, None) => AveragingPlan::NotRecommended,
        _ => {
            return Err(FetchError::Malformed(
                "torn recommendation field group".to_string(),
            ))
        }
    };

    Ok(LossAveragingResult {
        current_price,
        percentage_loss,
        amount_loss,
        plan,
        message: wire.message,
    })
}

impl Render for LossAveragingResult {
    fn render(&self) -> Vec<Node> {
        let mut nodes = vec![
            Node::field("Current Market Price of the Stock", self.current_price),
            Node::field("Percentage of Loss (%)", self.percentage_loss),
            Node::field("Amount of Loss", self.amount_loss),
        ];
        if let AveragingPlan::Recommended {
            additional_shares,
            new_avg_price,
            total_shares,
        } = &self.plan
        {
            nodes.push(Node::field("Additional Shares You Can Buy", additional_shares));
            nodes.push(Node::field("New Average Price", new_avg_price));
            nodes.push(Node::field("Total Shares After Purchase", total_shares));
        }
        if let Some(message) = &self.message {
            nodes.push(Node::Line(message.clone()));
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
    fn test_build_request_valid() {
        let req = build_request("XYZ", "100", "10", "500").unwrap();
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "stock_symbol": "XYZ",
                "avg_price": 100.0,
                "num_shares": 10,
                "invest_amount": 500.0
            })
        );
    }

    #[test]
    fn test_build_request_combined_message() {
        let cases = [
            ("", "100", "10", "500"),
            ("XYZ", "0", "10", "500"),
            ("XYZ", "100", "-3", "500"),
            ("XYZ", "100", "10", "abc"),
            ("XYZ", "100", "0", "500"),
        ];
        for (s, a, n, i) in cases {
            let err = build_request(s, a, n, i).unwrap_err();
            assert_eq!(err.to_string(), INVALID_INPUT);
        }
    }

    #[test]
    fn test_project_with_recommendation() {
        let result = project(json!({
            "current_price": 90.0,
            "percentage_loss": 10.0,
            "amount_loss": 1000.0,
            "additional_shares": 5,
            "new_avg_price": 95.0,
            "total_shares": 15
        }))
        .unwrap();
        assert_eq!(
            result.plan,
            AveragingPlan::Recommended {
                additional_shares: 5,
                new_avg_price: 95.0,
                total_shares: 15
            }
        );
        let lines = flatten(&result.render());
        assert_eq!(lines.len(), 6);
        assert!(lines.contains(&"Additional Shares You Can Buy: 5".to_string()));
        assert!(lines.contains(&"New Average Price: 95".to_string()));
        assert!(lines.contains(&"Total Shares After Purchase: 15".to_string()));
    }

    #[test]
    fn test_project_without_recommendation() {
        let result = project(json!({
            "current_price": 95.0,
            "percentage_loss": 5.0,
            "amount_loss": 500.0
        }))
        .unwrap();
        assert_eq!(result.plan, AveragingPlan::NotRecommended);
        let lines = flatten(&result.render());
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_project_torn_group_is_malformed() {
        let err = project(json!({
            "current_price": 90.0,
            "percentage_loss": 10.0,
            "amount_loss": 1000.0,
            "additional_shares": 5
        }))
        .unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn test_project_message_only_body() {
        let err = project(json!({
            "message": "Investment amount is too low to buy any shares.",
            "current_price": 90.0
        }))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Investment amount is too low to buy any shares."
        );
    }
}

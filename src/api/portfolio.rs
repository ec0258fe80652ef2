//! Portfolio optimization: request building, response projection, layout.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::FetchError;
use crate::view::{Node, Render, Slice};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioRequest {
    pub stocks: Vec<String>,
    pub investment: f64,
}

/// Split the symbol list on commas, trim, and require a positive amount.
pub fn build_request(stocks_raw: &str, investment_raw: &str) -> Result<PortfolioRequest, FetchError> {
    let stocks: Vec<String> = stocks_raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if stocks.is_empty() {
        return Err(FetchError::validation("Enter at least one stock symbol."));
    }

    let investment: f64 = investment_raw
        .trim()
        .parse()
        .map_err(|_| FetchError::validation("Investment must be a number greater than zero."))?;
    if !investment.is_finite() || investment <= 0.0 {
        return Err(FetchError::validation(
            "Investment must be a number greater than zero.",
        ));
    }

    Ok(PortfolioRequest { stocks, investment })
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AllocationSlice {
    pub allocated_money: f64,
    pub shares: f64,
    pub current_price: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Fundamentals {
    #[serde(rename = "Revenue_Growth_5Y")]
    pub revenue_growth_5y: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PortfolioResult {
    pub allocation: BTreeMap<String, AllocationSlice>,
    #[serde(default)]
    pub fundamentals: BTreeMap<String, Fundamentals>,
    pub expected_annual_return: f64,
    pub annual_risk: f64,
    pub leftover_amount: f64,
}

/// The backend reports per-ticker data failures as a 200 body with an
/// `error` field; check it before decoding the success shape.
pub fn project(raw: Value) -> Result<PortfolioResult, FetchError> {
    if let Some(msg) = raw.get("error").and_then(Value::as_str) {
        return Err(FetchError::Application(msg.to_string()));
    }
    serde_json::from_value(raw).map_err(|e| FetchError::Malformed(e.to_string()))
}

impl PortfolioResult {
    /// Series for the allocation pie chart: one slice per ticker, weighted
    /// by allocated money.
    pub fn pie_series(&self) -> Vec<Slice> {
        self.allocation
            .iter()
            .map(|(ticker, info)| Slice {
                name: ticker.clone(),
                value: info.allocated_money,
            })
            .collect()
    }
}

impl Render for PortfolioResult {
    fn render(&self) -> Vec<Node> {
        let mut nodes = vec![Node::Heading("Optimized Portfolio Allocation".to_string())];
        for (ticker, info) in &self.allocation {
            nodes.push(Node::Heading(ticker.clone()));
            nodes.push(Node::field("Allocated", format!("{:.2}", info.allocated_money)));
            nodes.push(Node::field("Shares", info.shares));
            nodes.push(Node::field("Current Price", info.current_price));
            let growth = self
                .fundamentals
                .get(ticker)
                .and_then(|f| f.revenue_growth_5y)
                .map(|g| g.to_string())
                .unwrap_or_else(|| "Data Not Available".to_string());
            nodes.push(Node::field("Revenue Growth", growth));
        }
        nodes.push(Node::Heading("Allocation Pie Chart".to_string()));
        nodes.push(Node::Pie(self.pie_series()));
        nodes.push(Node::field(
            "Expected Annual Return (%)",
            self.expected_annual_return,
        ));
        nodes.push(Node::field("Annual Risk / Volatility (%)", self.annual_risk));
        nodes.push(Node::field("Leftover Amount", self.leftover_amount));
        nodes
    }
}

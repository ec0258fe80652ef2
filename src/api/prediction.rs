//! Price prediction: request building, response projection, layout.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FetchError;
use crate::view::{decode_graph, Node, Render};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    pub symbol: String,
}

pub fn build_request(symbol_raw: &str) -> Result<PredictionRequest, FetchError> {
    let symbol = symbol_raw.trim();
    if symbol.is_empty() {
        return Err(FetchError::validation("Enter a stock symbol."));
    }
    Ok(PredictionRequest {
        symbol: symbol.to_string(),
    })
}

/// Opaque base64 image payload; decoded only at the rendering boundary.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ImageB64(String);

impl ImageB64 {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionResult {
    pub mae: f64,
    pub mse: f64,
    pub rmse: f64,
    pub actual_vs_predicted_graph: ImageB64,
    pub future_prediction_graph: ImageB64,
}

pub fn project(raw: Value) -> Result<PredictionResult, FetchError> {
    serde_json::from_value(raw).map_err(|e| FetchError::Malformed(e.to_string()))
}

fn graph_node(label: &str, payload: &ImageB64) -> Node {
    match decode_graph(payload.as_str()) {
        Some(png) => Node::Image {
            label: label.to_string(),
            png,
        },
        // A bad payload degrades to a placeholder; it never fails the page.
        None => Node::Line(format!("{}: graph unavailable", label)),
    }
}

impl Render for PredictionResult {
    fn render(&self) -> Vec<Node> {
        vec![
            Node::Heading("Prediction Results".to_string()),
            Node::field("MAE", self.mae),
            Node::field("MSE", self.mse),
            Node::field("RMSE", self.rmse),
            graph_node("Actual vs Predicted", &self.actual_vs_predicted_graph),
            graph_node("Future 100-Day Forecast", &self.future_prediction_graph),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::flatten;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;
    use serde_json::json;

    #[test]
    fn test_build_request_trims() {
        let req = build_request("  TCS.NS ").unwrap();
        assert_eq!(req.symbol, "TCS.NS");
        assert!(matches!(build_request("   "), Err(FetchError::Validation(_))));
    }

    #[test]
    fn test_project_and_render() {
        let png = BASE64.encode([0x89, 0x50, 0x4e, 0x47]);
        let result = project(json!({
            "mae": 1.2,
            "mse": 3.4,
            "rmse": 1.8,
            "actual_vs_predicted_graph": png,
            "future_prediction_graph": png
        }))
        .unwrap();
        let nodes = result.render();
        let images = nodes
            .iter()
            .filter(|n| matches!(n, Node::Image { .. }))
            .count();
        assert_eq!(images, 2);
        let lines = flatten(&nodes);
        assert!(lines.contains(&"MAE: 1.2".to_string()));
        assert!(lines.contains(&"RMSE: 1.8".to_string()));
    }

    #[test]
    fn test_project_missing_graph_is_malformed() {
        let err = project(json!({"mae": 1.0, "mse": 2.0, "rmse": 1.4})).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn test_undecodable_graph_degrades_to_placeholder() {
        let result = project(json!({
            "mae": 1.0,
            "mse": 2.0,
            "rmse": 1.4,
            "actual_vs_predicted_graph": "!!!not base64!!!",
            "future_prediction_graph": "!!!not base64!!!"
        }))
        .unwrap();
        let lines = flatten(&result.render());
        assert!(lines.contains(&"Actual vs Predicted: graph unavailable".to_string()));
    }
}

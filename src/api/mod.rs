//! HTTP adapters for the four analysis services.
//!
//! One `AnalysisApi` trait so pages (and tests) are indifferent to the
//! transport; `HttpApi` is the real implementation against the backend
//! base address from config.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::error::FetchError;
use crate::logging::{log, obj, v_str, Domain, Level};
use crate::state::Config;

pub mod loss_averaging;
pub mod portfolio;
pub mod prediction;
pub mod sentiment;

use self::loss_averaging::{LossAveragingRequest, LossAveragingResult};
use self::portfolio::{PortfolioRequest, PortfolioResult};
use self::prediction::{PredictionRequest, PredictionResult};
use self::sentiment::{SentimentRequest, SentimentResult};

#[async_trait]
pub trait AnalysisApi: Send + Sync {
    async fn optimize_portfolio(
        &self,
        req: &PortfolioRequest,
    ) -> Result<PortfolioResult, FetchError>;

    async fn loss_averaging(
        &self,
        req: &LossAveragingRequest,
    ) -> Result<LossAveragingResult, FetchError>;

    async fn predict(&self, req: &PredictionRequest) -> Result<PredictionResult, FetchError>;

    async fn sentiment(&self, req: &SentimentRequest) -> Result<SentimentResult, FetchError>;
}

pub struct HttpApi {
    client: Client,
    base: String,
}

impl HttpApi {
    pub fn new(cfg: &Config) -> Self {
        Self {
            client: Client::builder()
                .timeout(cfg.http_timeout())
                .build()
                .unwrap_or_else(|_| Client::new()),
            base: cfg.backend_base.trim_end_matches('/').to_string(),
        }
    }

    /// POST a JSON body; non-success statuses become `FetchError::Http`
    /// carrying the server's `message` field when the error body decodes.
    async fn post_json(
        &self,
        path: &str,
        body: &Value,
        fallback: &'static str,
    ) -> Result<Value, FetchError> {
        log(Level::Debug, Domain::Api, "post", obj(&[("path", v_str(path))]));
        let url = format!("{}{}", self.base, path);
        let resp = self.client.post(&url).json(body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string));
            log(
                Level::Warn,
                Domain::Api,
                "http_error",
                obj(&[("path", v_str(path)), ("status", status.as_u16().into())]),
            );
            return Err(FetchError::Http {
                status: status.as_u16(),
                message,
                fallback,
            });
        }

        serde_json::from_str(&text).map_err(|e| FetchError::Malformed(e.to_string()))
    }

    /// GET with query parameters. The body is decoded even on non-success
    /// statuses: the sentiment endpoint reports failures through an `error`
    /// field rather than the status code.
    async fn get_json(
        &self,
        path: &str,
        query: &[(&str, &str)],
        fallback: &'static str,
    ) -> Result<Value, FetchError> {
        log(Level::Debug, Domain::Api, "get", obj(&[("path", v_str(path))]));
        let mut url = Url::parse(&format!("{}{}", self.base, path))
            .map_err(|e| FetchError::Transport(format!("Invalid backend URL: {}", e)))?;
        url.query_pairs_mut().extend_pairs(query);

        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(_) if !status.is_success() => Err(FetchError::Http {
                status: status.as_u16(),
                message: None,
                fallback,
            }),
            Err(e) => Err(FetchError::Malformed(e.to_string())),
        }
    }
}

#[async_trait]
impl AnalysisApi for HttpApi {
    async fn optimize_portfolio(
        &self,
        req: &PortfolioRequest,
    ) -> Result<PortfolioResult, FetchError> {
        let body = serde_json::to_value(req)
            .map_err(|e| FetchError::Malformed(e.to_string()))?;
        let raw = self
            .post_json("/api/portfolio-optimize", &body, "Failed to fetch data")
            .await?;
        portfolio::project(raw)
    }

    async fn loss_averaging(
        &self,
        req: &LossAveragingRequest,
    ) -> Result<LossAveragingResult, FetchError> {
        let body = serde_json::to_value(req)
            .map_err(|e| FetchError::Malformed(e.to_string()))?;
        let raw = self
            .post_json("/api/loss-averaging", &body, "Request failed")
            .await?;
        loss_averaging::project(raw)
    }

    async fn predict(&self, req: &PredictionRequest) -> Result<PredictionResult, FetchError> {
        let body = serde_json::to_value(req)
            .map_err(|e| FetchError::Malformed(e.to_string()))?;
        let raw = self
            .post_json("/predict_stock", &body, "Failed to fetch prediction")
            .await?;
        prediction::project(raw)
    }

    async fn sentiment(&self, req: &SentimentRequest) -> Result<SentimentResult, FetchError> {
        let raw = self
            .get_json(
                "/api/news",
                &[("symbol", req.symbol.as_str())],
                "Error fetching data",
            )
            .await?;
        sentiment::project(raw)
    }
}

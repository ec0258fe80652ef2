//! Per-feature pages: raw form fields plus an independent lifecycle.
//!
//! Submit wires builder -> begin -> API call -> complete; validation
//! failures fail the lifecycle locally and never reach the network.

use crate::api::loss_averaging::{self, LossAveragingResult};
use crate::api::portfolio::{self, PortfolioResult};
use crate::api::prediction::{self, PredictionResult};
use crate::api::sentiment::{self, SentimentResult};
use crate::api::AnalysisApi;
use crate::lifecycle::Lifecycle;
use crate::logging::{log, obj, v_str, Domain, Level};
use crate::view::{self, Node};

macro_rules! reject_overlap {
    ($state:expr, $page:expr) => {
        match $state.begin() {
            Some(ticket) => ticket,
            None => {
                log(
                    Level::Warn,
                    Domain::Page,
                    "submit_while_pending",
                    obj(&[("page", v_str($page))]),
                );
                return;
            }
        }
    };
}

#[derive(Default)]
pub struct PortfolioPage {
    pub stocks: String,
    pub investment: String,
    state: Lifecycle<PortfolioResult>,
}

impl PortfolioPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &Lifecycle<PortfolioResult> {
        &self.state
    }

    pub async fn submit(&mut self, api: &dyn AnalysisApi) {
        let req = match portfolio::build_request(&self.stocks, &self.investment) {
            Ok(req) => req,
            Err(err) => {
                log(
                    Level::Info,
                    Domain::Form,
                    "validation_failed",
                    obj(&[("page", v_str("portfolio")), ("error", v_str(&err.to_string()))]),
                );
                self.state.fail(err);
                return;
            }
        };
        let ticket = reject_overlap!(self.state, "portfolio");
        let outcome = api.optimize_portfolio(&req).await;
        self.state.complete(ticket, outcome);
    }

    pub fn reset(&mut self) {
        self.stocks.clear();
        self.investment.clear();
        self.state.reset();
    }

    pub fn view(&self) -> Vec<Node> {
        view::render(&self.state)
    }
}

#[derive(Default)]
pub struct LossAveragingPage {
    pub stock_symbol: String,
    pub avg_price: String,
    pub num_shares: String,
    pub invest_amount: String,
    state: Lifecycle<LossAveragingResult>,
}

impl LossAveragingPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &Lifecycle<LossAveragingResult> {
        &self.state
    }

    pub async fn submit(&mut self, api: &dyn AnalysisApi) {
        let req = match loss_averaging::build_request(
            &self.stock_symbol,
            &self.avg_price,
            &self.num_shares,
            &self.invest_amount,
        ) {
            Ok(req) => req,
            Err(err) => {
                log(
                    Level::Info,
                    Domain::Form,
                    "validation_failed",
                    obj(&[("page", v_str("loss_averaging"))]),
                );
                self.state.fail(err);
                return;
            }
        };
        let ticket = reject_overlap!(self.state, "loss_averaging");
        let outcome = api.loss_averaging(&req).await;
        self.state.complete(ticket, outcome);
    }

    pub fn reset(&mut self) {
        self.stock_symbol.clear();
        self.avg_price.clear();
        self.num_shares.clear();
        self.invest_amount.clear();
        self.state.reset();
    }

    pub fn view(&self) -> Vec<Node> {
        view::render(&self.state)
    }
}

#[derive(Default)]
pub struct PredictionPage {
    pub symbol: String,
    state: Lifecycle<PredictionResult>,
}

impl PredictionPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &Lifecycle<PredictionResult> {
        &self.state
    }

    pub async fn submit(&mut self, api: &dyn AnalysisApi) {
        let req = match prediction::build_request(&self.symbol) {
            Ok(req) => req,
            Err(err) => {
                log(
                    Level::Info,
                    Domain::Form,
                    "validation_failed",
                    obj(&[("page", v_str("prediction"))]),
                );
                self.state.fail(err);
                return;
            }
        };
        let ticket = reject_overlap!(self.state, "prediction");
        let outcome = api.predict(&req).await;
        self.state.complete(ticket, outcome);
    }

    pub fn reset(&mut self) {
        self.symbol.clear();
        self.state.reset();
    }

    pub fn view(&self) -> Vec<Node> {
        view::render(&self.state)
    }
}

#[derive(Default)]
pub struct SentimentPage {
    pub stock_symbol: String,
    state: Lifecycle<SentimentResult>,
}

impl SentimentPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &Lifecycle<SentimentResult> {
        &self.state
    }

    /// An empty symbol skips silently: no state change, no network call.
    pub async fn submit(&mut self, api: &dyn AnalysisApi) {
        let Some(req) = sentiment::build_request(&self.stock_symbol) else {
            log(
                Level::Debug,
                Domain::Form,
                "empty_symbol_skipped",
                obj(&[("page", v_str("sentiment"))]),
            );
            return;
        };
        let ticket = reject_overlap!(self.state, "sentiment");
        let outcome = api.sentiment(&req).await;
        self.state.complete(ticket, outcome);
    }

    pub fn reset(&mut self) {
        self.stock_symbol.clear();
        self.state.reset();
    }

    pub fn view(&self) -> Vec<Node> {
        view::render(&self.state)
    }
}

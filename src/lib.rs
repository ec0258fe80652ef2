//! Terminal client for four remote stock-analysis services: portfolio
//! optimization, loss averaging, price prediction, and sentiment analysis.
//!
//! All analysis happens server-side; this crate validates input, tracks the
//! request lifecycle, projects the JSON responses into typed results, and
//! renders them as a display tree.

pub mod api;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod page;
pub mod state;
pub mod view;

//! Error taxonomy for the request path.
//!
//! Every kind converges to the same failed lifecycle state with exactly one
//! displayable message; nothing is retried automatically.

use std::fmt;

#[derive(Debug)]
pub enum FetchError {
    /// Locally detected bad input; never reaches the network.
    Validation(String),
    /// Network unreachable or request timed out.
    Transport(String),
    /// Non-success HTTP status. `message` is the server's text when the
    /// error body could be decoded; `fallback` is the feature's generic
    /// message otherwise.
    Http {
        status: u16,
        message: Option<String>,
        fallback: &'static str,
    },
    /// Body missing required fields or not decodable at all.
    Malformed(String),
    /// Application-level error carried in an otherwise successful body.
    Application(String),
}

impl FetchError {
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Validation(_) => "validation",
            FetchError::Transport(_) => "transport",
            FetchError::Http { .. } => "http",
            FetchError::Malformed(_) => "malformed",
            FetchError::Application(_) => "application",
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        FetchError::Validation(msg.into())
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Validation(msg) | FetchError::Application(msg) => write!(f, "{}", msg),
            FetchError::Transport(msg) => write!(f, "{}", msg),
            FetchError::Http {
                message: Some(msg), ..
            } => write!(f, "{}", msg),
            FetchError::Http { fallback, .. } => write!(f, "{}", fallback),
            // Decode detail goes to the log, not the user.
            FetchError::Malformed(_) => write!(f, "Unexpected response from server."),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Transport("Request timed out.".to_string())
        } else {
            FetchError::Transport(format!("Network error: {}", err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_prefers_server_message() {
        let err = FetchError::Http {
            status: 400,
            message: Some("Invalid input. Please check your values.".to_string()),
            fallback: "Request failed",
        };
        assert_eq!(err.to_string(), "Invalid input. Please check your values.");
    }

    #[test]
    fn test_http_falls_back_without_message() {
        let err = FetchError::Http {
            status: 500,
            message: None,
            fallback: "Failed to fetch prediction",
        };
        assert_eq!(err.to_string(), "Failed to fetch prediction");
    }

    #[test]
    fn test_malformed_displays_generic_text() {
        let err = FetchError::Malformed("missing field `mae`".to_string());
        assert_eq!(err.to_string(), "Unexpected response from server.");
        assert_eq!(err.kind(), "malformed");
    }
}

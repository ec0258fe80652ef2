use std::time::Duration;

/// Runtime configuration for the client, resolved once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base address of the analysis backend, trailing slash tolerated.
    pub backend_base: String,
    /// Outer bound on any single request; expiry surfaces as a failed state.
    pub http_timeout_secs: u64,
    /// Where decoded prediction graphs are written.
    pub image_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            backend_base: std::env::var("BACKEND_BASE")
                .unwrap_or_else(|_| "http://127.0.0.1:5000".to_string()),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            image_dir: std::env::var("IMAGE_DIR").unwrap_or_else(|_| "out/graphs".to_string()),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

use std::env;

/// Location of the Recap backend that hosts plan storage, auth, and
/// mind-map rendering.
#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub base_url: String,
}

impl BackendConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Read the backend location from `RECAP_API_URL`, defaulting to the
    /// local development server.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            env::var("RECAP_API_URL").unwrap_or_else(|_| "http://localhost:8080".into());
        Self { base_url }
    }

    /// Absolute URL for an API path like `/api/saveplan`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

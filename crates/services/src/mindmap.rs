use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::backend::BackendConfig;
use crate::error::MindMapError;

/// Renders a study plan into a mind-map image (PNG bytes).
#[async_trait]
pub trait MindMapRenderer: Send + Sync {
    /// # Errors
    ///
    /// Returns `MindMapError` on transport failure or an empty image.
    async fn render(&self, title: &str, text: &str) -> Result<Vec<u8>, MindMapError>;
}

/// Mind-map renderer backed by the Recap backend API.
#[derive(Clone)]
pub struct HttpMindMapRenderer {
    client: Client,
    config: BackendConfig,
}

impl HttpMindMapRenderer {
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl MindMapRenderer for HttpMindMapRenderer {
    async fn render(&self, title: &str, text: &str) -> Result<Vec<u8>, MindMapError> {
        let response = self
            .client
            .post(self.config.endpoint("/api/generate_mindmap"))
            .json(&MindMapRequest { title, text })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MindMapError::HttpStatus(response.status()));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(MindMapError::EmptyImage);
        }
        Ok(bytes.to_vec())
    }
}

#[derive(Debug, Serialize)]
struct MindMapRequest<'a> {
    title: &'a str,
    text: &'a str,
}

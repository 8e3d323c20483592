use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::backend::BackendConfig;
use crate::error::AuthError;

/// Identity returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Account {
    pub name: String,
    pub email: String,
}

/// Exchanges credentials for a session identity.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on rejection, other
    /// `AuthError` variants on transport failure.
    async fn login(&self, email: &str, password: &str) -> Result<Account, AuthError>;

    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` when any field is blank, other
    /// `AuthError` variants on rejection or transport failure.
    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<(), AuthError>;
}

/// Auth gateway backed by the Recap backend API.
#[derive(Clone)]
pub struct HttpAuthGateway {
    client: Client,
    config: BackendConfig,
}

impl HttpAuthGateway {
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn login(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        let response = self
            .client
            .post(self.config.endpoint("/api/login"))
            .json(&AuthRequest {
                name: None,
                email,
                password,
            })
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::UNAUTHORIZED => Err(AuthError::InvalidCredentials),
            status => Err(AuthError::HttpStatus(status)),
        }
    }

    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<(), AuthError> {
        if name.trim().is_empty() || email.trim().is_empty() || password.trim().is_empty() {
            return Err(AuthError::MissingFields);
        }

        let response = self
            .client
            .post(self.config.endpoint("/api/signup"))
            .json(&AuthRequest {
                name: Some(name),
                email,
                password,
            })
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(AuthError::HttpStatus(response.status()))
        }
    }
}

#[derive(Debug, Serialize)]
struct AuthRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    email: &'a str,
    password: &'a str,
}

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::backend::BackendConfig;
use crate::error::PlanStoreError;

/// A saved study plan: title plus free-form notes text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub title: String,
    pub text: String,
}

/// Persists and retrieves plans keyed by user identity.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Save or overwrite the plan with this title for the given user.
    ///
    /// # Errors
    ///
    /// Returns `PlanStoreError` on validation or transport failure.
    async fn save(&self, email: &str, plan: &Plan) -> Result<(), PlanStoreError>;

    /// All plans belonging to the given user.
    ///
    /// # Errors
    ///
    /// Returns `PlanStoreError` on transport failure or unknown user.
    async fn list(&self, email: &str) -> Result<Vec<Plan>, PlanStoreError>;
}

/// Plan store backed by the Recap backend API.
#[derive(Clone)]
pub struct HttpPlanStore {
    client: Client,
    config: BackendConfig,
}

impl HttpPlanStore {
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl PlanStore for HttpPlanStore {
    async fn save(&self, email: &str, plan: &Plan) -> Result<(), PlanStoreError> {
        if plan.title.trim().is_empty() || plan.text.trim().is_empty() {
            return Err(PlanStoreError::MissingFields);
        }

        let payload = SavePlanRequest {
            title: &plan.title,
            text: &plan.text,
            email,
        };
        let response = self
            .client
            .post(self.config.endpoint("/api/saveplan"))
            .json(&payload)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED => Err(PlanStoreError::Unauthorized),
            status => Err(PlanStoreError::HttpStatus(status)),
        }
    }

    async fn list(&self, email: &str) -> Result<Vec<Plan>, PlanStoreError> {
        let response = self
            .client
            .post(self.config.endpoint("/api/getplans"))
            .json(&EmailRequest { email })
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let body: PlansResponse = response.json().await?;
                Ok(body.plans.unwrap_or_default())
            }
            StatusCode::UNAUTHORIZED => Err(PlanStoreError::Unauthorized),
            status => Err(PlanStoreError::HttpStatus(status)),
        }
    }
}

#[derive(Debug, Serialize)]
struct SavePlanRequest<'a> {
    title: &'a str,
    text: &'a str,
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct EmailRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Deserialize)]
struct PlansResponse {
    // The backend emits `null` instead of an empty array for new users.
    plans: Option<Vec<Plan>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plans_response_tolerates_null() {
        let empty: PlansResponse = serde_json::from_str(r#"{"plans":null}"#).unwrap();
        assert!(empty.plans.is_none());

        let raw = r#"{"plans":[{"title":"Rust","text":"notes"}]}"#;
        let parsed: PlansResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            parsed.plans.unwrap(),
            vec![Plan {
                title: "Rust".into(),
                text: "notes".into()
            }]
        );
    }
}

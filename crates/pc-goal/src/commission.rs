// commission.rs — Call contract for the remote multi-level commission calculator.
//
// The compensation rules (ranks, overrides, qualification) live entirely in
// the remote service. This module only defines the request/response shapes
// and an HTTP client that posts one to the other.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::CommissionConfig;
use crate::error::GoalError;

/// One downline member, as the calculator expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub member_id: String,
    pub rank: String,
    pub personal_volume: f64,
    #[serde(default)]
    pub group_volume: f64,
    /// Upline member who sponsored this one; `None` means sponsored by the requester.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sponsor_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionRequest {
    /// Compensation plan identifier known to the remote service.
    pub plan_id: String,
    pub rank: String,
    pub personal_volume: f64,
    pub group_volume: f64,
    #[serde(default)]
    pub team: Vec<TeamMember>,
}

/// One line of the payout breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionLine {
    pub label: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionResponse {
    pub total_earnings: f64,
    pub total_volume: f64,
    pub qualified_rank: String,
    #[serde(default)]
    pub breakdown: Vec<CommissionLine>,
}

/// Anything that can price a commission request.
#[async_trait]
pub trait CommissionCalculator: Send + Sync {
    async fn calculate(&self, request: &CommissionRequest)
        -> Result<CommissionResponse, GoalError>;
}

/// Posts requests as JSON to the configured endpoint.
pub struct HttpCommissionClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpCommissionClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, GoalError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GoalError::Commission(format!("client setup failed: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Build a client from config, or `None` when no endpoint is configured.
    pub fn from_config(config: &CommissionConfig) -> Result<Option<Self>, GoalError> {
        match &config.endpoint {
            Some(endpoint) => Ok(Some(Self::new(
                endpoint.clone(),
                Duration::from_secs(config.timeout_secs),
            )?)),
            None => Ok(None),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CommissionCalculator for HttpCommissionClient {
    async fn calculate(
        &self,
        request: &CommissionRequest,
    ) -> Result<CommissionResponse, GoalError> {
        tracing::debug!(endpoint = %self.endpoint, plan_id = %request.plan_id, "requesting commission calculation");

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| GoalError::Commission(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GoalError::Commission(format!(
                "calculator returned {}: {}",
                status, body
            )));
        }

        response
            .json::<CommissionResponse>()
            .await
            .map_err(|e| GoalError::Commission(format!("invalid response: {}", e)))
    }
}

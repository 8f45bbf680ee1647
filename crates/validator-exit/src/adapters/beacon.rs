//! Beacon node REST client for validator status.
//!
//! `GET {base}/eth/v1/beacon/states/head/validators/{validator_id}`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::domain::ValidatorStatus;
use crate::ports::{BeaconStatusApi, StatusQueryError};

/// Response of the validator endpoint (only the fields used here).
#[derive(Debug, Deserialize)]
struct ValidatorResponse {
    data: ValidatorData,
}

#[derive(Debug, Deserialize)]
struct ValidatorData {
    status: String,
}

/// Beacon API client.
#[derive(Debug, Clone)]
pub struct HttpBeaconClient {
    client: Client,
    base_url: String,
}

impl HttpBeaconClient {
    /// Create a client for `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn validator_url(&self, validator_id: &str) -> String {
        format!(
            "{}/eth/v1/beacon/states/head/validators/{}",
            self.base_url, validator_id
        )
    }
}

#[async_trait]
impl BeaconStatusApi for HttpBeaconClient {
    async fn validator_status(
        &self,
        validator_id: &str,
    ) -> Result<ValidatorStatus, StatusQueryError> {
        let response = self
            .client
            .get(self.validator_url(validator_id))
            .send()
            .await
            .map_err(|e| StatusQueryError::Transport(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(StatusQueryError::UnexpectedStatus(response.status().as_u16()));
        }

        let body: ValidatorResponse = response
            .json()
            .await
            .map_err(|e| StatusQueryError::Parse(e.to_string()))?;

        Ok(ValidatorStatus::from(body.data.status.as_str()))
    }
}

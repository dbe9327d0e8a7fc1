//! Workflow engine client implementation
//!
//! Talks to a Camunda-style REST engine. The same service exposes the
//! authorized-forms endpoint, so one client implements both [`BpmApi`] and
//! [`AuthorizationApi`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use serde_json::Value;

use super::{ApiResult, AuthorizationApi, AuthorizedForm, BpmApi, ProcessVariables, StartedProcess};
use crate::error::ApiError;

/// Default timeout for engine requests
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Path of the process start endpoint, relative to the engine URL
const PROCESS_START_PATH: &str = "/engine-rest/process-definition/key";

/// Path of the authorized forms endpoint, relative to the engine URL
const AUTH_FORMS_PATH: &str = "/engine-rest-ext/form";

/// Workflow engine client
pub struct BpmClient {
    http: HttpClient,
    base_url: String,
}

impl BpmClient {
    /// Create a new client for the engine at `base_url`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL the client was created with
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Map a non-success response to an [`ApiError`]
    async fn error_for(response: reqwest::Response) -> ApiError {
        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::FORBIDDEN => ApiError::Forbidden,
            StatusCode::NOT_FOUND => {
                let msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Resource not found".to_string());
                ApiError::NotFound(msg)
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Bad request".to_string());
                ApiError::BadRequest(msg)
            }
            status if status.is_server_error() => {
                let msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| format!("Server error: {}", status));
                ApiError::ServerError(msg)
            }
            _ => ApiError::InvalidResponse(format!("Unexpected status code: {}", status)),
        }
    }
}

/// Pull the process instance out of a start response body.
///
/// Anything other than an object with a string `id` is a malformed response.
fn parse_started_process(body: &str) -> ApiResult<StartedProcess> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        ApiError::InvalidResponse(format!("Failed to parse process start response: {}", e))
    })?;

    let id = value
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            ApiError::InvalidResponse(format!(
                "Process start response has no string `id`. Body was: {}",
                body
            ))
        })?
        .to_string();

    Ok(StartedProcess {
        id,
        definition_id: value
            .get("definitionId")
            .and_then(Value::as_str)
            .map(str::to_string),
        business_key: value
            .get("businessKey")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

#[async_trait]
impl BpmApi for BpmClient {
    async fn start_process(
        &self,
        process_key: &str,
        variables: &ProcessVariables,
        credential: &str,
    ) -> ApiResult<StartedProcess> {
        let url = format!("{}{}/{}/start", self.base_url, PROCESS_START_PATH, process_key);
        log::debug!("Starting process {} for application {}", process_key, variables.application_id);

        let response = self
            .http
            .post(&url)
            .bearer_auth(credential)
            .json(&variables.to_payload())
            .send()
            .await
            .map_err(ApiError::from)?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to read response: {}", e)))?;

        parse_started_process(&body)
    }
}

#[async_trait]
impl AuthorizationApi for BpmClient {
    async fn get_authorized_forms(&self, credential: &str) -> ApiResult<Vec<AuthorizedForm>> {
        let url = format!("{}{}", self.base_url, AUTH_FORMS_PATH);

        let response = self
            .http
            .get(&url)
            .bearer_auth(credential)
            .send()
            .await
            .map_err(ApiError::from)?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to read response: {}", e)))?;

        // Some engine versions answer `null` when nothing is authorized
        let forms: Option<Vec<AuthorizedForm>> = serde_json::from_str(&body).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse authorized forms: {}", e))
        })?;

        Ok(forms.unwrap_or_default())
    }
}

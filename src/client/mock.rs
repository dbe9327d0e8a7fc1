//! Mock workflow engine and authorization clients for testing
//!
//! Configure responses via builder methods, then hand the mock to the code
//! under test and inspect call counts afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{ApiResult, AuthorizationApi, AuthorizedForm, BpmApi, ProcessVariables, StartedProcess};
use crate::error::ApiError;

/// A captured process start for test assertions.
#[derive(Debug, Clone)]
pub struct CapturedStart {
    pub process_key: String,
    pub variables: ProcessVariables,
    pub credential: String,
}

/// Mock workflow engine.
///
/// # Example
/// ```ignore
/// let bpm = MockBpmClient::new().with_instance_id("proc-123").await;
/// let started = bpm.start_process("K1", &vars, "token").await?;
/// assert_eq!(started.id, "proc-123");
/// ```
#[derive(Default)]
pub struct MockBpmClient {
    /// Instance ID returned on success
    instance_id: Arc<Mutex<Option<String>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Captured start requests
    starts: Arc<Mutex<Vec<CapturedStart>>>,
}

impl MockBpmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the instance ID returned from start_process.
    pub async fn with_instance_id(self, id: &str) -> Self {
        *self.instance_id.lock().await = Some(id.to_string());
        self
    }

    /// Configure an error to return on the next call.
    pub async fn with_error(self, error: ApiError) -> Self {
        *self.error.lock().await = Some(error);
        self
    }

    /// Number of start_process calls made.
    pub async fn start_count(&self) -> usize {
        self.starts.lock().await.len()
    }

    /// All captured start requests.
    pub async fn captured_starts(&self) -> Vec<CapturedStart> {
        self.starts.lock().await.clone()
    }
}

#[async_trait]
impl BpmApi for MockBpmClient {
    async fn start_process(
        &self,
        process_key: &str,
        variables: &ProcessVariables,
        credential: &str,
    ) -> ApiResult<StartedProcess> {
        self.starts.lock().await.push(CapturedStart {
            process_key: process_key.to_string(),
            variables: variables.clone(),
            credential: credential.to_string(),
        });

        if let Some(e) = self.error.lock().await.take() {
            return Err(e);
        }

        let id = self
            .instance_id
            .lock()
            .await
            .clone()
            .unwrap_or_else(|| format!("mock-proc-{}", variables.application_id));

        Ok(StartedProcess {
            id,
            definition_id: Some(format!("{}:1:mock", process_key)),
            business_key: None,
        })
    }
}

/// Mock authorization provider keyed by credential.
#[derive(Default)]
pub struct MockAuthorizationClient {
    /// Forms returned per credential; unknown credentials get an empty list
    forms: Arc<Mutex<HashMap<String, Vec<AuthorizedForm>>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Credentials seen, in call order
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockAuthorizationClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authorize `credential` for forms with the given names.
    pub async fn with_forms(self, credential: &str, names: &[&str]) -> Self {
        let forms = names.iter().map(|n| AuthorizedForm::named(*n)).collect();
        self.forms.lock().await.insert(credential.to_string(), forms);
        self
    }

    /// Configure an error to return on the next call.
    pub async fn with_error(self, error: ApiError) -> Self {
        *self.error.lock().await = Some(error);
        self
    }

    /// Total number of lookups made.
    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    /// Number of lookups made for one credential.
    pub async fn calls_for(&self, credential: &str) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| c.as_str() == credential)
            .count()
    }
}

#[async_trait]
impl AuthorizationApi for MockAuthorizationClient {
    async fn get_authorized_forms(&self, credential: &str) -> ApiResult<Vec<AuthorizedForm>> {
        self.calls.lock().await.push(credential.to_string());

        if let Some(e) = self.error.lock().await.take() {
            return Err(e);
        }

        Ok(self
            .forms
            .lock()
            .await
            .get(credential)
            .cloned()
            .unwrap_or_default())
    }
}

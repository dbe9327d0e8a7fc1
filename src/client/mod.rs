//! External workflow engine and authorization provider clients

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::ApiError;

pub mod bpm;
#[cfg(test)]
pub mod mock;

pub use bpm::BpmClient;
#[cfg(test)]
#[allow(unused_imports)]
pub use mock::{MockAuthorizationClient, MockBpmClient};

/// Result type for external client calls.
///
/// Kept separate from [`crate::error::Result`] so callers can classify the
/// failure kind before it is folded into a service error.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Workflow engine operations
#[async_trait]
pub trait BpmApi: Send + Sync {
    /// Start a process instance of the definition registered under `process_key`
    async fn start_process(
        &self,
        process_key: &str,
        variables: &ProcessVariables,
        credential: &str,
    ) -> ApiResult<StartedProcess>;
}

/// Authorization provider operations
#[async_trait]
pub trait AuthorizationApi: Send + Sync {
    /// List the forms the given credential may access
    async fn get_authorized_forms(&self, credential: &str) -> ApiResult<Vec<AuthorizedForm>>;
}

/// Variables handed to the workflow engine when a process starts
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessVariables {
    pub application_id: i64,
    pub form_url: Option<String>,
    pub form_name: String,
    pub submitter_name: Option<String>,
    /// Creation timestamp of the application, already stringified
    pub submission_date: String,
}

impl ProcessVariables {
    /// Engine request body: every variable wrapped as `{"value": ...}`.
    pub fn to_payload(&self) -> Value {
        json!({
            "variables": {
                "applicationId": { "value": self.application_id },
                "formUrl": { "value": self.form_url },
                "formName": { "value": self.form_name },
                "submitterName": { "value": self.submitter_name },
                "submissionDate": { "value": self.submission_date },
            }
        })
    }
}

/// Process instance returned by a successful start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartedProcess {
    /// Process instance ID
    pub id: String,

    /// Process definition the instance runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition_id: Option<String>,

    /// Business key, if the engine assigned one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_key: Option<String>,
}

/// A form the caller is authorized to access
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizedForm {
    /// Form name used to scope application queries
    pub form_name: String,

    /// Form ID (optional, not every provider returns it)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,

    /// Provider-side resource ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
}

impl AuthorizedForm {
    pub fn named(form_name: impl Into<String>) -> Self {
        Self {
            form_name: form_name.into(),
            form_id: None,
            resource_id: None,
        }
    }
}

//! Persisted entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status assigned to every application at creation
pub const NEW_APPLICATION_STATUS: &str = "new";

/// Status of a mapper that new applications may use
pub const ACTIVE_MAPPER_STATUS: &str = "active";

/// One submitted form instance under workflow execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub application_name: String,
    pub application_status: String,
    pub form_process_mapper_id: i64,
    /// Form the application was submitted against (from the mapper)
    pub form_id: String,
    pub form_url: Option<String>,
    pub process_instance_id: Option<String>,
    pub created_by: Option<String>,
    pub modified_by: Option<String>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Fields required to insert an application
#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
    pub application_name: String,
    pub application_status: String,
    pub form_process_mapper_id: i64,
    pub form_url: Option<String>,
    pub created_by: Option<String>,
}

/// Partial update. `None` leaves a column untouched, so a process instance
/// ID can be set or replaced but never cleared.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApplicationUpdate {
    #[serde(default, alias = "applicationStatus")]
    pub application_status: Option<String>,
    #[serde(default, alias = "processInstanceId")]
    pub process_instance_id: Option<String>,
    #[serde(default, alias = "formUrl")]
    pub form_url: Option<String>,
    #[serde(default, alias = "modifiedBy")]
    pub modified_by: Option<String>,
}

impl ApplicationUpdate {
    /// Update that only attaches a process instance.
    pub fn process_instance(id: impl Into<String>) -> Self {
        Self {
            process_instance_id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.application_status.is_none()
            && self.process_instance_id.is_none()
            && self.form_url.is_none()
            && self.modified_by.is_none()
    }
}

/// Maps a form to the workflow definition that handles it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormProcessMapper {
    pub id: i64,
    pub form_id: String,
    pub form_name: String,
    pub process_key: Option<String>,
    pub process_name: Option<String>,
    pub status: String,
    pub created_by: Option<String>,
    pub created: DateTime<Utc>,
}

/// Fields required to register a mapper
#[derive(Debug, Clone, PartialEq)]
pub struct NewFormProcessMapper {
    pub form_id: String,
    pub form_name: String,
    pub process_key: Option<String>,
    pub process_name: Option<String>,
    pub created_by: Option<String>,
}

/// One group of an aggregation query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedApplication {
    pub form_process_mapper_id: i64,
    pub form_name: String,
    /// Present only when grouping by status
    pub application_status: Option<String>,
    pub count: u64,
}

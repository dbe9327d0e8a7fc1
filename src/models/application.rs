//! Application view models for JSON and table output

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::Tabled;

use super::common::{format_datetime, or_dash, truncate_string};
use crate::store::Application;

/// Externally visible application shape (camelCase JSON)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    pub id: i64,
    pub application_name: String,
    pub application_status: String,
    pub form_process_mapper_id: i64,
    pub form_id: String,
    pub form_url: Option<String>,
    pub process_instance_id: Option<String>,
    pub created_by: Option<String>,
    pub modified_by: Option<String>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl From<Application> for ApplicationView {
    fn from(app: Application) -> Self {
        Self {
            id: app.id,
            application_name: app.application_name,
            application_status: app.application_status,
            form_process_mapper_id: app.form_process_mapper_id,
            form_id: app.form_id,
            form_url: app.form_url,
            process_instance_id: app.process_instance_id,
            created_by: app.created_by,
            modified_by: app.modified_by,
            created: app.created,
            modified: app.modified,
        }
    }
}

/// Application table row
#[derive(Debug, Clone, Tabled)]
pub struct ApplicationRow {
    #[tabled(rename = "ID")]
    pub id: i64,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "STATUS")]
    pub status: String,

    #[tabled(rename = "FORM")]
    pub form_id: String,

    #[tabled(rename = "PROCESS INSTANCE")]
    pub process_instance_id: String,

    #[tabled(rename = "CREATED BY")]
    pub created_by: String,

    #[tabled(rename = "CREATED")]
    pub created: String,
}

impl From<&ApplicationView> for ApplicationRow {
    fn from(view: &ApplicationView) -> Self {
        Self {
            id: view.id,
            name: truncate_string(&view.application_name, 40),
            status: view.application_status.clone(),
            form_id: view.form_id.clone(),
            process_instance_id: or_dash(view.process_instance_id.as_deref()),
            created_by: or_dash(view.created_by.as_deref()),
            created: format_datetime(&view.created),
        }
    }
}

/// Distinct statuses, serialized as `{"applicationStatus": [...]}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusList {
    pub application_status: Vec<String>,
}

/// Status table row
#[derive(Debug, Clone, Tabled)]
pub struct StatusRow {
    #[tabled(rename = "STATUS")]
    pub status: String,
}

impl StatusList {
    pub fn rows(&self) -> Vec<StatusRow> {
        self.application_status
            .iter()
            .map(|s| StatusRow { status: s.clone() })
            .collect()
    }
}

//! Aggregation view models
//!
//! Grouping by mapper hides `applicationStatus`; grouping by status hides
//! `formProcessMapperId`. The hidden field is absent from JSON, not null.

use serde::Serialize;
use tabled::Tabled;

use crate::store::AggregatedApplication;

/// Dashboard count for one group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_process_mapper_id: Option<i64>,

    pub form_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_status: Option<String>,

    pub count: u64,
}

impl AggregatedView {
    /// View for a per-mapper group
    pub fn by_mapper(row: AggregatedApplication) -> Self {
        Self {
            form_process_mapper_id: Some(row.form_process_mapper_id),
            form_name: row.form_name,
            application_status: None,
            count: row.count,
        }
    }

    /// View for a per-status group
    pub fn by_status(row: AggregatedApplication) -> Self {
        Self {
            form_process_mapper_id: None,
            form_name: row.form_name,
            application_status: row.application_status,
            count: row.count,
        }
    }
}

/// Aggregation table row
#[derive(Debug, Clone, Tabled)]
pub struct AggregatedRow {
    #[tabled(rename = "GROUP")]
    pub group: String,

    #[tabled(rename = "FORM")]
    pub form_name: String,

    #[tabled(rename = "COUNT")]
    pub count: u64,
}

impl From<&AggregatedView> for AggregatedRow {
    fn from(view: &AggregatedView) -> Self {
        let group = match (&view.application_status, view.form_process_mapper_id) {
            (Some(status), _) => status.clone(),
            (None, Some(id)) => format!("mapper {}", id),
            (None, None) => "-".to_string(),
        };
        Self {
            group,
            form_name: view.form_name.clone(),
            count: view.count,
        }
    }
}

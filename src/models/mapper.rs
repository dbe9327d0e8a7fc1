//! Form process mapper view models

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::Tabled;

use super::common::{format_datetime, or_dash};
use crate::store::FormProcessMapper;

/// Externally visible mapper shape (camelCase JSON)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapperView {
    pub id: i64,
    pub form_id: String,
    pub form_name: String,
    pub process_key: Option<String>,
    pub process_name: Option<String>,
    pub status: String,
    pub created_by: Option<String>,
    pub created: DateTime<Utc>,
}

impl From<FormProcessMapper> for MapperView {
    fn from(mapper: FormProcessMapper) -> Self {
        Self {
            id: mapper.id,
            form_id: mapper.form_id,
            form_name: mapper.form_name,
            process_key: mapper.process_key,
            process_name: mapper.process_name,
            status: mapper.status,
            created_by: mapper.created_by,
            created: mapper.created,
        }
    }
}

/// Mapper table row
#[derive(Debug, Clone, Tabled)]
pub struct MapperRow {
    #[tabled(rename = "ID")]
    pub id: i64,

    #[tabled(rename = "FORM ID")]
    pub form_id: String,

    #[tabled(rename = "FORM NAME")]
    pub form_name: String,

    #[tabled(rename = "PROCESS KEY")]
    pub process_key: String,

    #[tabled(rename = "STATUS")]
    pub status: String,

    #[tabled(rename = "CREATED")]
    pub created: String,
}

impl From<&MapperView> for MapperRow {
    fn from(view: &MapperView) -> Self {
        Self {
            id: view.id,
            form_id: view.form_id.clone(),
            form_name: view.form_name.clone(),
            process_key: or_dash(view.process_key.as_deref()),
            status: view.status.clone(),
            created: format_datetime(&view.created),
        }
    }
}

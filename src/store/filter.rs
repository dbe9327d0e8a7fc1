//! Query filters, pagination and sort order
//!
//! [`QueryParams`] carries raw caller input exactly as it arrived (numbers may
//! be strings, anything may be missing). [`QueryFilter::from_params`] coerces
//! it once, and every find operation consumes the resulting [`QueryFilter`].
//!
//! Coercion rules:
//! - numeric fields accept integers or numeric text (`"5"` is `5`);
//! - text fields accept text or numbers (`5` is `"5"`);
//! - falsy input (missing, `""`, `0`, `false`) means "no constraint", and a
//!   value that coerces to `0` is unconstrained as well.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Raw scalar from an external caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl RawValue {
    fn is_falsy(&self) -> bool {
        match self {
            RawValue::Bool(b) => !b,
            RawValue::Int(i) => *i == 0,
            RawValue::Text(s) => s.is_empty(),
        }
    }

    /// Coerce to an integer. Falsy input and zero are unconstrained.
    pub fn to_int(&self, field: &str) -> Result<Option<i64>> {
        if self.is_falsy() {
            return Ok(None);
        }
        let value = match self {
            RawValue::Int(i) => *i,
            RawValue::Bool(_) => 1,
            RawValue::Text(s) => s.trim().parse::<i64>().map_err(|_| {
                Error::InvalidFilter(format!("{} must be an integer, got {:?}", field, s))
            })?,
        };
        Ok((value != 0).then_some(value))
    }

    /// Coerce to text. Falsy input is unconstrained.
    pub fn to_text(&self) -> Option<String> {
        if self.is_falsy() {
            return None;
        }
        Some(match self {
            RawValue::Int(i) => i.to_string(),
            RawValue::Bool(b) => b.to_string(),
            RawValue::Text(s) => s.clone(),
        })
    }

    /// Coerce to a UTC timestamp (RFC 3339 or `YYYY-MM-DD`).
    pub fn to_datetime(&self, field: &str) -> Result<Option<DateTime<Utc>>> {
        let Some(text) = self.to_text() else {
            return Ok(None);
        };
        parse_datetime(&text)
            .map(Some)
            .ok_or_else(|| Error::InvalidFilter(format!("{} is not a date: {:?}", field, text)))
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Int(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

/// Parse an RFC 3339 timestamp, a `YYYY-MM-DD HH:MM:SS` UTC timestamp, or a
/// bare date (start of day UTC).
pub fn parse_datetime(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Raw query input as received from the boundary layer.
///
/// Accepts both snake_case and the camelCase names used by API clients.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryParams {
    #[serde(default, alias = "pageNo")]
    pub page_no: Option<RawValue>,
    #[serde(default)]
    pub limit: Option<RawValue>,
    #[serde(default, alias = "sortBy", alias = "orderBy")]
    pub order_by: Option<RawValue>,
    #[serde(default, alias = "sortOrder")]
    pub sort_order: Option<RawValue>,
    #[serde(default, alias = "Id", alias = "applicationId")]
    pub application_id: Option<RawValue>,
    #[serde(default, alias = "applicationName")]
    pub application_name: Option<RawValue>,
    #[serde(default, alias = "applicationStatus")]
    pub application_status: Option<RawValue>,
    #[serde(default, alias = "createdBy")]
    pub created_by: Option<RawValue>,
    #[serde(default, alias = "formId")]
    pub form_id: Option<RawValue>,
    #[serde(default, alias = "formName")]
    pub form_name: Option<RawValue>,
    #[serde(default, alias = "createdFrom")]
    pub created_from: Option<RawValue>,
    #[serde(default, alias = "createdTo")]
    pub created_to: Option<RawValue>,
    #[serde(default, alias = "modifiedFrom")]
    pub modified_from: Option<RawValue>,
    #[serde(default, alias = "modifiedTo")]
    pub modified_to: Option<RawValue>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the pagination inputs, used by operations that take nothing else.
    pub fn pagination_only(&self) -> Self {
        Self {
            page_no: self.page_no.clone(),
            limit: self.limit.clone(),
            ..Self::default()
        }
    }
}

/// Sort order for paginated requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SortOrder {
    /// Ascending order (A-Z, 0-9, oldest first)
    Asc,
    /// Descending order (Z-A, 9-0, newest first)
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(input: &str) -> Result<Self> {
        match input.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(Error::InvalidFilter(format!("unknown sort order {:?}", other))),
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Fields results can be ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SortField {
    #[default]
    Id,
    ApplicationName,
    ApplicationStatus,
    FormId,
    FormName,
    CreatedBy,
    Created,
    Modified,
}

impl SortField {
    pub fn parse(input: &str) -> Result<Self> {
        let field = match input {
            "id" => SortField::Id,
            "applicationName" | "application_name" => SortField::ApplicationName,
            "applicationStatus" | "application_status" => SortField::ApplicationStatus,
            "formId" | "form_id" => SortField::FormId,
            "formName" | "form_name" => SortField::FormName,
            "createdBy" | "created_by" => SortField::CreatedBy,
            "created" => SortField::Created,
            "modified" => SortField::Modified,
            other => {
                return Err(Error::InvalidFilter(format!("cannot sort by {:?}", other)));
            }
        };
        Ok(field)
    }
}

/// One page of results: 1-based page number and page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page_no: u64,
    pub limit: u64,
}

impl Pagination {
    /// Rows skipped before this page.
    ///
    /// Saturates at `i64::MAX`, so a page beyond any stored row is empty.
    pub fn offset(&self) -> i64 {
        self.page_no
            .saturating_sub(1)
            .checked_mul(self.limit)
            .and_then(|offset| i64::try_from(offset).ok())
            .unwrap_or(i64::MAX)
    }

    /// Page size as a SQL bind value
    pub fn sql_limit(&self) -> i64 {
        i64::try_from(self.limit).unwrap_or(i64::MAX)
    }
}

/// Fully coerced query descriptor shared by every find operation.
///
/// # Example
/// ```ignore
/// let filter = QueryFilter::new()
///     .page(2, 10)
///     .sort_by(SortField::Created)
///     .sort_order(SortOrder::Asc);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryFilter {
    /// `None` returns every matching row
    pub pagination: Option<Pagination>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub application_id: Option<i64>,
    /// Case-insensitive substring match
    pub application_name: Option<String>,
    pub application_status: Option<String>,
    pub created_by: Option<String>,
    pub form_id: Option<String>,
    pub form_name: Option<String>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    pub modified_from: Option<DateTime<Utc>>,
    pub modified_to: Option<DateTime<Utc>>,
}

fn int_field(value: &Option<RawValue>, field: &str) -> Result<Option<i64>> {
    value.as_ref().map_or(Ok(None), |v| v.to_int(field))
}

fn text_field(value: &Option<RawValue>) -> Option<String> {
    value.as_ref().and_then(RawValue::to_text)
}

fn date_field(value: &Option<RawValue>, field: &str) -> Result<Option<DateTime<Utc>>> {
    value.as_ref().map_or(Ok(None), |v| v.to_datetime(field))
}

impl QueryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Coerce raw caller input.
    pub fn from_params(params: &QueryParams) -> Result<Self> {
        let page_no = int_field(&params.page_no, "page_no")?;
        let limit = int_field(&params.limit, "limit")?;

        let pagination = match (page_no, limit) {
            (Some(page_no), Some(limit)) if page_no > 0 && limit > 0 => Some(Pagination {
                page_no: page_no as u64,
                limit: limit as u64,
            }),
            (Some(_), Some(_)) => {
                return Err(Error::InvalidFilter(
                    "page_no and limit must be positive".to_string(),
                ));
            }
            _ => None,
        };

        let sort_by = match text_field(&params.order_by) {
            Some(field) => SortField::parse(&field)?,
            None => SortField::default(),
        };
        let sort_order = match text_field(&params.sort_order) {
            Some(order) => SortOrder::parse(&order)?,
            None => SortOrder::default(),
        };

        Ok(Self {
            pagination,
            sort_by,
            sort_order,
            application_id: int_field(&params.application_id, "application_id")?,
            application_name: text_field(&params.application_name),
            application_status: text_field(&params.application_status),
            created_by: text_field(&params.created_by),
            form_id: text_field(&params.form_id),
            form_name: text_field(&params.form_name),
            created_from: date_field(&params.created_from, "created_from")?,
            created_to: date_field(&params.created_to, "created_to")?,
            modified_from: date_field(&params.modified_from, "modified_from")?,
            modified_to: date_field(&params.modified_to, "modified_to")?,
        })
    }

    /// Set the page (1-based) and page size.
    pub fn page(mut self, page_no: u64, limit: u64) -> Self {
        self.pagination = Some(Pagination { page_no, limit });
        self
    }

    /// Set the sort field.
    pub fn sort_by(mut self, field: SortField) -> Self {
        self.sort_by = field;
        self
    }

    /// Set the sort order.
    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    /// Restrict to one application ID.
    pub fn application_id(mut self, id: i64) -> Self {
        self.application_id = Some(id);
        self
    }

    /// Check if any predicate (not pagination or sort) is set.
    pub fn has_predicates(&self) -> bool {
        self.application_id.is_some()
            || self.application_name.is_some()
            || self.application_status.is_some()
            || self.created_by.is_some()
            || self.form_id.is_some()
            || self.form_name.is_some()
            || self.created_from.is_some()
            || self.created_to.is_some()
            || self.modified_from.is_some()
            || self.modified_to.is_some()
    }
}

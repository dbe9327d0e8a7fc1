//! Application persistence
//!
//! [`ApplicationRepository`] is the seam between the service and storage. Every
//! listing goes through [`ApplicationRepository::find_applications`] with an
//! [`ApplicationScope`] and a [`QueryFilter`], so all access patterns share one
//! filter, sort and pagination contract.

use chrono::{DateTime, Utc};

use crate::error::StoreError;

pub mod filter;
pub mod models;
pub mod sqlite;

pub use filter::{
    Pagination, QueryFilter, QueryParams, RawValue, SortField, SortOrder, parse_datetime,
};
pub use models::{
    ACTIVE_MAPPER_STATUS, AggregatedApplication, Application, ApplicationUpdate,
    FormProcessMapper, NEW_APPLICATION_STATUS, NewApplication, NewFormProcessMapper,
};
pub use sqlite::SqliteStore;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Which applications a listing may see
#[derive(Debug, Clone, PartialEq)]
pub enum ApplicationScope {
    /// Every application (administrative view)
    All,
    /// Applications whose name is one of the authorized form names
    FormNames(Vec<String>),
    /// Applications created by one user
    Owner(String),
    /// Applications created by any member of a group
    Owners(Vec<String>),
    /// Applications with one of the given IDs
    Ids(Vec<i64>),
    /// Applications submitted against one form
    FormId(String),
    /// Applications submitted against one form by one user
    FormIdOwner { form_id: String, owner: String },
}

/// Timestamp an aggregation buckets on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    Created,
    Modified,
}

/// Grouping dimension of an aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateAxis {
    /// Count per form mapper
    Mapper,
    /// Count per status within one mapper
    Status { mapper_id: i64 },
}

/// Aggregation request over an inclusive date range
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateQuery {
    pub axis: AggregateAxis,
    pub time_field: TimeField,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Persistence operations the service depends on.
///
/// Implementations must make [`update`](Self::update) atomic per record:
/// concurrent readers see either the old row or the new one.
pub trait ApplicationRepository: Send + Sync {
    /// Insert an application, assigning its ID and timestamps
    fn create(&self, new: &NewApplication) -> StoreResult<Application>;

    /// Apply a partial update; `None` when the application does not exist
    fn update(&self, id: i64, update: &ApplicationUpdate) -> StoreResult<Option<Application>>;

    fn find_by_id(&self, id: i64) -> StoreResult<Option<Application>>;

    /// One page of applications in scope plus the total matching count
    fn find_applications(
        &self,
        scope: &ApplicationScope,
        filter: &QueryFilter,
    ) -> StoreResult<(Vec<Application>, u64)>;

    /// Number of applications in scope, without any filter
    fn count_applications(&self, scope: &ApplicationScope) -> StoreResult<u64>;

    /// Distinct statuses currently in use
    fn find_all_statuses(&self) -> StoreResult<Vec<String>>;

    fn aggregate(&self, query: &AggregateQuery) -> StoreResult<Vec<AggregatedApplication>>;

    /// Latest active mapper for a form
    fn find_mapper_by_form_id(&self, form_id: &str) -> StoreResult<Option<FormProcessMapper>>;

    /// Mapper an application was created under
    fn find_mapper_by_application_id(&self, id: i64) -> StoreResult<Option<FormProcessMapper>>;

    fn create_mapper(&self, new: &NewFormProcessMapper) -> StoreResult<FormProcessMapper>;
}

//! Dashboard aggregations over an inclusive date range

use chrono::{DateTime, Utc};

use super::ApplicationService;
use crate::error::Result;
use crate::models::AggregatedView;
use crate::store::{AggregateAxis, AggregateQuery, TimeField};

impl ApplicationService {
    fn aggregate(
        &self,
        axis: AggregateAxis,
        time_field: TimeField,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<AggregatedView>> {
        let query = AggregateQuery {
            axis,
            time_field,
            from,
            to,
        };
        let rows = self.repo.aggregate(&query)?;
        let view = match axis {
            AggregateAxis::Mapper => AggregatedView::by_mapper,
            AggregateAxis::Status { .. } => AggregatedView::by_status,
        };
        Ok(rows.into_iter().map(view).collect())
    }

    /// Applications created in range, counted per mapper.
    pub fn get_aggregated_applications(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<AggregatedView>> {
        self.aggregate(AggregateAxis::Mapper, TimeField::Created, from, to)
    }

    /// Applications modified in range, counted per mapper.
    pub fn get_current_aggregated_applications(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<AggregatedView>> {
        self.aggregate(AggregateAxis::Mapper, TimeField::Modified, from, to)
    }

    /// Applications of one mapper created in range, counted per status.
    pub fn get_aggregated_application_status(
        &self,
        mapper_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<AggregatedView>> {
        self.aggregate(AggregateAxis::Status { mapper_id }, TimeField::Created, from, to)
    }

    /// Applications of one mapper modified in range, counted per status.
    pub fn get_current_aggregated_application_status(
        &self,
        mapper_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<AggregatedView>> {
        self.aggregate(AggregateAxis::Status { mapper_id }, TimeField::Modified, from, to)
    }
}

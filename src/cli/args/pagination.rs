//! Pagination argument types for CLI commands

use clap::Args;

use crate::store::{QueryParams, RawValue};

use super::SortDir;

/// Largest page number or size the store can bind
const MAX_PAGE_ARG: u64 = i64::MAX as u64;

fn bind_value(value: u64) -> RawValue {
    RawValue::Int(i64::try_from(value).unwrap_or(i64::MAX))
}

/// Shared pagination arguments for list commands.
///
/// Flatten this into any command that supports pagination:
/// ```ignore
/// List {
///     #[command(flatten)]
///     pagination: PaginationArgs,
/// }
/// ```
#[derive(Args, Debug, Default, Clone)]
pub struct PaginationArgs {
    /// Maximum results per page
    #[arg(long, short = 'n', value_parser = clap::value_parser!(u64).range(1..=MAX_PAGE_ARG))]
    pub limit: Option<u64>,

    /// Page number (1-indexed)
    #[arg(long, short = 'p', value_parser = clap::value_parser!(u64).range(1..=MAX_PAGE_ARG))]
    pub page: Option<u64>,

    /// Field to sort by (id, applicationName, applicationStatus, formId,
    /// formName, createdBy, created, modified)
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort direction (asc, desc)
    #[arg(long, value_enum, hide_possible_values = true)]
    pub sort_dir: Option<SortDir>,
}

impl PaginationArgs {
    /// Convert CLI args to query params.
    ///
    /// A page without a limit uses `default_page_size`; a limit without a page
    /// starts at page 1. Neither returns every result.
    pub fn to_params(&self, default_page_size: u64) -> QueryParams {
        let (page, limit) = match (self.page, self.limit) {
            (None, None) => (None, None),
            (page, limit) => (
                Some(page.unwrap_or(1)),
                Some(limit.unwrap_or(default_page_size)),
            ),
        };

        let sort_order = self.sort_dir.map(|dir| match dir {
            SortDir::Asc => RawValue::from("asc"),
            SortDir::Desc => RawValue::from("desc"),
        });

        QueryParams {
            page_no: page.map(bind_value),
            limit: limit.map(bind_value),
            order_by: self.sort_by.clone().map(RawValue::Text),
            sort_order,
            ..QueryParams::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Pagination, QueryFilter, SortField, SortOrder};

    #[test]
    fn test_no_paging_returns_everything() {
        let params = PaginationArgs::default().to_params(25);
        let filter = QueryFilter::from_params(&params).unwrap();
        assert!(filter.pagination.is_none());
    }

    #[test]
    fn test_page_uses_default_size() {
        let args = PaginationArgs {
            page: Some(3),
            ..Default::default()
        };
        let filter = QueryFilter::from_params(&args.to_params(25)).unwrap();
        assert_eq!(
            filter.pagination,
            Some(Pagination {
                page_no: 3,
                limit: 25
            })
        );
    }

    #[test]
    fn test_sort_args() {
        let args = PaginationArgs {
            limit: Some(5),
            sort_by: Some("created".to_string()),
            sort_dir: Some(SortDir::Asc),
            ..Default::default()
        };
        let filter = QueryFilter::from_params(&args.to_params(25)).unwrap();
        assert_eq!(filter.pagination.unwrap().page_no, 1);
        assert_eq!(filter.sort_by, SortField::Created);
        assert_eq!(filter.sort_order, SortOrder::Asc);
    }

    #[derive(clap::Parser)]
    struct PagedCommand {
        #[command(flatten)]
        pagination: PaginationArgs,
    }

    #[test]
    fn test_out_of_range_page_is_a_usage_error() {
        use clap::Parser;

        assert!(PagedCommand::try_parse_from(["list", "--page", "9223372036854775808"]).is_err());
        assert!(PagedCommand::try_parse_from(["list", "--limit", "0"]).is_err());

        let parsed =
            PagedCommand::try_parse_from(["list", "--page", "9223372036854775807"]).unwrap();
        assert_eq!(parsed.pagination.page, Some(i64::MAX as u64));
    }

    #[test]
    fn test_oversized_default_page_size_saturates() {
        let args = PaginationArgs {
            page: Some(2),
            ..Default::default()
        };
        let filter = QueryFilter::from_params(&args.to_params(u64::MAX)).unwrap();
        assert_eq!(
            filter.pagination,
            Some(Pagination {
                page_no: 2,
                limit: i64::MAX as u64
            })
        );
    }
}

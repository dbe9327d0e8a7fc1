//! Filter argument types for CLI commands

use chrono::{DateTime, Duration, Utc};
use clap::Args;

use crate::error::{Error, Result};
use crate::store::{QueryParams, RawValue, parse_datetime};

/// Filter arguments for application list commands.
///
/// Dates accept RFC 3339 timestamps or `YYYY-MM-DD`.
#[derive(Args, Debug, Default, Clone)]
pub struct ApplicationFilterArgs {
    /// Filter by application ID
    #[arg(long)]
    pub id: Option<String>,

    /// Filter by application name (substring match, case-insensitive)
    #[arg(long)]
    pub name: Option<String>,

    /// Filter by status
    #[arg(long)]
    pub status: Option<String>,

    /// Filter by creator
    #[arg(long)]
    pub created_by: Option<String>,

    /// Filter by form name
    #[arg(long)]
    pub form_name: Option<String>,

    /// Created on or after
    #[arg(long)]
    pub created_from: Option<String>,

    /// Created on or before
    #[arg(long)]
    pub created_to: Option<String>,

    /// Modified on or after
    #[arg(long)]
    pub modified_from: Option<String>,

    /// Modified on or before
    #[arg(long)]
    pub modified_to: Option<String>,
}

impl ApplicationFilterArgs {
    /// Copy the filters into `params`, leaving pagination untouched.
    pub fn apply(&self, params: &mut QueryParams) {
        let text = |v: &Option<String>| v.clone().map(RawValue::Text);
        params.application_id = text(&self.id);
        params.application_name = text(&self.name);
        params.application_status = text(&self.status);
        params.created_by = text(&self.created_by);
        params.form_name = text(&self.form_name);
        params.created_from = text(&self.created_from);
        params.created_to = text(&self.created_to);
        params.modified_from = text(&self.modified_from);
        params.modified_to = text(&self.modified_to);
    }
}

/// Date range for metrics commands
#[derive(Args, Debug, Default, Clone)]
pub struct DateRangeArgs {
    /// Range start (default: 30 days before the end)
    #[arg(long)]
    pub from: Option<String>,

    /// Range end (default: now)
    #[arg(long)]
    pub to: Option<String>,
}

fn parse_bound(flag: &str, value: &str) -> Result<DateTime<Utc>> {
    parse_datetime(value)
        .ok_or_else(|| Error::InvalidFilter(format!("--{} is not a date: {:?}", flag, value)))
}

impl DateRangeArgs {
    /// Resolve the inclusive range.
    pub fn resolve(&self) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        let to = match &self.to {
            Some(value) => parse_bound("to", value)?,
            None => Utc::now(),
        };
        let from = match &self.from {
            Some(value) => parse_bound("from", value)?,
            None => to - Duration::days(30),
        };
        if from > to {
            return Err(Error::InvalidFilter("--from is after --to".to_string()));
        }
        Ok((from, to))
    }
}

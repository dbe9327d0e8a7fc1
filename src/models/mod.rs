//! Output models
//!
//! Views are the externally visible shapes of stored records (camelCase JSON);
//! rows are their table renderings.

pub mod aggregate;
pub mod application;
pub mod common;
pub mod form_url;
pub mod mapper;

pub use aggregate::{AggregatedRow, AggregatedView};
pub use application::{ApplicationRow, ApplicationView, StatusList, StatusRow};
pub use form_url::{FormUrlParts, apply_attributes, apply_custom_attributes};
pub use mapper::{MapperRow, MapperView};

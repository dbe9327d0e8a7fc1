//! Output formatting for CLI results
//!
//! Views serialize into the JSON envelope; each view has a row type for
//! table output.

use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::service::Page;

pub mod json;
pub mod table;

/// Print a list of views
pub fn print_list<V, R>(items: &[V], format: OutputFormat) -> Result<()>
where
    V: Serialize,
    R: Tabled + for<'a> From<&'a V>,
{
    let output = match format {
        OutputFormat::Table => {
            let rows: Vec<R> = items.iter().map(|item| R::from(item)).collect();
            table::format_table(&rows)
        }
        OutputFormat::Json => json::format_json(items)?,
    };
    println!("{}", output);
    Ok(())
}

/// Print one page of views with its total
pub fn print_page<V, R>(page: &Page<V>, format: OutputFormat) -> Result<()>
where
    V: Serialize,
    R: Tabled + for<'a> From<&'a V>,
{
    let output = match format {
        OutputFormat::Table => {
            let rows: Vec<R> = page.items.iter().map(|item| R::from(item)).collect();
            table::format_table_page(&rows, page.total)
        }
        OutputFormat::Json => json::format_json_page(&page.items, page.total)?,
    };
    println!("{}", output);
    Ok(())
}

/// Print a single view
pub fn print_item<V, R>(item: &V, format: OutputFormat) -> Result<()>
where
    V: Serialize,
    R: Tabled + for<'a> From<&'a V>,
{
    let output = match format {
        OutputFormat::Table => table::format_table(&[R::from(item)]),
        OutputFormat::Json => json::format_json(item)?,
    };
    println!("{}", output);
    Ok(())
}

//! Table output formatting

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

/// Format data as a table
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    if data.is_empty() {
        return "No results found.".to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

/// Format one page of rows with a "Showing N of TOTAL" footer
pub fn format_table_page<T: Tabled>(data: &[T], total: u64) -> String {
    if data.is_empty() {
        return format_table(data);
    }
    format!(
        "{}\nShowing {} of {}",
        format_table(data),
        data.len(),
        total
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Tabled)]
    struct Row {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "STATUS")]
        status: String,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                id: 1,
                status: "new".to_string(),
            },
            Row {
                id: 2,
                status: "approved".to_string(),
            },
        ]
    }

    #[test]
    fn test_format_table_empty() {
        let items: Vec<Row> = vec![];
        assert_eq!(format_table(&items), "No results found.");
        assert_eq!(format_table_page(&items, 0), "No results found.");
    }

    #[test]
    fn test_format_table_rows_and_style() {
        let result = format_table(&rows());

        assert!(result.contains("STATUS"));
        assert!(result.contains("approved"));
        // Rounded style uses ╭ for top-left corner
        assert!(result.contains("╭"));
        assert!(result.contains("╰"));
    }

    #[test]
    fn test_page_footer() {
        let result = format_table_page(&rows(), 17);
        assert!(result.ends_with("Showing 2 of 17"));
    }
}

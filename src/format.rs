use crate::executor::ExecutionResult;
use crate::row::Row;

/// Renders a result for people to read. Row sets become a box-drawn grid
/// headed by the first row's columns.
pub fn format_result(result: &ExecutionResult) -> String {
    match result {
        ExecutionResult::Count { count } => count.to_string(),
        ExecutionResult::Loaded {
            table_name,
            filename,
        } => format!(
            "Table '{}' loaded successfully from '{}'",
            table_name, filename
        ),
        ExecutionResult::Rows { rows } if rows.is_empty() => "No results found".to_string(),
        ExecutionResult::Rows { rows } => format_rows(rows),
    }
}

fn format_rows(rows: &[Row]) -> String {
    let columns: Vec<&str> = rows.first().map(|row| row.columns().collect()).unwrap_or_default();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| columns.iter().map(|column| row.get_as_string(column)).collect())
        .collect();

    // Column widths
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&border(&widths, '┌', '┬', '┐'));
    out.push_str(&line(&widths, columns.iter().copied()));
    out.push_str(&border(&widths, '├', '┼', '┤'));
    for row in &cells {
        out.push_str(&line(&widths, row.iter().map(String::as_str)));
    }
    out.push_str(&border(&widths, '└', '┴', '┘'));

    let noun = if rows.len() == 1 { "row" } else { "rows" };
    out.push_str(&format!("({} {})", rows.len(), noun));
    out
}

fn border(widths: &[usize], left: char, middle: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|width| "─".repeat(width + 2)).collect();
    format!("{}{}{}\n", left, segments.join(&middle.to_string()), right)
}

fn line<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    let padded: Vec<String> = widths
        .iter()
        .zip(cells)
        .map(|(width, cell)| {
            let fill = width - cell.chars().count();
            format!(" {}{} ", cell, " ".repeat(fill))
        })
        .collect();
    format!("│{}│\n", padded.join("│"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_results() {
        assert_eq!(format_result(&ExecutionResult::Count { count: 4 }), "4");
        assert_eq!(
            format_result(&ExecutionResult::Loaded {
                table_name: "employees".to_string(),
                filename: "data/employees.csv".to_string(),
            }),
            "Table 'employees' loaded successfully from 'data/employees.csv'"
        );
        assert_eq!(
            format_result(&ExecutionResult::Rows { rows: Vec::new() }),
            "No results found"
        );
    }

    #[test]
    fn test_grid_layout() {
        let rows = vec![
            Row::from_values([("name", "Bob"), ("age", "35")]),
            Row::from_values([("name", "Alice"), ("age", "28")]),
        ];
        let expected = "\
┌───────┬─────┐
│ name  │ age │
├───────┼─────┤
│ Bob   │ 35  │
│ Alice │ 28  │
└───────┴─────┘
(2 rows)";
        assert_eq!(format_result(&ExecutionResult::Rows { rows }), expected);
    }

    #[test]
    fn test_single_row_footer_and_unicode_width() {
        let rows = vec![Row::from_values([("city", "Zürich")])];
        let output = format_result(&ExecutionResult::Rows { rows });
        assert!(output.contains("│ Zürich │"));
        assert!(output.ends_with("(1 row)"));
    }
}

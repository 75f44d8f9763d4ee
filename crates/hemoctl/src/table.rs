//! Plain text table rendering
//!
//! Left-aligned columns separated by two spaces, header underlined with
//! dashes. Works for both typed listings and generic search results.

use hemobank_common::ResultTable;

/// Build a ResultTable from a column list and stringified rows
pub fn table(columns: &[&str], rows: Vec<Vec<String>>) -> ResultTable {
    ResultTable {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        rows,
    }
}

/// Render a table to a string
pub fn render(table: &ResultTable) -> String {
    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.chars().count()).collect();
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    for (i, column) in table.columns.iter().enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        out.push_str(&pad(column, widths[i]));
    }
    out.push('\n');
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        out.push_str(&"-".repeat(*width));
    }
    for row in &table.rows {
        out.push('\n');
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                out.push_str("  ");
            }
            out.push_str(&pad(cell, widths[i]));
        }
    }
    out
}

/// Print a table to stdout
pub fn print(table: &ResultTable) {
    println!("{}", render(table));
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let mut padded = text.to_string();
    padded.push_str(&" ".repeat(width.saturating_sub(len)));
    padded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align_to_widest_cell() {
        let t = table(
            &["Id", "Name"],
            vec![
                vec!["DON100".to_string(), "Asha".to_string()],
                vec!["D2".to_string(), "Ravi".to_string()],
            ],
        );
        let rendered = render(&t);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Id      Name");
        assert_eq!(lines[1], "------  ----");
        assert_eq!(lines[2], "DON100  Asha");
        assert_eq!(lines[3], "D2      Ravi");
    }
}

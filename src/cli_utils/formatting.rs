use colored::Colorize;

use crate::expenses::db_types::ExpenseRecord;
use crate::utils::commons::TIMESTAMP_FORMAT;

/// Format a table with columns and rows
pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let col_widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .fold(header.chars().count(), usize::max)
        })
        .collect();

    let render = |cells: Vec<String>| {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:width$}", cell, width = col_widths.get(i).copied().unwrap_or(0)))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    let header_line = render(headers.iter().map(|h| h.to_string()).collect());
    let mut out = vec![
        header_line.bold().to_string(),
        "-".repeat(header_line.chars().count()),
    ];
    out.extend(rows.iter().map(|row| render(row.clone())));

    out.join("\n")
}

pub fn format_expense_rows(rows: &[ExpenseRecord]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| {
            vec![
                row.id.to_string(),
                row.item.clone(),
                row.amount.to_string(),
                row.category.clone(),
                row.created_at.format(TIMESTAMP_FORMAT).to_string(),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_are_padded_to_widest_cell() {
        colored::control::set_override(false);
        let table = format_table(
            &["id", "item"],
            &[
                vec!["1".to_string(), "Coffee".to_string()],
                vec!["22".to_string(), "Tea".to_string()],
            ],
        );

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "id | item  ");
        assert_eq!(lines[1], "-----------");
        assert_eq!(lines[2], "1  | Coffee");
        assert_eq!(lines[3], "22 | Tea   ");
    }
}

use crate::expenses::db_types::ExpenseRecord;
use crate::utils::commons::TIMESTAMP_FORMAT;
use crate::utils::error::ActionError;

pub const EXPORT_FILENAME: &str = "expenses.csv";
pub const EXPORT_COLUMNS: [&str; 4] = ["item", "amount", "category", "created_at"];

/// Renders the rows as CSV. The header row is always written, so N rows give
/// N + 1 lines.
pub fn write_csv(rows: &[ExpenseRecord]) -> Result<String, ActionError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(EXPORT_COLUMNS)
        .map_err(|e| ActionError::Internal(format!("csv write failed: {}", e)))?;

    for row in rows {
        let amount = row.amount.to_string();
        let created_at = row.created_at.format(TIMESTAMP_FORMAT).to_string();
        writer
            .write_record([row.item.as_str(), amount.as_str(), row.category.as_str(), created_at.as_str()])
            .map_err(|e| ActionError::Internal(format!("csv write failed: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ActionError::Internal(format!("csv flush failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| ActionError::Internal(e.to_string()))
}

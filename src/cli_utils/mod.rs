// Shared helpers for the admin CLI
pub mod formatting;

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;

pub use formatting::{format_expense_rows, format_table};

/// Confirm a dangerous operation
pub fn confirm(message: &str) -> Result<bool> {
    let answer = Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()?;
    Ok(answer)
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{}", format!("✓ {}", message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{}", format!("ℹ {}", message).bright_cyan());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{}", format!("✗ {}", message).red());
}

// Public library interface for expense-tracker
pub mod accounts;
pub mod action_router;
pub mod api;
pub mod cli_utils;
pub mod expenses;
pub mod schema;
pub mod sessions;
pub mod utils;

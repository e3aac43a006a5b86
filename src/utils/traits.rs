use crate::accounts::db_types::{CreateUser, UserRecord};
use crate::expenses::db_types::{CreateExpense, ExpenseChanges, ExpenseRecord};
use crate::utils::app_config::AppConfig;
use crate::utils::error::{ActionError, StoreError};

pub trait ActionProcessor<Context, Output> {
    async fn process(&self, app_config: &AppConfig, context: &mut Context) -> Result<Output, ActionError>;
}

/// Persistence seam for users and their expenses.
///
/// Every expense query is scoped by `owner`, the id resolved from the
/// caller's session. Implementations must never match an expense row on its
/// id alone.
pub trait Repository: Send + Sync {
    fn create_user(&self, user: &CreateUser) -> Result<UserRecord, StoreError>;

    fn find_user_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Removes the user and, through the foreign key cascade, all of their expenses.
    fn delete_user(&self, user_id: i32) -> Result<usize, StoreError>;

    fn insert_expense(&self, expense: &CreateExpense) -> Result<ExpenseRecord, StoreError>;

    /// Newest first (id descending).
    fn list_expenses(&self, owner: i32) -> Result<Vec<ExpenseRecord>, StoreError>;

    fn get_expense(&self, owner: i32, expense_id: i32) -> Result<Option<ExpenseRecord>, StoreError>;

    /// Returns the number of rows touched, zero when the id is not owned by `owner`.
    fn update_expense(
        &self,
        owner: i32,
        expense_id: i32,
        changes: &ExpenseChanges,
    ) -> Result<usize, StoreError>;

    fn delete_expense(&self, owner: i32, expense_id: i32) -> Result<usize, StoreError>;

    /// Insertion order (id ascending), used for CSV export.
    fn export_expenses(&self, owner: i32) -> Result<Vec<ExpenseRecord>, StoreError>;
}

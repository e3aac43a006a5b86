use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::accounts::db_types::{CreateUser, UserRecord};
use crate::expenses::db_types::{CreateExpense, ExpenseChanges, ExpenseRecord};
use crate::utils::error::StoreError;
use crate::utils::traits::Repository;

#[derive(Default)]
struct MemoryState {
    users: Vec<UserRecord>,
    expenses: Vec<ExpenseRecord>,
    next_user_id: i32,
    next_expense_id: i32,
}

/// In-process repository with the same uniqueness and cascade rules as the
/// Postgres schema. Backs the test suite.
#[derive(Default)]
pub struct MemoryRepository {
    state: Mutex<MemoryState>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("memory repository lock poisoned".to_string()))
    }

    pub fn user_count(&self) -> Result<usize, StoreError> {
        Ok(self.state()?.users.len())
    }

    pub fn expense_count(&self) -> Result<usize, StoreError> {
        Ok(self.state()?.expenses.len())
    }
}

impl Repository for MemoryRepository {
    fn create_user(&self, user: &CreateUser) -> Result<UserRecord, StoreError> {
        let mut state = self.state()?;
        if state.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::UniqueViolation);
        }

        state.next_user_id += 1;
        let record = UserRecord {
            id: state.next_user_id,
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
        };
        state.users.push(record.clone());

        Ok(record)
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let state = self.state()?;
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    fn delete_user(&self, user_id: i32) -> Result<usize, StoreError> {
        let mut state = self.state()?;
        let before = state.users.len();
        state.users.retain(|u| u.id != user_id);
        let removed = before - state.users.len();
        if removed > 0 {
            state.expenses.retain(|e| e.user_id != user_id);
        }

        Ok(removed)
    }

    fn insert_expense(&self, expense: &CreateExpense) -> Result<ExpenseRecord, StoreError> {
        let mut state = self.state()?;
        if !state.users.iter().any(|u| u.id == expense.user_id) {
            return Err(StoreError::Query(format!(
                "user {} does not exist",
                expense.user_id
            )));
        }

        state.next_expense_id += 1;
        let record = ExpenseRecord {
            id: state.next_expense_id,
            user_id: expense.user_id,
            item: expense.item.clone(),
            amount: expense.amount.clone(),
            category: expense.category.clone(),
            created_at: Utc::now().naive_utc(),
        };
        state.expenses.push(record.clone());

        Ok(record)
    }

    fn list_expenses(&self, owner: i32) -> Result<Vec<ExpenseRecord>, StoreError> {
        let mut rows = self.export_expenses(owner)?;
        rows.reverse();
        Ok(rows)
    }

    fn get_expense(&self, owner: i32, expense_id: i32) -> Result<Option<ExpenseRecord>, StoreError> {
        let state = self.state()?;
        Ok(state
            .expenses
            .iter()
            .find(|e| e.id == expense_id && e.user_id == owner)
            .cloned())
    }

    fn update_expense(
        &self,
        owner: i32,
        expense_id: i32,
        changes: &ExpenseChanges,
    ) -> Result<usize, StoreError> {
        let mut state = self.state()?;
        match state
            .expenses
            .iter_mut()
            .find(|e| e.id == expense_id && e.user_id == owner)
        {
            Some(row) => {
                row.item = changes.item.clone();
                row.amount = changes.amount.clone();
                row.category = changes.category.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete_expense(&self, owner: i32, expense_id: i32) -> Result<usize, StoreError> {
        let mut state = self.state()?;
        let before = state.expenses.len();
        state
            .expenses
            .retain(|e| !(e.id == expense_id && e.user_id == owner));
        Ok(before - state.expenses.len())
    }

    fn export_expenses(&self, owner: i32) -> Result<Vec<ExpenseRecord>, StoreError> {
        let state = self.state()?;
        let mut rows: Vec<ExpenseRecord> = state
            .expenses
            .iter()
            .filter(|e| e.user_id == owner)
            .cloned()
            .collect();
        rows.sort_by_key(|e| e.id);
        Ok(rows)
    }
}

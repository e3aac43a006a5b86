use anyhow::Result;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::PgConnection;

use crate::accounts::db_types::{CreateUser, UserRecord};
use crate::accounts::operations as account_ops;
use crate::expenses::db_types::{CreateExpense, ExpenseChanges, ExpenseRecord};
use crate::expenses::operations as expense_ops;
use crate::utils::error::StoreError;
use crate::utils::traits::Repository;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY,
    username VARCHAR(50) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL
)"#;

const CREATE_EXPENSES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS expenses (
    id SERIAL PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    item VARCHAR(100) NOT NULL,
    amount NUMERIC(10, 2) NOT NULL,
    category VARCHAR(50) NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT NOW()
)"#;

const CREATE_EXPENSES_OWNER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS expenses_user_id_idx ON expenses (user_id)";

pub fn create_pool(database_url: &str) -> Result<DbPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::new(manager)?;

    Ok(pool)
}

pub fn get_conn(pool: &DbPool) -> Result<PooledConnection<ConnectionManager<PgConnection>>, StoreError> {
    let conn = pool.get()?;

    Ok(conn)
}

/// Creates both tables if they are missing. Safe to run on every start.
pub fn ensure_schema(conn: &mut PgConnection) -> QueryResult<()> {
    for statement in [
        CREATE_USERS_TABLE,
        CREATE_EXPENSES_TABLE,
        CREATE_EXPENSES_OWNER_INDEX,
    ] {
        diesel::sql_query(statement).execute(conn)?;
    }

    Ok(())
}

/// Postgres-backed repository. Each call checks a connection out of the pool
/// and hands it back when the call returns, error paths included.
#[derive(Clone)]
pub struct PgRepository {
    pool: DbPool,
}

impl PgRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl Repository for PgRepository {
    fn create_user(&self, user: &CreateUser) -> Result<UserRecord, StoreError> {
        let mut conn = get_conn(&self.pool)?;
        account_ops::create_user(&mut conn, user)
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let mut conn = get_conn(&self.pool)?;
        account_ops::find_user_by_username(&mut conn, username)
    }

    fn delete_user(&self, user_id: i32) -> Result<usize, StoreError> {
        let mut conn = get_conn(&self.pool)?;
        account_ops::delete_user(&mut conn, user_id)
    }

    fn insert_expense(&self, expense: &CreateExpense) -> Result<ExpenseRecord, StoreError> {
        let mut conn = get_conn(&self.pool)?;
        expense_ops::insert_expense(&mut conn, expense)
    }

    fn list_expenses(&self, owner: i32) -> Result<Vec<ExpenseRecord>, StoreError> {
        let mut conn = get_conn(&self.pool)?;
        expense_ops::list_expenses(&mut conn, owner)
    }

    fn get_expense(&self, owner: i32, expense_id: i32) -> Result<Option<ExpenseRecord>, StoreError> {
        let mut conn = get_conn(&self.pool)?;
        expense_ops::get_expense(&mut conn, owner, expense_id)
    }

    fn update_expense(
        &self,
        owner: i32,
        expense_id: i32,
        changes: &ExpenseChanges,
    ) -> Result<usize, StoreError> {
        let mut conn = get_conn(&self.pool)?;
        expense_ops::update_expense(&mut conn, owner, expense_id, changes)
    }

    fn delete_expense(&self, owner: i32, expense_id: i32) -> Result<usize, StoreError> {
        let mut conn = get_conn(&self.pool)?;
        expense_ops::delete_expense(&mut conn, owner, expense_id)
    }

    fn export_expenses(&self, owner: i32) -> Result<Vec<ExpenseRecord>, StoreError> {
        let mut conn = get_conn(&self.pool)?;
        expense_ops::export_expenses(&mut conn, owner)
    }
}

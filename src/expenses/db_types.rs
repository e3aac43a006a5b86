use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use crate::schema::expenses as ExpensesTable;
use crate::utils::commons::sql_datetime;

#[derive(Serialize, Deserialize, Queryable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = ExpensesTable)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ExpenseRecord {
    pub id: i32,
    pub user_id: i32,
    pub item: String,
    pub amount: BigDecimal,
    pub category: String,
    #[serde(with = "sql_datetime")]
    pub created_at: NaiveDateTime,
}

/// `created_at` is filled in by the database default.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = ExpensesTable)]
pub struct CreateExpense {
    pub user_id: i32,
    pub item: String,
    pub amount: BigDecimal,
    pub category: String,
}

/// The only columns an update may touch.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = ExpensesTable)]
pub struct ExpenseChanges {
    pub item: String,
    pub amount: BigDecimal,
    pub category: String,
}

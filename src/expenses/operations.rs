use diesel::prelude::*;

use crate::expenses::db_types::{CreateExpense, ExpenseChanges, ExpenseRecord};
use crate::utils::commons::DbConn;
use crate::utils::error::StoreError;

pub fn insert_expense(conn: DbConn, args: &CreateExpense) -> Result<ExpenseRecord, StoreError> {
    use crate::schema::expenses::table as ExpensesTable;

    let record = diesel::insert_into(ExpensesTable)
        .values(args)
        .get_result::<ExpenseRecord>(conn)?;

    Ok(record)
}

pub fn list_expenses(conn: DbConn, owner: i32) -> Result<Vec<ExpenseRecord>, StoreError> {
    use crate::schema::expenses::dsl::*;

    let rows = expenses
        .filter(user_id.eq(owner))
        .order(id.desc())
        .load::<ExpenseRecord>(conn)?;

    Ok(rows)
}

pub fn get_expense(conn: DbConn, owner: i32, expense_id: i32) -> Result<Option<ExpenseRecord>, StoreError> {
    use crate::schema::expenses::dsl::*;

    let row = expenses
        .filter(id.eq(expense_id))
        .filter(user_id.eq(owner))
        .first::<ExpenseRecord>(conn)
        .optional()?;

    Ok(row)
}

pub fn update_expense(
    conn: DbConn,
    owner: i32,
    expense_id: i32,
    changes: &ExpenseChanges,
) -> Result<usize, StoreError> {
    use crate::schema::expenses::dsl::*;

    let updated = diesel::update(expenses.filter(id.eq(expense_id)).filter(user_id.eq(owner)))
        .set(changes)
        .execute(conn)?;

    Ok(updated)
}

pub fn delete_expense(conn: DbConn, owner: i32, expense_id: i32) -> Result<usize, StoreError> {
    use crate::schema::expenses::dsl::*;

    let removed = diesel::delete(expenses.filter(id.eq(expense_id)).filter(user_id.eq(owner)))
        .execute(conn)?;

    Ok(removed)
}

pub fn export_expenses(conn: DbConn, owner: i32) -> Result<Vec<ExpenseRecord>, StoreError> {
    use crate::schema::expenses::dsl::*;

    let rows = expenses
        .filter(user_id.eq(owner))
        .order(id.asc())
        .load::<ExpenseRecord>(conn)?;

    Ok(rows)
}

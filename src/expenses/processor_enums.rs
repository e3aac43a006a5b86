use bigdecimal::BigDecimal;
use serde::Serialize;
use crate::expenses::db_types::{ExpenseChanges, ExpenseRecord};
use crate::expenses::report::ExpenseReport;
use crate::utils::error::ActionError;
use crate::utils::validation::{RequestFields, parse_amount, parse_expense_id, validate_max_len};

pub const MAX_ITEM_LEN: usize = 100;
pub const MAX_CATEGORY_LEN: usize = 50;

#[derive(Debug, Clone)]
pub struct ExpenseFieldsInputArgs {
    pub item: String,
    pub amount: BigDecimal,
    pub category: String,
}

impl ExpenseFieldsInputArgs {
    pub fn from_fields(fields: &RequestFields) -> Result<Self, ActionError> {
        let (Some(item), Some(raw_amount), Some(category)) = (
            fields.trimmed("item"),
            fields.trimmed("amount"),
            fields.trimmed("category"),
        ) else {
            return Err(ActionError::validation("All fields are required"));
        };

        validate_max_len(&item, MAX_ITEM_LEN, "Item")?;
        validate_max_len(&category, MAX_CATEGORY_LEN, "Category")?;
        let amount = parse_amount(&raw_amount)?;

        Ok(Self {
            item,
            amount,
            category,
        })
    }

    pub fn to_changes(&self) -> ExpenseChanges {
        ExpenseChanges {
            item: self.item.clone(),
            amount: self.amount.clone(),
            category: self.category.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdateExpenseInputArgs {
    pub id: i32,
    pub fields: ExpenseFieldsInputArgs,
}

impl UpdateExpenseInputArgs {
    pub fn from_fields(fields: &RequestFields) -> Result<Self, ActionError> {
        Ok(Self {
            id: parse_expense_id(fields)?,
            fields: ExpenseFieldsInputArgs::from_fields(fields)?,
        })
    }
}

#[derive(Debug, Clone)]
pub enum ExpensesProcessorInput {
    Add(ExpenseFieldsInputArgs),
    List,
    Get(i32),
    Update(UpdateExpenseInputArgs),
    Delete(i32),
    Export,
    Report,
}

/// The authenticated owner every expense query is scoped to.
#[derive(Debug, Clone, Copy)]
pub struct OwnerContext {
    pub user_id: i32,
}

#[derive(Serialize, Debug)]
pub struct AddExpenseOutputArgs {
    pub id: i32,
}

#[derive(Debug)]
pub enum ExpensesProcessorOutput {
    Add(AddExpenseOutputArgs),
    List(Vec<ExpenseRecord>),
    Get(Option<ExpenseRecord>),
    Update,
    Delete,
    Export(String),
    Report(ExpenseReport),
}

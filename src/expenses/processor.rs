use crate::expenses::db_types::CreateExpense;
use crate::expenses::export::write_csv;
use crate::expenses::report::build_report;
use crate::utils::app_config::AppConfig;
use crate::utils::error::ActionError;
use crate::utils::traits::ActionProcessor;
use super::processor_enums::*;

impl ActionProcessor<OwnerContext, ExpensesProcessorOutput> for ExpensesProcessorInput {
    async fn process(&self, app_config: &AppConfig, context: &mut OwnerContext) -> Result<ExpensesProcessorOutput, ActionError> {
        let owner = context.user_id;

        match self {
            ExpensesProcessorInput::Add(args) => {
                let expense = CreateExpense {
                    user_id: owner,
                    item: args.item.clone(),
                    amount: args.amount.clone(),
                    category: args.category.clone(),
                };
                let record = app_config
                    .with_repository(move |repository| Ok(repository.insert_expense(&expense)?))
                    .await?;
                tracing::debug!(user_id = owner, expense_id = record.id, "expense added");

                Ok(ExpensesProcessorOutput::Add(AddExpenseOutputArgs { id: record.id }))
            }
            ExpensesProcessorInput::List => {
                let rows = app_config
                    .with_repository(move |repository| Ok(repository.list_expenses(owner)?))
                    .await?;
                Ok(ExpensesProcessorOutput::List(rows))
            }
            ExpensesProcessorInput::Get(expense_id) => {
                let expense_id = *expense_id;
                let row = app_config
                    .with_repository(move |repository| Ok(repository.get_expense(owner, expense_id)?))
                    .await?;
                Ok(ExpensesProcessorOutput::Get(row))
            }
            ExpensesProcessorInput::Update(args) => {
                let expense_id = args.id;
                let changes = args.fields.to_changes();
                let updated = app_config
                    .with_repository(move |repository| {
                        Ok(repository.update_expense(owner, expense_id, &changes)?)
                    })
                    .await?;
                if updated == 0 {
                    return Err(ActionError::NotFound);
                }

                Ok(ExpensesProcessorOutput::Update)
            }
            ExpensesProcessorInput::Delete(expense_id) => {
                let expense_id = *expense_id;
                let removed = app_config
                    .with_repository(move |repository| Ok(repository.delete_expense(owner, expense_id)?))
                    .await?;
                if removed == 0 {
                    return Err(ActionError::NotFound);
                }

                Ok(ExpensesProcessorOutput::Delete)
            }
            ExpensesProcessorInput::Export => {
                let rows = app_config
                    .with_repository(move |repository| Ok(repository.export_expenses(owner)?))
                    .await?;
                Ok(ExpensesProcessorOutput::Export(write_csv(&rows)?))
            }
            ExpensesProcessorInput::Report => {
                let rows = app_config
                    .with_repository(move |repository| Ok(repository.list_expenses(owner)?))
                    .await?;
                Ok(ExpensesProcessorOutput::Report(build_report(&rows)))
            }
        }
    }
}

use std::fmt;
use std::str::FromStr;

use crate::accounts::processor_enums::{AccountsProcessorInput, AccountsProcessorOutput, CredentialsInputArgs, SessionContext};
use crate::expenses::processor_enums::{ExpenseFieldsInputArgs, ExpensesProcessorInput, ExpensesProcessorOutput, OwnerContext, UpdateExpenseInputArgs};
use crate::sessions::SessionToken;
use crate::utils::app_config::AppConfig;
use crate::utils::error::ActionError;
use crate::utils::traits::ActionProcessor;
use crate::utils::validation::{RequestFields, parse_expense_id};

/// Every action a client may name in the `action` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Register,
    Login,
    Logout,
    Add,
    List,
    Get,
    Update,
    Delete,
    Export,
    Report,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Register => "register",
            ActionKind::Login => "login",
            ActionKind::Logout => "logout",
            ActionKind::Add => "add",
            ActionKind::List => "list",
            ActionKind::Get => "get",
            ActionKind::Update => "update",
            ActionKind::Delete => "delete",
            ActionKind::Export => "export",
            ActionKind::Report => "report",
        }
    }
}

impl FromStr for ActionKind {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "register" => Ok(ActionKind::Register),
            "login" => Ok(ActionKind::Login),
            "logout" => Ok(ActionKind::Logout),
            "add" => Ok(ActionKind::Add),
            "list" => Ok(ActionKind::List),
            "get" => Ok(ActionKind::Get),
            "update" => Ok(ActionKind::Update),
            "delete" => Ok(ActionKind::Delete),
            "export" => Ok(ActionKind::Export),
            "report" => Ok(ActionKind::Report),
            _ => Err(ActionError::InvalidAction),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum ActionRouterInput {
    Accounts(AccountsProcessorInput),
    Expenses {
        owner: i32,
        input: ExpensesProcessorInput,
    },
}

#[derive(Debug)]
pub enum ActionRouterOutput {
    Accounts(AccountsProcessorOutput),
    Expenses(ExpensesProcessorOutput),
}

async fn resolve_owner(app_config: &AppConfig, session: Option<&SessionToken>) -> Result<i32, ActionError> {
    let Some(token) = session else {
        return Err(ActionError::NotLoggedIn);
    };

    app_config
        .sessions
        .resolve(token)
        .await?
        .ok_or(ActionError::NotLoggedIn)
}

impl ActionRouterInput {
    /// Builds the typed input for `kind`. Protected actions resolve the
    /// session before looking at any field, so an anonymous caller always
    /// gets `NotLoggedIn` rather than a validation error.
    pub async fn from_request(
        app_config: &AppConfig,
        kind: ActionKind,
        fields: &RequestFields,
        session: Option<&SessionToken>,
    ) -> Result<Self, ActionError> {
        let input = match kind {
            ActionKind::Register => ActionRouterInput::Accounts(AccountsProcessorInput::Register(
                CredentialsInputArgs::from_fields(fields)?,
            )),
            ActionKind::Login => ActionRouterInput::Accounts(AccountsProcessorInput::Login(
                CredentialsInputArgs::from_fields(fields)?,
            )),
            ActionKind::Logout => ActionRouterInput::Accounts(AccountsProcessorInput::Logout),
            ActionKind::Add => {
                let owner = resolve_owner(app_config, session).await?;
                let args = ExpenseFieldsInputArgs::from_fields(fields)?;
                ActionRouterInput::Expenses { owner, input: ExpensesProcessorInput::Add(args) }
            }
            ActionKind::List => {
                let owner = resolve_owner(app_config, session).await?;
                ActionRouterInput::Expenses { owner, input: ExpensesProcessorInput::List }
            }
            ActionKind::Get => {
                let owner = resolve_owner(app_config, session).await?;
                let expense_id = parse_expense_id(fields)?;
                ActionRouterInput::Expenses { owner, input: ExpensesProcessorInput::Get(expense_id) }
            }
            ActionKind::Update => {
                let owner = resolve_owner(app_config, session).await?;
                let args = UpdateExpenseInputArgs::from_fields(fields)?;
                ActionRouterInput::Expenses { owner, input: ExpensesProcessorInput::Update(args) }
            }
            ActionKind::Delete => {
                let owner = resolve_owner(app_config, session).await?;
                let expense_id = parse_expense_id(fields)?;
                ActionRouterInput::Expenses { owner, input: ExpensesProcessorInput::Delete(expense_id) }
            }
            ActionKind::Export => {
                let owner = resolve_owner(app_config, session).await?;
                ActionRouterInput::Expenses { owner, input: ExpensesProcessorInput::Export }
            }
            ActionKind::Report => {
                let owner = resolve_owner(app_config, session).await?;
                ActionRouterInput::Expenses { owner, input: ExpensesProcessorInput::Report }
            }
        };

        Ok(input)
    }

    pub async fn process(&self, app_config: &AppConfig, session: Option<SessionToken>) -> Result<ActionRouterOutput, ActionError> {
        match self {
            ActionRouterInput::Accounts(processor) => {
                let mut context = SessionContext { presented: session };
                let res = processor.process(app_config, &mut context).await?;
                Ok(ActionRouterOutput::Accounts(res))
            }
            ActionRouterInput::Expenses { owner, input } => {
                let mut context = OwnerContext { user_id: *owner };
                let res = input.process(app_config, &mut context).await?;
                Ok(ActionRouterOutput::Expenses(res))
            }
        }
    }
}

/// Single entry point: decode, authorise and run one action.
#[tracing::instrument(skip(app_config, fields, session), fields(action = %kind))]
pub async fn handle_action(
    app_config: &AppConfig,
    kind: ActionKind,
    fields: &RequestFields,
    session: Option<SessionToken>,
) -> Result<ActionRouterOutput, ActionError> {
    let input = ActionRouterInput::from_request(app_config, kind, fields, session.as_ref()).await?;
    input.process(app_config, session).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::accounts::processor_enums::SignedInOutputArgs;
    use crate::api::config::CookieSettings;
    use crate::expenses::db_types::ExpenseRecord;
    use crate::sessions::memory::MemorySessionStore;
    use crate::utils::memory::MemoryRepository;
    use crate::utils::traits::Repository;

    fn fields(pairs: &[(&str, &str)]) -> RequestFields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn setup() -> (AppConfig, Arc<MemoryRepository>) {
        let repository = Arc::new(MemoryRepository::new());
        let app_config = AppConfig::new(
            repository.clone(),
            Arc::new(MemorySessionStore::new(3600)),
            CookieSettings::default(),
        );
        (app_config, repository)
    }

    async fn run(
        app_config: &AppConfig,
        kind: ActionKind,
        pairs: &[(&str, &str)],
        session: Option<&SessionToken>,
    ) -> Result<ActionRouterOutput, ActionError> {
        handle_action(app_config, kind, &fields(pairs), session.cloned()).await
    }

    fn signed_in(output: ActionRouterOutput) -> SignedInOutputArgs {
        match output {
            ActionRouterOutput::Accounts(AccountsProcessorOutput::Register(args))
            | ActionRouterOutput::Accounts(AccountsProcessorOutput::Login(args)) => args,
            other => panic!("unexpected output: {:?}", other),
        }
    }

    async fn register(app_config: &AppConfig, username: &str, password: &str) -> SessionToken {
        let output = run(app_config, ActionKind::Register, &[("username", username), ("password", password)], None)
            .await
            .unwrap();
        signed_in(output).session
    }

    async fn add(app_config: &AppConfig, session: &SessionToken, item: &str, amount: &str, category: &str) -> i32 {
        let output = run(
            app_config,
            ActionKind::Add,
            &[("item", item), ("amount", amount), ("category", category)],
            Some(session),
        )
        .await
        .unwrap();
        match output {
            ActionRouterOutput::Expenses(ExpensesProcessorOutput::Add(args)) => args.id,
            other => panic!("unexpected output: {:?}", other),
        }
    }

    async fn list(app_config: &AppConfig, session: &SessionToken) -> Vec<ExpenseRecord> {
        match run(app_config, ActionKind::List, &[], Some(session)).await.unwrap() {
            ActionRouterOutput::Expenses(ExpensesProcessorOutput::List(rows)) => rows,
            other => panic!("unexpected output: {:?}", other),
        }
    }

    async fn get(app_config: &AppConfig, session: &SessionToken, id: i32) -> Option<ExpenseRecord> {
        let id = id.to_string();
        match run(app_config, ActionKind::Get, &[("id", id.as_str())], Some(session)).await.unwrap() {
            ActionRouterOutput::Expenses(ExpensesProcessorOutput::Get(row)) => row,
            other => panic!("unexpected output: {:?}", other),
        }
    }

    #[test]
    fn test_action_names_round_trip() {
        for kind in [
            ActionKind::Register,
            ActionKind::Login,
            ActionKind::Logout,
            ActionKind::Add,
            ActionKind::List,
            ActionKind::Get,
            ActionKind::Update,
            ActionKind::Delete,
            ActionKind::Export,
            ActionKind::Report,
        ] {
            assert_eq!(kind.as_str().parse::<ActionKind>().unwrap(), kind);
        }
        assert!(matches!("drop".parse::<ActionKind>(), Err(ActionError::InvalidAction)));
        assert!(matches!("LIST".parse::<ActionKind>(), Err(ActionError::InvalidAction)));
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let (app_config, _) = setup();
        register(&app_config, "alice", "pw1").await;

        let output = run(&app_config, ActionKind::Login, &[("username", "alice"), ("password", "pw1")], None)
            .await
            .unwrap();
        let signed = signed_in(output);
        assert_eq!(signed.username, "alice");
        assert!(signed.profile_pic.is_none());
    }

    #[tokio::test]
    async fn test_username_is_trimmed() {
        let (app_config, _) = setup();
        register(&app_config, "  bob ", "pw").await;

        let output = run(&app_config, ActionKind::Login, &[("username", "bob"), ("password", "pw")], None)
            .await
            .unwrap();
        assert_eq!(signed_in(output).username, "bob");
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let (app_config, repository) = setup();
        register(&app_config, "alice", "pw1").await;

        let err = run(&app_config, ActionKind::Register, &[("username", "alice"), ("password", "other")], None)
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::UsernameTaken));
        assert_eq!(repository.user_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_register_requires_both_fields() {
        let (app_config, repository) = setup();

        for pairs in [
            vec![("username", "alice")],
            vec![("password", "pw")],
            vec![("username", "  "), ("password", "pw")],
            vec![("username", "alice"), ("password", "   ")],
        ] {
            let err = run(&app_config, ActionKind::Register, &pairs, None).await.unwrap_err();
            assert_eq!(err.to_string(), "Missing username or password");
        }
        assert_eq!(repository.user_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_overlong_username_creates_no_account() {
        let (app_config, repository) = setup();
        let username = "a".repeat(51);

        let err = run(&app_config, ActionKind::Register, &[("username", username.as_str()), ("password", "pw")], None)
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Validation(_)), "got {:?}", err);
        assert_eq!(repository.user_count().unwrap(), 0);

        let username = "a".repeat(50);
        register(&app_config, &username, "pw").await;
        assert_eq!(repository.user_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (app_config, _) = setup();
        register(&app_config, "alice", "pw1").await;

        let wrong_password = run(&app_config, ActionKind::Login, &[("username", "alice"), ("password", "nope")], None)
            .await
            .unwrap_err();
        let unknown_user = run(&app_config, ActionKind::Login, &[("username", "mallory"), ("password", "pw1")], None)
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, ActionError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_protected_actions_need_a_session() {
        let (app_config, _) = setup();
        let forged = SessionToken::generate();

        for kind in [
            ActionKind::Add,
            ActionKind::List,
            ActionKind::Get,
            ActionKind::Update,
            ActionKind::Delete,
            ActionKind::Export,
            ActionKind::Report,
        ] {
            assert!(matches!(run(&app_config, kind, &[], None).await, Err(ActionError::NotLoggedIn)));
            assert!(matches!(run(&app_config, kind, &[], Some(&forged)).await, Err(ActionError::NotLoggedIn)));
        }
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let (app_config, _) = setup();
        let session = register(&app_config, "alice", "pw1").await;
        assert!(list(&app_config, &session).await.is_empty());

        run(&app_config, ActionKind::Logout, &[], Some(&session)).await.unwrap();
        assert!(matches!(
            run(&app_config, ActionKind::List, &[], Some(&session)).await,
            Err(ActionError::NotLoggedIn)
        ));

        // logging out without a session is still fine
        run(&app_config, ActionKind::Logout, &[], None).await.unwrap();
    }

    #[tokio::test]
    async fn test_login_rotates_presented_session() {
        let (app_config, _) = setup();
        let first = register(&app_config, "alice", "pw1").await;

        let output = run(&app_config, ActionKind::Login, &[("username", "alice"), ("password", "pw1")], Some(&first))
            .await
            .unwrap();
        let second = signed_in(output).session;

        assert_ne!(first, second);
        assert!(matches!(
            run(&app_config, ActionKind::List, &[], Some(&first)).await,
            Err(ActionError::NotLoggedIn)
        ));
        assert!(list(&app_config, &second).await.is_empty());
    }

    #[tokio::test]
    async fn test_add_and_list_scenario() {
        let (app_config, _) = setup();
        let session = register(&app_config, "alice", "pw1").await;
        add(&app_config, &session, "Coffee", "3.50", "Food").await;

        let rows = list(&app_config, &session).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item, "Coffee");
        assert_eq!(rows[0].amount.to_string(), "3.50");
        assert_eq!(rows[0].category, "Food");

        let csv = match run(&app_config, ActionKind::Export, &[], Some(&session)).await.unwrap() {
            ActionRouterOutput::Expenses(ExpensesProcessorOutput::Export(csv)) => csv,
            other => panic!("unexpected output: {:?}", other),
        };
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "item,amount,category,created_at");
        assert!(lines[1].starts_with("Coffee,3.50,Food,"));
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let (app_config, _) = setup();
        let session = register(&app_config, "alice", "pw1").await;
        let first = add(&app_config, &session, "Coffee", "3.50", "Food").await;
        let second = add(&app_config, &session, "Bus", "2", "Transport").await;

        let ids: Vec<i32> = list(&app_config, &session).await.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[tokio::test]
    async fn test_invalid_add_creates_nothing() {
        let (app_config, repository) = setup();
        let session = register(&app_config, "alice", "pw1").await;

        for pairs in [
            vec![("item", "Coffee"), ("amount", "0"), ("category", "Food")],
            vec![("item", "Coffee"), ("amount", "-2"), ("category", "Food")],
            vec![("item", "Coffee"), ("amount", "abc"), ("category", "Food")],
            vec![("item", ""), ("amount", "2"), ("category", "Food")],
            vec![("item", "Coffee"), ("amount", "2"), ("category", " ")],
            vec![("item", "Coffee"), ("category", "Food")],
            vec![("item", "Coffee"), ("amount", "100000000"), ("category", "Food")],
            vec![("item", "Coffee"), ("amount", "1e99999999"), ("category", "Food")],
        ] {
            let err = run(&app_config, ActionKind::Add, &pairs, Some(&session)).await.unwrap_err();
            assert!(matches!(err, ActionError::Validation(_)), "{:?} gave {:?}", pairs, err);
        }
        assert_eq!(repository.expense_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_other_users_expenses_are_invisible() {
        let (app_config, _) = setup();
        let alice = register(&app_config, "alice", "pw1").await;
        let bob = register(&app_config, "bob", "pw2").await;
        let expense_id = add(&app_config, &alice, "Coffee", "3.50", "Food").await;

        assert!(list(&app_config, &bob).await.is_empty());
        assert!(get(&app_config, &bob, expense_id).await.is_none());

        let id = expense_id.to_string();
        let update = run(
            &app_config,
            ActionKind::Update,
            &[("id", id.as_str()), ("item", "Stolen"), ("amount", "1"), ("category", "Theft")],
            Some(&bob),
        )
        .await;
        assert!(matches!(update, Err(ActionError::NotFound)));

        let delete = run(&app_config, ActionKind::Delete, &[("id", id.as_str())], Some(&bob)).await;
        assert!(matches!(delete, Err(ActionError::NotFound)));

        let untouched = get(&app_config, &alice, expense_id).await.unwrap();
        assert_eq!(untouched.item, "Coffee");
        assert_eq!(untouched.amount.to_string(), "3.50");
    }

    #[tokio::test]
    async fn test_update_changes_only_editable_columns() {
        let (app_config, _) = setup();
        let session = register(&app_config, "alice", "pw1").await;
        let expense_id = add(&app_config, &session, "Coffee", "3.50", "Food").await;
        let before = get(&app_config, &session, expense_id).await.unwrap();

        let id = expense_id.to_string();
        run(
            &app_config,
            ActionKind::Update,
            &[("id", id.as_str()), ("item", " Tea "), ("amount", "2.25"), ("category", "Drinks")],
            Some(&session),
        )
        .await
        .unwrap();

        let after = get(&app_config, &session, expense_id).await.unwrap();
        assert_eq!(after.item, "Tea");
        assert_eq!(after.amount.to_string(), "2.25");
        assert_eq!(after.category, "Drinks");
        assert_eq!(after.id, before.id);
        assert_eq!(after.user_id, before.user_id);
        assert_eq!(after.created_at, before.created_at);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let (app_config, _) = setup();
        let session = register(&app_config, "alice", "pw1").await;
        let expense_id = add(&app_config, &session, "Coffee", "3.50", "Food").await;

        let id = expense_id.to_string();
        run(&app_config, ActionKind::Delete, &[("id", id.as_str())], Some(&session))
            .await
            .unwrap();

        assert!(get(&app_config, &session, expense_id).await.is_none());
        assert!(matches!(
            run(&app_config, ActionKind::Delete, &[("id", id.as_str())], Some(&session)).await,
            Err(ActionError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_deleting_user_cascades() {
        let (app_config, repository) = setup();
        let session = register(&app_config, "alice", "pw1").await;
        let expense_id = add(&app_config, &session, "Coffee", "3.50", "Food").await;
        add(&app_config, &session, "Lunch", "9", "Food").await;

        let user = repository.find_user_by_username("alice").unwrap().unwrap();
        repository.delete_user(user.id).unwrap();

        assert!(list(&app_config, &session).await.is_empty());
        assert!(get(&app_config, &session, expense_id).await.is_none());
        assert_eq!(repository.expense_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_export_has_header_plus_one_line_per_expense() {
        let (app_config, _) = setup();
        let session = register(&app_config, "alice", "pw1").await;
        for n in 1..=3 {
            add(&app_config, &session, &format!("Item {}", n), "1", "Misc").await;
        }

        let csv = match run(&app_config, ActionKind::Export, &[], Some(&session)).await.unwrap() {
            ActionRouterOutput::Expenses(ExpensesProcessorOutput::Export(csv)) => csv,
            other => panic!("unexpected output: {:?}", other),
        };
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("Item 1,1.00,Misc,"));
        assert!(lines[3].starts_with("Item 3,1.00,Misc,"));
    }

    #[tokio::test]
    async fn test_report_groups_by_category() {
        let (app_config, _) = setup();
        let session = register(&app_config, "alice", "pw1").await;
        add(&app_config, &session, "Coffee", "3.50", "Food").await;
        add(&app_config, &session, "Lunch", "8.50", "Food").await;
        add(&app_config, &session, "Bus", "2", "Transport").await;

        let report = match run(&app_config, ActionKind::Report, &[], Some(&session)).await.unwrap() {
            ActionRouterOutput::Expenses(ExpensesProcessorOutput::Report(report)) => report,
            other => panic!("unexpected output: {:?}", other),
        };
        assert_eq!(report.total.to_string(), "14.00");
        assert_eq!(report.categories[0].category, "Food");
        assert_eq!(report.categories[0].total.to_string(), "12.00");
        assert_eq!(report.categories[1].count, 1);
    }
}

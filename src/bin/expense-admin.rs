use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use expense_tracker::cli_utils::{confirm, format_expense_rows, format_table, print_error, print_info, print_success};
use expense_tracker::utils::db::{PgRepository, create_pool, ensure_schema, get_conn};
use expense_tracker::utils::traits::Repository;

#[derive(Parser, Debug)]
#[command(
    name = "expense-admin",
    about = "Maintenance commands for the expense tracker database"
)]
struct CliArgs {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the users and expenses tables if they do not exist
    InitDb,
    /// Delete a user together with all of their expenses
    DeleteUser {
        #[arg(long)]
        username: String,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Print a user's expenses, newest first
    ListExpenses {
        #[arg(long)]
        username: String,
    },
}

fn run(args: CliArgs) -> Result<()> {
    let pool = create_pool(&args.database_url)?;

    match args.command {
        Command::InitDb => {
            let mut conn = get_conn(&pool)?;
            ensure_schema(&mut conn)?;
            print_success("Schema is up to date");
        }
        Command::DeleteUser { username, yes } => {
            let repository = PgRepository::new(pool);
            let user = repository
                .find_user_by_username(&username)?
                .ok_or_else(|| anyhow!("No user named {}", username))?;
            let expense_count = repository.list_expenses(user.id)?.len();

            let prompt = format!("Delete {} and their {} expense(s)?", user.username, expense_count);
            if !yes && !confirm(&prompt)? {
                print_info("Nothing deleted");
                return Ok(());
            }

            repository.delete_user(user.id)?;
            print_success(&format!("Deleted {} ({} expenses removed)", user.username, expense_count));
        }
        Command::ListExpenses { username } => {
            let repository = PgRepository::new(pool);
            let user = repository
                .find_user_by_username(&username)?
                .ok_or_else(|| anyhow!("No user named {}", username))?;
            let rows = repository.list_expenses(user.id)?;

            if rows.is_empty() {
                print_info(&format!("{} has no expenses", user.username));
            } else {
                println!(
                    "{}",
                    format_table(
                        &["id", "item", "amount", "category", "created_at"],
                        &format_expense_rows(&rows)
                    )
                );
            }
        }
    }

    Ok(())
}

fn main() {
    let _ = dotenv();
    let args = CliArgs::parse();

    if let Err(e) = run(args) {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

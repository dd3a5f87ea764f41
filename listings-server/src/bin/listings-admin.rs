//! listings-admin: operator commands against the listings database
//!
//! ```text
//! listings-admin migrate
//! listings-admin create-admin --email ana@example.com --password ... [--name Ana]
//! listings-admin reset-admin-password --email ana@example.com --password ...
//! listings-admin set-menu-password --eatery-id 42 --password ...
//! listings-admin clear-menu-password --eatery-id 42
//! listings-admin check-menu-password --eatery-id 42 --password ...
//! ```

use clap::{Parser, Subcommand};
use listings_server::BoxError;
use listings_server::db;
use listings_server::util::{hash_password, verify_password};
use shared::validation::{MIN_ADMIN_PASSWORD_LEN, MIN_MENU_PASSWORD_LEN, validate_password};
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "listings-admin")]
#[command(about = "Operator commands for the listings database", version)]
struct Cli {
    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply pending database migrations
    Migrate,
    /// Create an admin account
    CreateAdmin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Replace an admin's password
    ResetAdminPassword {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Set (or replace) the daily-menu password of an eatery
    SetMenuPassword {
        #[arg(long)]
        eatery_id: i64,
        #[arg(long)]
        password: String,
    },
    /// Remove the daily-menu password; uploads are locked until a new one is set
    ClearMenuPassword {
        #[arg(long)]
        eatery_id: i64,
    },
    /// Check a password against an eatery's stored menu password
    CheckMenuPassword {
        #[arg(long)]
        eatery_id: i64,
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "listings_server=info,listings_admin=info".into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), BoxError> {
    let pool = PgPool::connect(&cli.database_url).await?;

    match cli.command {
        Command::Migrate => {
            sqlx::migrate!("./migrations").run(&pool).await?;
            println!("Migrations applied");
        }
        Command::CreateAdmin {
            email,
            password,
            name,
        } => {
            validate_password(&password, MIN_ADMIN_PASSWORD_LEN)?;
            shared::validation::validate_email(&email, "email")?;
            let hash = hash(&password)?;
            let admin = db::admins::create(&pool, &email, name.as_deref(), &hash).await?;
            println!("Created admin {} ({})", admin.email, admin.id);
        }
        Command::ResetAdminPassword { email, password } => {
            validate_password(&password, MIN_ADMIN_PASSWORD_LEN)?;
            let hash = hash(&password)?;
            if !db::admins::update_password_by_email(&pool, &email, &hash).await? {
                return Err(format!("No admin with email {email}").into());
            }
            println!("Password updated for {}", db::admins::normalize_email(&email));
        }
        Command::SetMenuPassword {
            eatery_id,
            password,
        } => {
            validate_password(&password, MIN_MENU_PASSWORD_LEN)?;
            let hash = hash(&password)?;
            if !db::eateries::set_menu_password(&pool, eatery_id, &hash).await? {
                return Err(format!("Eatery {eatery_id} not found").into());
            }
            println!("Menu password set for eatery {eatery_id}");
        }
        Command::ClearMenuPassword { eatery_id } => {
            if !db::eateries::clear_menu_password(&pool, eatery_id).await? {
                return Err(format!("Eatery {eatery_id} not found").into());
            }
            println!("Menu password cleared for eatery {eatery_id}");
        }
        Command::CheckMenuPassword {
            eatery_id,
            password,
        } => match db::eateries::menu_password_hash(&pool, eatery_id).await? {
            None => return Err(format!("Eatery {eatery_id} not found or inactive").into()),
            Some(None) => println!("Eatery {eatery_id} has no menu password"),
            Some(Some(hash)) => {
                if verify_password(&password, &hash) {
                    println!("match");
                } else {
                    println!("no match");
                }
            }
        },
    }

    pool.close().await;
    Ok(())
}

fn hash(password: &str) -> Result<String, BoxError> {
    hash_password(password).map_err(|e| format!("Password hashing failed: {e}").into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_set_menu_password() {
        let cli = Cli::try_parse_from([
            "listings-admin",
            "--database-url",
            "postgres://localhost/listings",
            "set-menu-password",
            "--eatery-id",
            "42",
            "--password",
            "tortilla",
        ])
        .unwrap();
        match cli.command {
            Command::SetMenuPassword {
                eatery_id,
                password,
            } => {
                assert_eq!(eatery_id, 42);
                assert_eq!(password, "tortilla");
            }
            _ => panic!("wrong subcommand"),
        }
    }
}

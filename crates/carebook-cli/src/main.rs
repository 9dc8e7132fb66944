use std::sync::Arc;

use anyhow::{Context, bail};
use carebook_auth::CredentialService;
use carebook_cli::commands;
use carebook_cli::seeder::{self, SeedConfig};
use carebook_config::{DatabaseConfig, PasswordConfig};
use carebook_db::{PgCredentialStore, init_db_pool, run_migrations};
use carebook_models::UserRole;
use carebook_observability::init_basic_console_logging;
use clap::{Parser, Subcommand};
use dialoguer::{Confirm, Input, Password};
use dotenvy::dotenv;
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "carebook-cli")]
#[command(about = "Carebook CLI - Account administration for Carebook", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an administrator account
    CreateAdmin {
        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Create an account with any role
    CreateAccount {
        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// admin, doctor or patient
        #[arg(short = 'r', long, default_value = "patient")]
        role: UserRole,

        /// Mark the email address as verified
        #[arg(long)]
        verified: bool,
    },
    /// Set a new password for an existing account
    ResetPassword {
        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// New password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Check whether a password is accepted for an account
    CheckLogin {
        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Delete an account
    RemoveAccount {
        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Seed the demo admin plus fake doctors and patients
    Seed {
        /// Number of doctors to create
        #[arg(long, default_value = "10")]
        doctors: usize,

        /// Number of patients to create
        #[arg(long, default_value = "100")]
        patients: usize,
    },
    /// Clear all seeded accounts (keeps the demo admin and real accounts)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_basic_console_logging();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("\n❌ {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let pool = connect().await?;
    let credentials = CredentialService::new(
        Arc::new(PgCredentialStore::new(pool.clone())),
        PasswordConfig::from_env()?,
    )?;

    match cli.command {
        Commands::CreateAdmin { email, password } => {
            handle_create_account(&credentials, email, password, UserRole::Admin, true).await
        }
        Commands::CreateAccount {
            email,
            password,
            role,
            verified,
        } => handle_create_account(&credentials, email, password, role, verified).await,
        Commands::ResetPassword { email, password } => {
            handle_reset_password(&credentials, email, password).await
        }
        Commands::CheckLogin { email, password } => {
            handle_check_login(&credentials, email, password).await
        }
        Commands::RemoveAccount { email, yes } => {
            handle_remove_account(&credentials, email, yes).await
        }
        Commands::Seed { doctors, patients } => {
            seeder::seed_all(&pool, &credentials, SeedConfig::new(doctors, patients)).await
        }
        Commands::ClearSeed => seeder::clear_all(&pool).await,
    }
}

async fn connect() -> anyhow::Result<PgPool> {
    let config = DatabaseConfig::from_env()?;
    let pool = init_db_pool(&config)
        .await
        .context("Failed to connect to database")?;
    run_migrations(&pool).await?;
    tracing::debug!(max_connections = config.max_connections, "Database ready");
    Ok(pool)
}

fn prompt_email(email: Option<String>) -> anyhow::Result<String> {
    match email {
        Some(email) => Ok(email),
        None => Input::new()
            .with_prompt("Email address")
            .interact_text()
            .context("Failed to read email"),
    }
}

fn prompt_new_password(password: Option<String>) -> anyhow::Result<String> {
    match password {
        Some(password) => Ok(password),
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("Failed to read password"),
    }
}

fn prompt_password(password: Option<String>) -> anyhow::Result<String> {
    match password {
        Some(password) => Ok(password),
        None => Password::new()
            .with_prompt("Password")
            .interact()
            .context("Failed to read password"),
    }
}

async fn handle_create_account(
    credentials: &CredentialService,
    email: Option<String>,
    password: Option<String>,
    role: UserRole,
    verified: bool,
) -> anyhow::Result<()> {
    let email = prompt_email(email)?;
    let password = prompt_new_password(password)?;

    let record = commands::create_account(credentials, &email, &password, role, verified)
        .await
        .context("Error creating account")?;

    println!("\n✅ Account created successfully!");
    println!("   Id: {}", record.id);
    println!("   Email: {}", record.email);
    println!("   Role: {}", record.role);
    Ok(())
}

async fn handle_reset_password(
    credentials: &CredentialService,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let email = prompt_email(email)?;
    let password = prompt_new_password(password)?;

    credentials
        .reset_password(&email, &password)
        .await
        .context("Error resetting password")?;

    println!("\n✅ Password updated for {email}");
    Ok(())
}

async fn handle_check_login(
    credentials: &CredentialService,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let email = prompt_email(email)?;
    let password = prompt_password(password)?;

    match commands::check_login(credentials, &email, &password).await? {
        Some(record) => {
            println!("\n✅ Credentials accepted");
            println!("   Id: {}", record.id);
            println!("   Role: {}", record.role);
            println!("   Email verified: {}", record.email_verified);
            Ok(())
        }
        None => bail!("Invalid email or password"),
    }
}

async fn handle_remove_account(
    credentials: &CredentialService,
    email: Option<String>,
    yes: bool,
) -> anyhow::Result<()> {
    let email = prompt_email(email)?;

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete account {email}?"))
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;
        if !confirmed {
            println!("Aborted");
            return Ok(());
        }
    }

    let record = commands::remove_account_by_email(credentials, &email)
        .await
        .context("Error removing account")?;

    println!("\n✅ Removed account {} ({})", record.email, record.id);
    Ok(())
}

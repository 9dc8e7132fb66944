//! Database seeding for demos and local development.
//!
//! [`seed_all`] registers the demo administrator through
//! [`CredentialService`] and bulk-inserts generated doctors and patients.
//! Generated accounts carry [`models::SEED_MARKER`] in their email so
//! [`clear_all`] can remove them without touching real accounts.

mod accounts;
pub mod models;

pub use accounts::{clear_accounts, generate_accounts, insert_accounts_batch, seed_accounts};
pub use models::{AccountSeed, SeedConfig};

use std::time::Instant;

use carebook_auth::{CredentialService, NewAccount};
use carebook_core::AuthError;
use carebook_models::UserRole;
use sqlx::PgPool;

use models::{DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD, SEED_PASSWORD};

pub async fn seed_all(
    db: &PgPool,
    credentials: &CredentialService,
    config: SeedConfig,
) -> anyhow::Result<()> {
    let start_time = Instant::now();
    println!("🌱 Starting database seeding...\n");

    ensure_demo_admin(credentials).await?;

    let digest = credentials.digest(SEED_PASSWORD)?;
    let ids = seed_accounts(db, &config, &digest).await?;

    println!("\n✅ Seeding completed in {:?}", start_time.elapsed());
    println!("   Accounts created: {}", ids.len());
    println!("   Demo admin: {DEMO_ADMIN_EMAIL} / {DEMO_ADMIN_PASSWORD}");
    println!("   Generated accounts password: {SEED_PASSWORD}");

    Ok(())
}

/// Registers the demo administrator unless it already exists.
pub async fn ensure_demo_admin(credentials: &CredentialService) -> Result<bool, AuthError> {
    let account =
        NewAccount::new(DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD, UserRole::Admin).verified(true);

    match credentials.register(account).await {
        Ok(_) => {
            println!("👤 Created demo admin {DEMO_ADMIN_EMAIL}");
            Ok(true)
        }
        Err(AuthError::IdentityTaken) => {
            println!("👤 Demo admin {DEMO_ADMIN_EMAIL} already exists");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

pub async fn clear_all(db: &PgPool) -> anyhow::Result<()> {
    let start_time = Instant::now();
    let deleted = clear_accounts(db).await?;
    println!(
        "\n✅ Cleared {deleted} seeded accounts in {:?}",
        start_time.elapsed()
    );
    Ok(())
}

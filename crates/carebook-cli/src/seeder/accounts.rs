//! Account seeding.
//!
//! Generates doctors and patients with fake names and bulk-inserts them.
//! All generated accounts share one digest, computed once by the caller.

use carebook_models::UserRole;
use fake::Fake;
use fake::faker::name::en::*;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;
use uuid::Uuid;

use super::models::{AccountSeed, SEED_MARKER, SeedConfig};

// 4 params per account
const BATCH_SIZE: usize = 1000;

pub fn generate_accounts(config: &SeedConfig, password_digest: &str) -> Vec<AccountSeed> {
    let doctors = (0..config.doctors)
        .into_par_iter()
        .map(|idx| generate_account(UserRole::Doctor, idx, password_digest));
    let patients = (0..config.patients)
        .into_par_iter()
        .map(|idx| generate_account(UserRole::Patient, idx, password_digest));

    doctors.chain(patients).collect()
}

fn generate_account(role: UserRole, idx: usize, password_digest: &str) -> AccountSeed {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();

    // The index keeps emails unique even when fake names repeat.
    let email = format!(
        "{}.{}{}{}{}@example.com",
        sanitize(&first_name),
        sanitize(&last_name),
        SEED_MARKER,
        role.as_str(),
        idx
    );

    AccountSeed {
        email,
        role,
        password_digest: password_digest.to_string(),
        email_verified: role == UserRole::Doctor,
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// Generates and inserts accounts, returning the ids of the inserted rows.
pub async fn seed_accounts(
    db: &PgPool,
    config: &SeedConfig,
    password_digest: &str,
) -> Result<Vec<Uuid>, sqlx::Error> {
    let start_time = Instant::now();
    println!(
        "👥 Seeding {} accounts ({} doctors, {} patients)...",
        config.total(),
        config.doctors,
        config.patients
    );

    let accounts = generate_accounts(config, password_digest);
    let ids = insert_accounts_batch(db, &accounts).await?;

    println!(
        "   ✓ Inserted {} accounts in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

pub async fn insert_accounts_batch(
    db: &PgPool,
    accounts: &[AccountSeed],
) -> Result<Vec<Uuid>, sqlx::Error> {
    let mut tx = db.begin().await?;
    let mut all_ids = Vec::with_capacity(accounts.len());

    for chunk in accounts.chunks(BATCH_SIZE) {
        all_ids.extend(insert_accounts_chunk(&mut tx, chunk).await?);
    }

    tx.commit().await?;
    Ok(all_ids)
}

async fn insert_accounts_chunk(
    tx: &mut Transaction<'_, Postgres>,
    accounts: &[AccountSeed],
) -> Result<Vec<Uuid>, sqlx::Error> {
    if accounts.is_empty() {
        return Ok(Vec::new());
    }

    let mut query =
        String::from("INSERT INTO credentials (email, role, password_digest, email_verified) VALUES ");

    for i in 0..accounts.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let param_idx = i * 4;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${})",
            param_idx + 1,
            param_idx + 2,
            param_idx + 3,
            param_idx + 4
        ));
    }

    query.push_str(" ON CONFLICT (email) DO NOTHING RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for account in accounts {
        q = q
            .bind(&account.email)
            .bind(account.role)
            .bind(&account.password_digest)
            .bind(account.email_verified);
    }

    q.fetch_all(&mut **tx).await
}

/// Deletes generated accounts. Accounts without the seed marker, including
/// the demo admin, are kept.
pub async fn clear_accounts(db: &PgPool) -> Result<u64, sqlx::Error> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded accounts...");

    let pattern = format!("%{SEED_MARKER}%@example.com");
    let result = sqlx::query("DELETE FROM credentials WHERE email LIKE $1")
        .bind(pattern)
        .execute(db)
        .await?;

    println!(
        "   ✓ Deleted {} accounts in {:?}",
        result.rows_affected(),
        start_time.elapsed()
    );

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_accounts_counts_and_roles() {
        let accounts = generate_accounts(&SeedConfig::new(3, 7), "$2b$04$digest");
        assert_eq!(accounts.len(), 10);
        assert_eq!(
            accounts.iter().filter(|a| a.role == UserRole::Doctor).count(),
            3
        );
        assert_eq!(
            accounts.iter().filter(|a| a.role == UserRole::Patient).count(),
            7
        );
        assert!(accounts.iter().all(|a| a.password_digest == "$2b$04$digest"));
    }

    #[test]
    fn test_generated_emails_are_unique_and_marked() {
        let accounts = generate_accounts(&SeedConfig::new(50, 200), "x");
        let emails: HashSet<_> = accounts.iter().map(|a| a.email.as_str()).collect();
        assert_eq!(emails.len(), accounts.len());
        assert!(accounts.iter().all(|a| a.email.contains(SEED_MARKER)));
        assert!(accounts.iter().all(|a| a.email.ends_with("@example.com")));
        assert!(accounts.iter().all(|a| a.email == a.email.to_lowercase()));
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("O'Connor"), "oconnor");
        assert_eq!(sanitize("Anne-Marie"), "annemarie");
    }
}

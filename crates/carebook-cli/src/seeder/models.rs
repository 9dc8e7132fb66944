//! Data models for database seeding configuration.

use carebook_models::UserRole;

/// Demo administrator created by `seed`.
pub const DEMO_ADMIN_EMAIL: &str = "admin@example.com";
pub const DEMO_ADMIN_PASSWORD: &str = "Admin123!";

/// Password shared by every generated doctor and patient.
pub const SEED_PASSWORD: &str = "Password123!";

/// Marker in the local part of generated emails; `clear-seed` matches on it.
pub const SEED_MARKER: &str = "+seed";

/// Seed data for one generated account.
pub struct AccountSeed {
    pub email: String,
    pub role: UserRole,
    pub password_digest: String,
    pub email_verified: bool,
}

#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub doctors: usize,
    pub patients: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            doctors: 10,
            patients: 100,
        }
    }
}

impl SeedConfig {
    pub fn new(doctors: usize, patients: usize) -> Self {
        Self { doctors, patients }
    }

    pub fn total(&self) -> usize {
        self.doctors + self.patients
    }
}

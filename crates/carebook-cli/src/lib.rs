//! # Carebook CLI
//!
//! Account administration and database seeding for Carebook.
//!
//! This library crate holds the logic behind the `carebook-cli` binary.
//!
//! ## Usage
//!
//! ```ignore
//! use carebook_cli::seeder::{seed_all, SeedConfig};
//!
//! seed_all(&pool, &credentials, SeedConfig::new(10, 100)).await?;
//! ```

pub mod commands;
pub mod seeder;

//! Password hashing configuration.
//!
//! # Environment Variables
//!
//! - `BCRYPT_COST`: bcrypt cost factor for new digests (default: 8)
//! - `PASSWORD_MIN_LENGTH`: minimum accepted password length (default: 8)

use carebook_core::AuthError;
use carebook_core::password::{MAX_COST, MIN_COST};

use crate::env::parsed_or;

pub const DEFAULT_BCRYPT_COST: u32 = 8;
pub const DEFAULT_MIN_LENGTH: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasswordConfig {
    pub bcrypt_cost: u32,
    pub min_length: usize,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            min_length: DEFAULT_MIN_LENGTH,
        }
    }
}

impl PasswordConfig {
    pub fn from_env() -> Result<Self, AuthError> {
        let config = Self {
            bcrypt_cost: parsed_or("BCRYPT_COST", DEFAULT_BCRYPT_COST)?,
            min_length: parsed_or("PASSWORD_MIN_LENGTH", DEFAULT_MIN_LENGTH)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AuthError> {
        if !(MIN_COST..=MAX_COST).contains(&self.bcrypt_cost) {
            return Err(AuthError::config(format!(
                "BCRYPT_COST must be between {MIN_COST} and {MAX_COST}"
            )));
        }
        if self.min_length == 0 {
            return Err(AuthError::config("PASSWORD_MIN_LENGTH must be positive"));
        }
        Ok(())
    }
}

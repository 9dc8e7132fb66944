use std::env;
use std::str::FromStr;

use carebook_core::AuthError;

/// Reads a variable that must be present and non-blank.
pub(crate) fn required(key: &str) -> Result<String, AuthError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AuthError::config(format!("{key} must be set"))),
    }
}

/// Reads an optional variable, falling back to `default` when unset.
///
/// A value that is set but does not parse is a configuration error rather
/// than a silent fallback.
pub(crate) fn parsed_or<T: FromStr>(key: &str, default: T) -> Result<T, AuthError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| AuthError::config(format!("{key} has an invalid value: {value}"))),
        Err(_) => Ok(default),
    }
}

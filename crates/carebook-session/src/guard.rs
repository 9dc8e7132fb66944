//! Client-side page guard.
//!
//! The guard decides, without touching the network, whether the locally
//! stored access token is good enough to enter a protected view. The token
//! payload is decoded but its signature is not checked: the client does not
//! hold the signing secret, and the server re-verifies every request anyway.

use chrono::Utc;

use carebook_auth::inspect_claims;

use crate::storage::TokenStore;

pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_EXPIRY_BUFFER_SECS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// The session was cleared; navigate to the contained login path.
    Redirect(String),
}

#[derive(Debug, Clone)]
pub struct GuardConfig {
    pub login_path: String,
    pub protected_prefixes: Vec<String>,
    pub expiry_buffer: i64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            protected_prefixes: ["/dashboard", "/appointments", "/prescriptions", "/profile", "/admin"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            expiry_buffer: DEFAULT_EXPIRY_BUFFER_SECS,
        }
    }
}

#[derive(Debug)]
pub struct SessionGuard<S: TokenStore> {
    store: S,
    config: GuardConfig,
}

impl<S: TokenStore> SessionGuard<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, GuardConfig::default())
    }

    pub fn with_config(store: S, config: GuardConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn login_path(&self) -> &str {
        &self.config.login_path
    }

    /// Access token from storage. Storage failures read as "no token".
    pub fn get_token(&self) -> Option<String> {
        match self.store.load() {
            Ok(session) => session.map(|s| s.access_token),
            Err(e) => {
                tracing::warn!(error = %e, "Token storage unreadable");
                None
            }
        }
    }

    pub fn get_refresh_token(&self) -> Option<String> {
        self.store.load().ok().flatten().map(|s| s.refresh_token)
    }

    pub fn is_authenticated(&self) -> bool {
        self.get_token().is_some()
    }

    pub fn is_token_expired(&self, token: &str) -> bool {
        self.is_token_expired_at(token, Utc::now().timestamp())
    }

    /// Undecodable tokens count as expired.
    pub fn is_token_expired_at(&self, token: &str, now: i64) -> bool {
        match inspect_claims(token) {
            Ok(claims) => claims.is_expired_at(now, self.config.expiry_buffer),
            Err(_) => true,
        }
    }

    pub fn is_session_valid(&self) -> bool {
        self.is_session_valid_at(Utc::now().timestamp())
    }

    pub fn is_session_valid_at(&self, now: i64) -> bool {
        self.get_token()
            .is_some_and(|token| !self.is_token_expired_at(&token, now))
    }

    pub fn clear_session(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Failed to clear stored session");
        }
    }

    pub fn is_protected(&self, path: &str) -> bool {
        if path == self.config.login_path {
            return false;
        }
        self.config.protected_prefixes.iter().any(|prefix| {
            path == prefix
                || path
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    pub fn check_page(&self, path: &str) -> GuardDecision {
        self.check_page_at(path, Utc::now().timestamp())
    }

    pub fn check_page_at(&self, path: &str, now: i64) -> GuardDecision {
        if !self.is_protected(path) || self.is_session_valid_at(now) {
            return GuardDecision::Allow;
        }

        tracing::debug!(path, "Session invalid, redirecting to login");
        self.clear_session();
        GuardDecision::Redirect(self.config.login_path.clone())
    }
}

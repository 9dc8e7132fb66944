//! HTTP session client.
//!
//! [`SessionClient`] logs in against the API, keeps the token pair in a
//! [`TokenStore`] and attaches the access token to outgoing requests. Its
//! state is derived from what is in storage:
//!
//! | stored token      | state                      |
//! |-------------------|----------------------------|
//! | none              | [`SessionState::Anonymous`] (or `Expired` right after a failed refresh) |
//! | present, expired  | [`SessionState::Expired`]  |
//! | present, valid    | [`SessionState::Authenticated`] |

use std::sync::atomic::{AtomicBool, Ordering};

use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use carebook_models::{LoginRequest, LoginResponse, RefreshRequest, TokenPair};

use crate::guard::{GuardConfig, SessionGuard};
use crate::storage::{StorageError, StoredSession, TokenStore};

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REFRESH_PATH: &str = "/api/auth/refresh";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
    Expired,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No usable session. Nothing was sent; navigate to `redirect`.
    #[error("Login required")]
    LoginRequired { redirect: String },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Server responded with {status}: {message}")]
    Server { status: StatusCode, message: String },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Extra request parts for [`SessionClient::fetch`].
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub json: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl FetchOptions {
    pub fn json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

#[derive(Debug)]
pub struct SessionClient<S: TokenStore> {
    http: reqwest::Client,
    base_url: String,
    guard: SessionGuard<S>,
    // Set when the session ended without the user logging out.
    expired: AtomicBool,
}

impl<S: TokenStore> SessionClient<S> {
    pub fn new(base_url: impl Into<String>, store: S) -> Self {
        Self::with_guard(base_url, SessionGuard::new(store))
    }

    pub fn with_config(base_url: impl Into<String>, store: S, config: GuardConfig) -> Self {
        Self::with_guard(base_url, SessionGuard::with_config(store, config))
    }

    fn with_guard(base_url: impl Into<String>, guard: SessionGuard<S>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            guard,
            expired: AtomicBool::new(false),
        }
    }

    pub fn guard(&self) -> &SessionGuard<S> {
        &self.guard
    }

    pub fn state(&self) -> SessionState {
        match self.guard.get_token() {
            Some(token) if self.guard.is_token_expired(&token) => SessionState::Expired,
            Some(_) => SessionState::Authenticated,
            None if self.expired.load(Ordering::Relaxed) => SessionState::Expired,
            None => SessionState::Anonymous,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn login_required(&self) -> SessionError {
        SessionError::LoginRequired {
            redirect: self.guard.login_path().to_string(),
        }
    }

    fn expire(&self) {
        self.guard.clear_session();
        self.expired.store(true, Ordering::Relaxed);
    }

    fn store_pair(&self, pair: &TokenPair) -> Result<(), SessionError> {
        self.guard.store().save(&StoredSession::from(pair))?;
        self.expired.store(false, Ordering::Relaxed);
        Ok(())
    }

    /// Authenticates and stores the issued pair.
    ///
    /// Any previous session is discarded first, so a failed login leaves the
    /// client [`SessionState::Anonymous`].
    pub async fn login(&self, identity: &str, secret: &str) -> Result<LoginResponse, SessionError> {
        self.logout();

        let response = self
            .http
            .post(self.url(LOGIN_PATH))
            .json(&LoginRequest {
                email: identity.to_string(),
                password: secret.to_string(),
            })
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(SessionError::InvalidCredentials);
        }
        let login: LoginResponse = ensure_success(response).await?.json().await?;

        self.store_pair(&login.tokens)?;
        tracing::debug!(user_id = %login.user.id, "Logged in");
        Ok(login)
    }

    /// Exchanges the stored refresh token for a new pair.
    ///
    /// Any failure ends the session: storage is cleared and the state
    /// becomes [`SessionState::Expired`].
    pub async fn refresh(&self) -> Result<TokenPair, SessionError> {
        let Some(refresh_token) = self.guard.get_refresh_token() else {
            self.expire();
            return Err(self.login_required());
        };

        let result = self
            .http
            .post(self.url(REFRESH_PATH))
            .json(&RefreshRequest { refresh_token })
            .send()
            .await;

        let response = match result {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::debug!(status = %response.status(), "Refresh rejected");
                self.expire();
                return Err(self.login_required());
            }
            Err(e) => {
                self.expire();
                return Err(e.into());
            }
        };

        let pair: TokenPair = match response.json().await {
            Ok(pair) => pair,
            Err(e) => {
                self.expire();
                return Err(e.into());
            }
        };

        self.store_pair(&pair)?;
        Ok(pair)
    }

    /// Discards the stored session. Safe to call repeatedly.
    pub fn logout(&self) {
        self.guard.clear_session();
        self.expired.store(false, Ordering::Relaxed);
    }

    /// Sends an authenticated request to `path`.
    ///
    /// Without a valid access token no request is made and
    /// [`SessionError::LoginRequired`] is returned. A 401 from the server
    /// also ends the session.
    pub async fn fetch(
        &self,
        method: Method,
        path: &str,
        options: FetchOptions,
    ) -> Result<Response, SessionError> {
        let token = match self.guard.get_token() {
            Some(token) if !self.guard.is_token_expired(&token) => token,
            Some(_) => {
                self.expire();
                return Err(self.login_required());
            }
            None => return Err(self.login_required()),
        };

        let mut request = self.http.request(method, self.url(path)).bearer_auth(token);
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &options.json {
            request = request.json(body);
        }

        let response = request.send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            self.expire();
            return Err(self.login_required());
        }

        Ok(response)
    }

    /// [`fetch`](Self::fetch) and decode a successful JSON body.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        options: FetchOptions,
    ) -> Result<T, SessionError> {
        let response = self.fetch(method, path, options).await?;
        Ok(ensure_success(response).await?.json().await?)
    }
}

async fn ensure_success(response: Response) -> Result<Response, SessionError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| status.to_string());

    Err(SessionError::Server { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryTokenStore;

    // Nothing listens here; any request that is actually sent fails with Http.
    const UNREACHABLE: &str = "http://127.0.0.1:9";

    #[tokio::test]
    async fn test_fetch_without_token_short_circuits() {
        let client = SessionClient::new(UNREACHABLE, MemoryTokenStore::new());
        let result = client.fetch(Method::GET, "/api/users/me", FetchOptions::default()).await;

        match result {
            Err(SessionError::LoginRequired { redirect }) => assert_eq!(redirect, "/login"),
            other => panic!("expected LoginRequired, got {other:?}"),
        }
        assert_eq!(client.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_fetch_with_garbage_token_clears_and_expires() {
        let store = MemoryTokenStore::with_session(StoredSession {
            access_token: "garbage".to_string(),
            refresh_token: "garbage".to_string(),
        });
        let client = SessionClient::new(UNREACHABLE, store);
        assert_eq!(client.state(), SessionState::Expired);

        let result = client.fetch(Method::GET, "/api/users/me", FetchOptions::default()).await;
        assert!(matches!(result, Err(SessionError::LoginRequired { .. })));
        assert!(client.guard().store().load().unwrap().is_none());
        assert_eq!(client.state(), SessionState::Expired);
    }

    #[tokio::test]
    async fn test_logout_twice() {
        let client = SessionClient::new(UNREACHABLE, MemoryTokenStore::new());
        client.logout();
        client.logout();
        assert_eq!(client.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_refresh_without_token() {
        let client = SessionClient::new(UNREACHABLE, MemoryTokenStore::new());
        assert!(matches!(
            client.refresh().await,
            Err(SessionError::LoginRequired { .. })
        ));
        assert_eq!(client.state(), SessionState::Expired);

        client.logout();
        assert_eq!(client.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_failed_login_discards_previous_session() {
        let store = MemoryTokenStore::with_session(StoredSession {
            access_token: "previous".to_string(),
            refresh_token: "previous".to_string(),
        });
        let client = SessionClient::new(UNREACHABLE, store);

        assert!(matches!(
            client.login("a@example.com", "Password1!").await,
            Err(SessionError::Http(_))
        ));
        assert!(client.guard().store().load().unwrap().is_none());
        assert_eq!(client.state(), SessionState::Anonymous);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = SessionClient::new("http://localhost:3000/", MemoryTokenStore::new());
        assert_eq!(client.url(LOGIN_PATH), "http://localhost:3000/api/auth/login");
    }

    #[test]
    fn test_fetch_options_builder() {
        let options = FetchOptions::default()
            .header("X-Request-Id", "abc")
            .json(serde_json::json!({"verified": true}));
        assert_eq!(options.headers.len(), 1);
        assert!(options.json.is_some());
    }
}

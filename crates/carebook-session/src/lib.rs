//! # Carebook Session
//!
//! Client-side session handling for Carebook front ends and tools.
//!
//! - [`storage`]: [`TokenStore`] with file and in-memory implementations
//! - [`guard`]: [`SessionGuard`], the synchronous protected-page check
//! - [`client`]: [`SessionClient`], login/refresh/logout and authenticated requests
//!
//! Nothing here is global: each guard or client owns the store it is given.
//!
//! # Example
//!
//! ```ignore
//! use carebook_session::{FileTokenStore, GuardDecision, SessionClient};
//!
//! let client = SessionClient::new("http://localhost:3000", FileTokenStore::new(".carebook"));
//! client.login("admin@example.com", "Admin123!").await?;
//!
//! if let GuardDecision::Redirect(to) = client.guard().check_page("/dashboard") {
//!     println!("go to {to}");
//! }
//! ```

pub mod client;
pub mod guard;
pub mod storage;

pub use client::{FetchOptions, SessionClient, SessionError, SessionState};
pub use guard::{GuardConfig, GuardDecision, SessionGuard};
pub use storage::{FileTokenStore, MemoryTokenStore, StorageError, StoredSession, TokenStore};

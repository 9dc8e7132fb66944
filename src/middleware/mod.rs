//! Middleware modules for request processing.
//!
//! # Modules
//!
//! - [`auth`]: The [`auth::AuthUser`] extractor (bearer token validation)
//! - [`role`]: Role checking layers and helpers
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. `AuthUser` validates the access token and extracts its claims (401 otherwise)
//! 3. Role layers check the `role` claim (403 otherwise)
//! 4. Handler executes if all checks pass
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::AuthUser;
//!
//! async fn get_profile(auth_user: AuthUser) -> Result<Json<UserProfile>, AppError> {
//!     let user_id = auth_user.user_id()?;
//!     // ...
//! }
//! ```

pub mod auth;
pub mod role;

use std::sync::Arc;

use carebook_auth::{Authenticator, CredentialService};
use carebook_config::{CorsConfig, DatabaseConfig, JwtConfig, PasswordConfig};
use carebook_core::AuthError;
use carebook_db::{CredentialStore, PgCredentialStore, init_db_pool, run_migrations};

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<Authenticator>,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        jwt_config: &JwtConfig,
        password_config: PasswordConfig,
        cors_config: CorsConfig,
    ) -> Result<Self, AuthError> {
        let credentials = CredentialService::new(store, password_config)?;
        let auth = Authenticator::new(credentials, jwt_config)?;

        Ok(Self {
            auth: Arc::new(auth),
            cors_config,
        })
    }

    pub fn credentials(&self) -> &CredentialService {
        self.auth.credentials()
    }
}

/// Builds the server state from the environment, connecting to Postgres and
/// applying migrations.
pub async fn init_app_state() -> Result<AppState, AuthError> {
    let jwt_config = JwtConfig::from_env()?;
    let password_config = PasswordConfig::from_env()?;
    let database_config = DatabaseConfig::from_env()?;

    let pool = init_db_pool(&database_config).await?;
    run_migrations(&pool).await?;

    AppState::new(
        Arc::new(PgCredentialStore::new(pool)),
        &jwt_config,
        password_config,
        CorsConfig::from_env(),
    )
}

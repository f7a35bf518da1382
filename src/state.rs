use std::sync::Arc;
use deadpool_postgres::Pool;
use crate::config::Config;
use crate::crypto::field::FieldCipher;
use crate::crypto::token::SessionSigner;
use crate::error::Result;

/// The application's state. The cipher and signer hold the only copies of
/// the derived secrets; they are built once here and never mutated.
#[derive(Clone)]
pub struct AppState {
    /// The database connection pool (persistence gateway).
    pub db: Pool,
    /// The application's configuration.
    pub config: Config,
    /// The PII field cipher.
    pub cipher: Arc<FieldCipher>,
    /// The admin session token issuer/verifier.
    pub signer: Arc<SessionSigner>,
}

impl AppState {
    /// Creates a new `AppState` from the startup configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let db = crate::db::create_pool(&config.database_url)?;
        tracing::info!("PostgreSQL pool initialized (deadpool, lazy connections)");

        let cipher = Arc::new(FieldCipher::from_secret(
            config.field_secret.as_deref().map(|s| s.as_str()),
        ));

        let signer = Arc::new(SessionSigner::new(
            &config.session_secret,
            config.session_duration_days,
        ));
        tracing::info!(
            "Session signer initialized ({}-day stateless tokens)",
            config.session_duration_days
        );

        Ok(AppState {
            db,
            config: config.clone(),
            cipher,
            signer,
        })
    }
}

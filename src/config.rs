use std::env;
use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// Development-only fallback for the session signing secret. Using it in
/// production is refused at startup.
const DEV_SESSION_SECRET: &str = "utopia-dev-session-secret-do-not-deploy";

/// The application's configuration, built once at startup and injected into
/// every component that needs it. No module-level secret state exists.
#[derive(Clone)]
pub struct Config {
    /// The URL of the PostgreSQL database (Supabase connection string).
    pub database_url: String,
    /// Secret the field-encryption key is derived from. `None` puts the
    /// field cipher into pass-through mode.
    pub field_secret: Option<Zeroizing<String>>,
    /// Secret used to sign admin session tokens.
    pub session_secret: Zeroizing<String>,
    /// The duration of an admin session in days.
    pub session_duration_days: i64,
    /// Whether the process runs with production hardening (Secure cookies,
    /// mandatory secrets).
    pub production: bool,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    pub fn from_env() -> Result<Self> {
        let production = env::var("APP_ENV")
            .map(|v| v == "production")
            .unwrap_or(false);

        let field_secret = env::var("FIELD_ENCRYPTION_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .map(Zeroizing::new);

        let session_secret = match env::var("SESSION_SECRET") {
            Ok(s) if !s.is_empty() => Zeroizing::new(s),
            _ if production => {
                anyhow::bail!("SESSION_SECRET must be set when APP_ENV=production")
            }
            _ => {
                tracing::error!(
                    "SECURITY DEGRADED: SESSION_SECRET is not set, falling back to the \
                     built-in development secret. Session cookies are forgeable."
                );
                Zeroizing::new(DEV_SESSION_SECRET.to_string())
            }
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            field_secret,
            session_secret,
            session_duration_days: env::var("SESSION_DURATION_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .context("Invalid SESSION_DURATION_DAYS")?,
            production,
        })
    }
}

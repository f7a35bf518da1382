use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;
use crate::error::Result;
use std::time::Duration;

/// Builds the connection pool for the persistence gateway. The pool is lazy:
/// no connection is opened until the first query.
pub fn create_pool(database_url: &str) -> Result<Pool> {
    let mut cfg = Config::new();
    let pg_config: tokio_postgres::Config = database_url.parse()?;

    if let Some(tokio_postgres::config::Host::Tcp(hostname)) = pg_config.get_hosts().first() {
        cfg.host = Some(hostname.to_string());
    }
    if let Some(port) = pg_config.get_ports().first() {
        cfg.port = Some(*port);
    }

    if let Some(dbname) = pg_config.get_dbname() {
        cfg.dbname = Some(dbname.to_string());
    }

    if let Some(user) = pg_config.get_user() {
        cfg.user = Some(user.to_string());
    }

    if let Some(password) = pg_config.get_password() {
        cfg.password = Some(String::from_utf8_lossy(password).to_string());
    }

    cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });

    // Supabase's pooler caps connections per client, keep this modest.
    cfg.pool = Some(PoolConfig {
        max_size: 16,
        timeouts: deadpool_postgres::Timeouts {
            wait: Some(Duration::from_secs(5)),
            create: Some(Duration::from_secs(2)),
            recycle: Some(Duration::from_secs(1)),
        },
        ..Default::default()
    });

    Ok(cfg.create_pool(Some(Runtime::Tokio1), NoTls)?)
}

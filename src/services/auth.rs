use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::crypto::password;
use crate::error::{AppError, Result};
use crate::models::admin::Admin;
use crate::repositories::admin as admin_repo;

/// Registers the back-office admin account. This is a one-time path: it is
/// closed as soon as any admin exists.
pub async fn register_admin(pool: &Pool, email: &str, password_plain: &str) -> Result<Admin> {
    if admin_repo::count_admins(pool).await? > 0 {
        return Err(AppError::Conflict(
            "Registration is closed".to_string(),
        ));
    }

    let password_hash = password::hash_password(password_plain)?;
    let admin = admin_repo::create_admin(pool, Uuid::new_v4(), email, &password_hash).await?;

    tracing::info!("Admin registered: {}", admin.id);
    Ok(admin)
}

/// Authenticates an admin by email and password.
///
/// Every failure collapses into the same `Authentication` error, and an
/// unknown email still burns a password verification, so neither the
/// response nor its timing reveals whether the account exists.
pub async fn authenticate_admin(pool: &Pool, email: &str, password_plain: &str) -> Result<Admin> {
    let Some(admin) = admin_repo::find_by_email(pool, email).await? else {
        password::dummy_verify(password_plain);
        return Err(AppError::Authentication);
    };

    if !password::verify_password(password_plain, &admin.password_hash)? {
        return Err(AppError::Authentication);
    }

    tracing::info!("Admin authenticated: {}", admin.id);
    Ok(admin)
}

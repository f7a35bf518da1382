use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::admin::Admin,
};

fn row_to_admin(row: &Row) -> Result<Admin> {
    Ok(Admin {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        email: row.try_get("email").map_err(|_| AppError::MissingData("email".to_string()))?,
        password_hash: row.try_get("password_hash").map_err(|_| AppError::MissingData("password_hash".to_string()))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
    })
}

/// Creates a new admin principal.
pub async fn create_admin(
    pool: &Pool,
    id: Uuid,
    email: &str,
    password_hash: &str,
) -> Result<Admin> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO admins (id, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, created_at
            "#,
            &[&id, &email, &password_hash],
        )
        .await?;
    row_to_admin(&row)
}

/// Finds an admin by email.
pub async fn find_by_email(pool: &Pool, email: &str) -> Result<Option<Admin>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT id, email, password_hash, created_at
            FROM admins
            WHERE email = $1
            "#,
            &[&email],
        )
        .await?;
    row.map(|r| row_to_admin(&r)).transpose()
}

/// Counts registered admins. Registration is a one-time path, open only
/// while this is zero.
pub async fn count_admins(pool: &Pool) -> Result<i64> {
    let client = pool.get().await?;
    let row = client
        .query_one("SELECT COUNT(*) AS total FROM admins", &[])
        .await?;
    row.try_get("total")
        .map_err(|_| AppError::MissingData("total".to_string()))
}

use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::member::{Member, MemberStatus},
};

fn row_to_member(row: &Row) -> Result<Member> {
    Ok(Member {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        full_name: row.try_get("full_name").map_err(|_| AppError::MissingData("full_name".to_string()))?,
        email: row.try_get("email").map_err(|_| AppError::MissingData("email".to_string()))?,
        phone: row.try_get("phone").map_err(|_| AppError::MissingData("phone".to_string()))?,
        fiscal_code: row.try_get("fiscal_code").map_err(|_| AppError::MissingData("fiscal_code".to_string()))?,
        status: row.try_get("status").map_err(|_| AppError::MissingData("status".to_string()))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
    })
}

/// Inserts a membership application. `phone` and `fiscal_code` must already
/// be encrypted envelopes; the repository never sees plaintext PII.
pub async fn insert_application(
    pool: &Pool,
    id: Uuid,
    full_name: &str,
    email: &str,
    phone: Option<&str>,
    fiscal_code: Option<&str>,
) -> Result<Member> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO members (id, full_name, email, phone, fiscal_code, status)
            VALUES ($1, $2, $3, $4, $5, 'pending')
            RETURNING id, full_name, email, phone, fiscal_code, status, created_at
            "#,
            &[&id, &full_name, &email, &phone, &fiscal_code],
        )
        .await?;
    row_to_member(&row)
}

/// Lists all members, newest first.
pub async fn list_members(pool: &Pool) -> Result<Vec<Member>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT id, full_name, email, phone, fiscal_code, status, created_at
            FROM members
            ORDER BY created_at DESC
            "#,
            &[],
        )
        .await?;
    rows.iter().map(row_to_member).collect()
}

/// Lists members in a given review state.
pub async fn list_by_status(pool: &Pool, status: MemberStatus) -> Result<Vec<Member>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT id, full_name, email, phone, fiscal_code, status, created_at
            FROM members
            WHERE status = $1
            ORDER BY created_at DESC
            "#,
            &[&status],
        )
        .await?;
    rows.iter().map(row_to_member).collect()
}

/// Updates a member's review state.
pub async fn update_status(pool: &Pool, id: &Uuid, status: MemberStatus) -> Result<Member> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            UPDATE members
            SET status = $1
            WHERE id = $2
            RETURNING id, full_name, email, phone, fiscal_code, status, created_at
            "#,
            &[&status, id],
        )
        .await?
        .ok_or(AppError::NotFound)?;
    row_to_member(&row)
}

use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::message::ContactMessage,
};

fn row_to_message(row: &Row) -> Result<ContactMessage> {
    Ok(ContactMessage {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        name: row.try_get("name").map_err(|_| AppError::MissingData("name".to_string()))?,
        email: row.try_get("email").map_err(|_| AppError::MissingData("email".to_string()))?,
        body: row.try_get("body").map_err(|_| AppError::MissingData("body".to_string()))?,
        is_read: row.try_get("is_read").map_err(|_| AppError::MissingData("is_read".to_string()))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
    })
}

/// Inserts a contact message from the public site.
pub async fn insert_message(
    pool: &Pool,
    id: Uuid,
    name: &str,
    email: &str,
    body: &str,
) -> Result<ContactMessage> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO messages (id, name, email, body)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, body, is_read, created_at
            "#,
            &[&id, &name, &email, &body],
        )
        .await?;
    row_to_message(&row)
}

/// Lists contact messages, newest first.
pub async fn list_messages(pool: &Pool) -> Result<Vec<ContactMessage>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT id, name, email, body, is_read, created_at
            FROM messages
            ORDER BY created_at DESC
            "#,
            &[],
        )
        .await?;
    rows.iter().map(row_to_message).collect()
}

/// Marks a message as read.
pub async fn mark_read(pool: &Pool, id: &Uuid) -> Result<ContactMessage> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            UPDATE messages
            SET is_read = true
            WHERE id = $1
            RETURNING id, name, email, body, is_read, created_at
            "#,
            &[id],
        )
        .await?
        .ok_or(AppError::NotFound)?;
    row_to_message(&row)
}

use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::event::EventBanner,
};

fn row_to_event(row: &Row) -> Result<EventBanner> {
    Ok(EventBanner {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        title: row.try_get("title").map_err(|_| AppError::MissingData("title".to_string()))?,
        subtitle: row.try_get("subtitle").map_err(|_| AppError::MissingData("subtitle".to_string()))?,
        starts_at: row.try_get("starts_at").map_err(|_| AppError::MissingData("starts_at".to_string()))?,
        ends_at: row.try_get("ends_at").map_err(|_| AppError::MissingData("ends_at".to_string()))?,
        is_active: row.try_get("is_active").map_err(|_| AppError::MissingData("is_active".to_string()))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
    })
}

/// Creates a homepage event banner.
pub async fn insert_event(
    pool: &Pool,
    id: Uuid,
    title: &str,
    subtitle: Option<&str>,
    starts_at: DateTime<Utc>,
    ends_at: Option<DateTime<Utc>>,
) -> Result<EventBanner> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO events (id, title, subtitle, starts_at, ends_at, is_active)
            VALUES ($1, $2, $3, $4, $5, true)
            RETURNING id, title, subtitle, starts_at, ends_at, is_active, created_at
            "#,
            &[&id, &title, &subtitle, &starts_at, &ends_at],
        )
        .await?;
    row_to_event(&row)
}

/// Lists every banner for the back-office, upcoming first.
pub async fn list_all(pool: &Pool) -> Result<Vec<EventBanner>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT id, title, subtitle, starts_at, ends_at, is_active, created_at
            FROM events
            ORDER BY starts_at DESC
            "#,
            &[],
        )
        .await?;
    rows.iter().map(row_to_event).collect()
}

/// Lists active banners that have not ended yet, ordered by start date.
/// This is what the public homepage renders.
pub async fn list_active(pool: &Pool, now: DateTime<Utc>) -> Result<Vec<EventBanner>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT id, title, subtitle, starts_at, ends_at, is_active, created_at
            FROM events
            WHERE is_active = true AND (ends_at IS NULL OR ends_at >= $1)
            ORDER BY starts_at ASC
            "#,
            &[&now],
        )
        .await?;
    rows.iter().map(row_to_event).collect()
}

/// Updates a banner's visibility flag.
pub async fn set_active(pool: &Pool, id: &Uuid, is_active: bool) -> Result<EventBanner> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            UPDATE events
            SET is_active = $1
            WHERE id = $2
            RETURNING id, title, subtitle, starts_at, ends_at, is_active, created_at
            "#,
            &[&is_active, id],
        )
        .await?
        .ok_or(AppError::NotFound)?;
    row_to_event(&row)
}

/// Deletes a banner.
pub async fn delete_event(pool: &Pool, id: &Uuid) -> Result<()> {
    let client = pool.get().await?;
    let deleted = client
        .execute("DELETE FROM events WHERE id = $1", &[id])
        .await?;
    if deleted == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

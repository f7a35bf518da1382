use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::campaign::{Campaign, CampaignChannel},
};

fn row_to_campaign(row: &Row) -> Result<Campaign> {
    Ok(Campaign {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        channel: row.try_get("channel").map_err(|_| AppError::MissingData("channel".to_string()))?,
        subject: row.try_get("subject").map_err(|_| AppError::MissingData("subject".to_string()))?,
        body: row.try_get("body").map_err(|_| AppError::MissingData("body".to_string()))?,
        recipient_count: row.try_get("recipient_count").map_err(|_| AppError::MissingData("recipient_count".to_string()))?,
        dispatched_at: row.try_get("dispatched_at").map_err(|_| AppError::MissingData("dispatched_at".to_string()))?,
    })
}

/// Records a dispatched campaign.
pub async fn insert_campaign(
    pool: &Pool,
    id: Uuid,
    channel: CampaignChannel,
    subject: &str,
    body: &str,
    recipient_count: i32,
) -> Result<Campaign> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO campaigns (id, channel, subject, body, recipient_count)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, channel, subject, body, recipient_count, dispatched_at
            "#,
            &[&id, &channel, &subject, &body, &recipient_count],
        )
        .await?;
    row_to_campaign(&row)
}

/// Lists campaign history, newest first.
pub async fn list_campaigns(pool: &Pool) -> Result<Vec<Campaign>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT id, channel, subject, body, recipient_count, dispatched_at
            FROM campaigns
            ORDER BY dispatched_at DESC
            "#,
            &[],
        )
        .await?;
    rows.iter().map(row_to_campaign).collect()
}

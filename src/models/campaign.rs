use chrono::{DateTime, Utc};
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Delivery channel of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSql, FromSql)]
#[postgres(name = "campaign_channel")]
#[serde(rename_all = "lowercase")]
pub enum CampaignChannel {
    #[postgres(name = "email")]
    Email,
    #[postgres(name = "sms")]
    Sms,
}

/// A dispatched email/SMS campaign, recorded for history.
#[derive(Clone, Debug, Serialize)]
pub struct Campaign {
    /// The unique identifier for the campaign.
    pub id: Uuid,
    /// The delivery channel.
    pub channel: CampaignChannel,
    /// The subject line (email) or label (SMS).
    pub subject: String,
    /// The campaign body.
    pub body: String,
    /// How many recipients the batch was handed to.
    pub recipient_count: i32,
    /// The timestamp when the campaign was dispatched.
    pub dispatched_at: DateTime<Utc>,
}

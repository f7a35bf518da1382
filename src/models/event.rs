use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A homepage event banner.
#[derive(Clone, Debug, Serialize)]
pub struct EventBanner {
    /// The unique identifier for the banner.
    pub id: Uuid,
    /// The banner title.
    pub title: String,
    /// An optional subtitle line.
    pub subtitle: Option<String>,
    /// When the event starts.
    pub starts_at: DateTime<Utc>,
    /// When the event ends, if bounded.
    pub ends_at: Option<DateTime<Utc>>,
    /// Whether the banner is shown on the homepage.
    pub is_active: bool,
    /// The timestamp when the banner was created.
    pub created_at: DateTime<Utc>,
}

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A contact message submitted through the public site.
#[derive(Clone, Debug, Serialize)]
pub struct ContactMessage {
    /// The unique identifier for the message.
    pub id: Uuid,
    /// The sender's name.
    pub name: String,
    /// The sender's email address.
    pub email: String,
    /// The message body.
    pub body: String,
    /// Whether staff marked the message as read.
    pub is_read: bool,
    /// The timestamp when the message was submitted.
    pub created_at: DateTime<Utc>,
}

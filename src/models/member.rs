use chrono::{DateTime, Utc};
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Review state of a membership application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSql, FromSql)]
#[postgres(name = "member_status")]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    #[postgres(name = "pending")]
    Pending,
    #[postgres(name = "approved")]
    Approved,
    #[postgres(name = "rejected")]
    Rejected,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Pending => "pending",
            MemberStatus::Approved => "approved",
            MemberStatus::Rejected => "rejected",
        }
    }
}

/// A club member as stored. `phone` and `fiscal_code` hold encrypted field
/// envelopes (or clear values when the cipher runs disabled), never decrypted
/// data.
#[derive(Clone, Debug)]
pub struct Member {
    /// The unique identifier for the member.
    pub id: Uuid,
    /// The member's full name.
    pub full_name: String,
    /// The member's email address.
    pub email: String,
    /// Encrypted phone number envelope.
    pub phone: Option<String>,
    /// Encrypted fiscal code envelope.
    pub fiscal_code: Option<String>,
    /// Review state of the application.
    pub status: MemberStatus,
    /// The timestamp when the application was submitted.
    pub created_at: DateTime<Utc>,
}

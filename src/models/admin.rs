use chrono::{DateTime, Utc};
use uuid::Uuid;

/// An admin principal: the authenticated back-office staff identity.
#[derive(Clone, Debug)]
pub struct Admin {
    /// The unique identifier for the admin.
    pub id: Uuid,
    /// The admin's email address, used as the login identifier.
    pub email: String,
    /// The admin's Argon2id password hash.
    pub password_hash: String,
    /// The timestamp when the admin was created.
    pub created_at: DateTime<Utc>,
}

use deadpool_postgres::Pool;
use serde::Serialize;
use uuid::Uuid;

use crate::crypto::field::FieldCipher;
use crate::error::Result;
use crate::models::member::{Member, MemberStatus};
use crate::repositories::member as member_repo;

/// A member as served to the back-office: PII fields decrypted, empty string
/// when a field is absent or fails to decrypt to anything usable.
#[derive(Debug, Serialize)]
pub struct MemberView {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub fiscal_code: String,
    pub status: MemberStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl MemberView {
    fn from_member(member: Member, cipher: &FieldCipher) -> Self {
        Self {
            phone: cipher.safe_decrypt(member.phone.as_deref(), ""),
            fiscal_code: cipher.safe_decrypt(member.fiscal_code.as_deref(), ""),
            id: member.id,
            full_name: member.full_name,
            email: member.email,
            status: member.status,
            created_at: member.created_at,
        }
    }
}

/// Stores a membership application, encrypting PII before it reaches the
/// persistence gateway.
pub async fn submit_application(
    pool: &Pool,
    cipher: &FieldCipher,
    full_name: &str,
    email: &str,
    phone: Option<&str>,
    fiscal_code: Option<&str>,
) -> Result<Member> {
    let phone_envelope = phone.map(|p| cipher.encrypt(p));
    let fiscal_envelope = fiscal_code.map(|c| cipher.encrypt(c));

    let member = member_repo::insert_application(
        pool,
        Uuid::new_v4(),
        full_name,
        email,
        phone_envelope.as_deref(),
        fiscal_envelope.as_deref(),
    )
    .await?;

    tracing::info!("Membership application received: {}", member.id);
    Ok(member)
}

/// Lists all members with PII decrypted for the back-office.
pub async fn list_members(pool: &Pool, cipher: &FieldCipher) -> Result<Vec<MemberView>> {
    let members = member_repo::list_members(pool).await?;
    Ok(members
        .into_iter()
        .map(|m| MemberView::from_member(m, cipher))
        .collect())
}

/// Updates a member's review state and returns the refreshed view.
pub async fn update_status(
    pool: &Pool,
    cipher: &FieldCipher,
    id: &Uuid,
    status: MemberStatus,
) -> Result<MemberView> {
    let member = member_repo::update_status(pool, id, status).await?;
    Ok(MemberView::from_member(member, cipher))
}

/// Renders the member list as CSV for download.
pub fn export_csv(members: &[MemberView]) -> String {
    let mut csv = String::from("full_name,email,phone,fiscal_code,status,created_at\n");
    for member in members {
        csv.push_str(&csv_row(&[
            &member.full_name,
            &member.email,
            &member.phone,
            &member.fiscal_code,
            member.status.as_str(),
            &member.created_at.to_rfc3339(),
        ]));
    }
    csv
}

fn csv_row(fields: &[&str]) -> String {
    let escaped: Vec<String> = fields
        .iter()
        .map(|f| {
            if f.contains(',') || f.contains('"') || f.contains('\n') {
                format!("\"{}\"", f.replace('"', "\"\""))
            } else {
                f.to_string()
            }
        })
        .collect();
    format!("{}\n", escaped.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_escapes_separators_and_quotes() {
        assert_eq!(csv_row(&["a", "b"]), "a,b\n");
        assert_eq!(csv_row(&["a,b", "c"]), "\"a,b\",c\n");
        assert_eq!(csv_row(&["say \"hi\"", "c"]), "\"say \"\"hi\"\"\",c\n");
    }

    #[test]
    fn export_includes_header_and_rows() {
        let views = vec![MemberView {
            id: Uuid::new_v4(),
            full_name: "Mario Rossi".to_string(),
            email: "mario@rossi.it".to_string(),
            phone: "3331234567".to_string(),
            fiscal_code: "RSSMRA85T10A562S".to_string(),
            status: MemberStatus::Pending,
            created_at: chrono::Utc::now(),
        }];
        let csv = export_csv(&views);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "full_name,email,phone,fiscal_code,status,created_at"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("Mario Rossi,mario@rossi.it,3331234567,RSSMRA85T10A562S,pending,"));
    }
}

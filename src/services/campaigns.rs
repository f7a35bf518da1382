use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::crypto::field::FieldCipher;
use crate::error::{AppError, Result};
use crate::models::campaign::{Campaign, CampaignChannel};
use crate::models::member::MemberStatus;
use crate::repositories::campaign as campaign_repo;
use crate::repositories::member as member_repo;

/// Resolves recipients and dispatches a campaign to approved members.
///
/// Delivery itself happens at the provider boundary; this service resolves
/// and decrypts the recipient list, hands the batch over (currently the
/// tracing log), and records the campaign.
pub async fn dispatch(
    pool: &Pool,
    cipher: &FieldCipher,
    channel: CampaignChannel,
    subject: &str,
    body: &str,
) -> Result<Campaign> {
    if subject.trim().is_empty() || body.trim().is_empty() {
        return Err(AppError::Validation(
            "Campaign subject and body cannot be empty".to_string(),
        ));
    }

    let members = member_repo::list_by_status(pool, MemberStatus::Approved).await?;

    let recipients: Vec<String> = match channel {
        CampaignChannel::Email => members.iter().map(|m| m.email.clone()).collect(),
        CampaignChannel::Sms => members
            .iter()
            .filter_map(|m| {
                let phone = cipher.safe_decrypt(m.phone.as_deref(), "");
                if phone.is_empty() { None } else { Some(phone) }
            })
            .collect(),
    };

    for recipient in &recipients {
        tracing::info!(
            channel = ?channel,
            recipient = %recipient,
            subject = %subject,
            "Campaign message handed to dispatch boundary"
        );
    }

    let recipient_count = i32::try_from(recipients.len())
        .map_err(|_| AppError::Internal("Recipient count overflow".to_string()))?;

    let campaign = campaign_repo::insert_campaign(
        pool,
        Uuid::new_v4(),
        channel,
        subject,
        body,
        recipient_count,
    )
    .await?;

    tracing::info!(
        "Campaign {} dispatched to {} recipients",
        campaign.id,
        campaign.recipient_count
    );
    Ok(campaign)
}

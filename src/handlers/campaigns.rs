use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::{
    error::Result,
    models::campaign::{Campaign, CampaignChannel},
    repositories::campaign as campaign_repo,
    services::campaigns as campaigns_service,
    state::AppState,
};

/// The request payload for dispatching a campaign.
#[derive(Deserialize)]
pub struct CreateCampaignRequest {
    pub channel: CampaignChannel,
    pub subject: String,
    pub body: String,
}

/// Dispatches a campaign to approved members and records it.
#[axum::debug_handler]
pub async fn create_campaign(
    State(state): State<AppState>,
    Json(payload): Json<CreateCampaignRequest>,
) -> Result<impl IntoResponse> {
    let campaign = campaigns_service::dispatch(
        &state.db,
        &state.cipher,
        payload.channel,
        &payload.subject,
        &payload.body,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(campaign)).into_response())
}

/// Lists campaign history.
#[axum::debug_handler]
pub async fn list_campaigns(State(state): State<AppState>) -> Result<Json<Vec<Campaign>>> {
    let campaigns = campaign_repo::list_campaigns(&state.db).await?;
    Ok(Json(campaigns))
}

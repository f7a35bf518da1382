use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::Result,
    models::member::MemberStatus,
    services::members as members_service,
    services::members::MemberView,
    state::AppState,
};

/// The request payload for updating a member's review state.
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: MemberStatus,
}

/// Lists members with PII fields decrypted.
#[axum::debug_handler]
pub async fn list_members(State(state): State<AppState>) -> Result<Json<Vec<MemberView>>> {
    let members = members_service::list_members(&state.db, &state.cipher).await?;
    Ok(Json(members))
}

/// Exports the member list as a CSV download.
#[axum::debug_handler]
pub async fn export_members(State(state): State<AppState>) -> Result<Response> {
    let members = members_service::list_members(&state.db, &state.cipher).await?;
    let csv = members_service::export_csv(&members);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"members.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

/// Updates a member's review state.
#[axum::debug_handler]
pub async fn update_member_status(
    State(state): State<AppState>,
    Path(member_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<MemberView>> {
    let member =
        members_service::update_status(&state.db, &state.cipher, &member_id, payload.status).await?;
    tracing::info!("Member {} set to {:?}", member_id, payload.status);
    Ok(Json(member))
}

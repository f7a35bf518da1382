use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::Result,
    models::event::EventBanner,
    repositories::event as event_repo,
    repositories::message as message_repo,
    services::members as members_service,
    state::AppState,
    validation::forms::*,
};

/// The request payload for a membership application.
#[derive(Deserialize)]
pub struct ApplicationRequest {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub fiscal_code: Option<String>,
}

/// The request payload for a contact message.
#[derive(Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub body: String,
}

/// The response payload for public form submissions. Stored PII is never
/// echoed back.
#[derive(Serialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub id: Uuid,
}

/// Accepts a membership application from the public site. Phone and fiscal
/// code are encrypted before they reach the persistence gateway.
#[axum::debug_handler]
pub async fn submit_application(
    State(state): State<AppState>,
    Json(payload): Json<ApplicationRequest>,
) -> Result<impl IntoResponse> {
    validate_application(
        &payload.full_name,
        &payload.email,
        payload.phone.as_deref(),
        payload.fiscal_code.as_deref(),
    )?;

    let member = members_service::submit_application(
        &state.db,
        &state.cipher,
        &payload.full_name,
        &payload.email,
        payload.phone.as_deref(),
        payload.fiscal_code.as_deref(),
    )
    .await?;

    let response = SubmissionResponse {
        success: true,
        id: member.id,
    };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Accepts a contact message from the public site.
#[axum::debug_handler]
pub async fn submit_message(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> Result<impl IntoResponse> {
    validate_contact_message(&payload.name, &payload.email, &payload.body)?;

    let message = message_repo::insert_message(
        &state.db,
        Uuid::new_v4(),
        &payload.name,
        &payload.email,
        &payload.body,
    )
    .await?;

    tracing::info!("Contact message received: {}", message.id);

    let response = SubmissionResponse {
        success: true,
        id: message.id,
    };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Active homepage banners, ordered by start date.
#[axum::debug_handler]
pub async fn list_active_events(State(state): State<AppState>) -> Result<Json<Vec<EventBanner>>> {
    let events = event_repo::list_active(&state.db, Utc::now()).await?;
    Ok(Json(events))
}

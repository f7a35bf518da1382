use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::event::EventBanner,
    repositories::event as event_repo,
    state::AppState,
};

/// The request payload for creating an event banner.
#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub subtitle: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
}

/// The request payload for toggling a banner's visibility.
#[derive(Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

/// Lists every banner for the back-office.
#[axum::debug_handler]
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<EventBanner>>> {
    let events = event_repo::list_all(&state.db).await?;
    Ok(Json(events))
}

/// Creates a homepage event banner.
#[axum::debug_handler]
pub async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse> {
    if payload.title.trim().is_empty() {
        return Err(AppError::Validation("Title cannot be empty".to_string()));
    }
    if let Some(ends_at) = payload.ends_at {
        if ends_at < payload.starts_at {
            return Err(AppError::Validation(
                "Event cannot end before it starts".to_string(),
            ));
        }
    }

    let event = event_repo::insert_event(
        &state.db,
        Uuid::new_v4(),
        &payload.title,
        payload.subtitle.as_deref(),
        payload.starts_at,
        payload.ends_at,
    )
    .await?;

    tracing::info!("Event banner created: {}", event.id);
    Ok((StatusCode::CREATED, Json(event)).into_response())
}

/// Toggles a banner's homepage visibility.
#[axum::debug_handler]
pub async fn set_event_active(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<SetActiveRequest>,
) -> Result<Json<EventBanner>> {
    let event = event_repo::set_active(&state.db, &event_id, payload.is_active).await?;
    Ok(Json(event))
}

/// Deletes a banner.
#[axum::debug_handler]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response> {
    event_repo::delete_event(&state.db, &event_id).await?;
    tracing::info!("Event banner deleted: {}", event_id);
    Ok(StatusCode::NO_CONTENT.into_response())
}

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    error::Result,
    models::message::ContactMessage,
    repositories::message as message_repo,
    state::AppState,
};

/// Lists contact messages for the back-office.
#[axum::debug_handler]
pub async fn list_messages(State(state): State<AppState>) -> Result<Json<Vec<ContactMessage>>> {
    let messages = message_repo::list_messages(&state.db).await?;
    Ok(Json(messages))
}

/// Marks a contact message as read.
#[axum::debug_handler]
pub async fn mark_read(
    State(state): State<AppState>,
    Path(message_id): Path<Uuid>,
) -> Result<Json<ContactMessage>> {
    let message = message_repo::mark_read(&state.db, &message_id).await?;
    Ok(Json(message))
}

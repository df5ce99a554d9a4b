use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::{
    api::{middleware::auth::CurrentRole, state::AppState},
    domain::{Announcement, NewAnnouncement},
    error::Result,
    service::{ListView, Posted},
};

pub async fn list(
    State(state): State<AppState>,
    Extension(CurrentRole(role)): Extension<CurrentRole>,
) -> Result<Json<ListView<Announcement>>> {
    let view = state.service_context.content_service.announcements(role).await?;
    Ok(Json(view))
}

/// Posts an announcement and e-mails subscribers. A failed notification is
/// reported in the body; the announcement stays posted.
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<NewAnnouncement>,
) -> Result<(StatusCode, Json<Posted<Announcement>>)> {
    let posted = state.service_context.content_service.post_announcement(request).await?;
    Ok((StatusCode::CREATED, Json(posted)))
}

pub async fn toggle_pin(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Announcement>> {
    let announcement = state.service_context.content_service.toggle_pin(id).await?;
    Ok(Json(announcement))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service_context.content_service.delete_announcement(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

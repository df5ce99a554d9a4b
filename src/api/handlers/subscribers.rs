use axum::{extract::State, http::StatusCode, Json};

use crate::{
    api::state::AppState,
    domain::{normalize_email, Subscriber, SubscriptionRequest},
    error::Result,
};

pub async fn subscribe(
    State(state): State<AppState>,
    Json(request): Json<SubscriptionRequest>,
) -> Result<(StatusCode, Json<Subscriber>)> {
    let email = normalize_email(&request.email)?;
    let subscriber = state.service_context.repositories.subscribers.subscribe(&email).await?;
    tracing::info!("Subscribed {}", subscriber.email);
    Ok((StatusCode::CREATED, Json(subscriber)))
}

pub async fn unsubscribe(
    State(state): State<AppState>,
    Json(request): Json<SubscriptionRequest>,
) -> Result<StatusCode> {
    let email = normalize_email(&request.email)?;
    state.service_context.repositories.subscribers.unsubscribe(&email).await?;
    tracing::info!("Unsubscribed {}", email);
    Ok(StatusCode::NO_CONTENT)
}

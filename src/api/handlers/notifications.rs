use axum::{extract::State, Json};
use serde::Serialize;

use crate::{
    api::state::AppState,
    domain::NotificationRequest,
    error::Result,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub success: bool,
    pub message: String,
    pub sent: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_id: Option<String>,
}

/// `POST /functions/send-notification`
pub async fn send_notification(
    State(state): State<AppState>,
    Json(request): Json<NotificationRequest>,
) -> Result<Json<NotificationResponse>> {
    let result = state.service_context.notification_service.notify(&request).await?;

    let message = if result.sent == 0 {
        "No subscribers found".to_string()
    } else {
        format!("Notification sent to {} subscribers", result.sent)
    };

    Ok(Json(NotificationResponse {
        success: true,
        message,
        sent: result.sent,
        delivery_id: result.delivery_id,
    }))
}

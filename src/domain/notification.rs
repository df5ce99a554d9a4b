use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Announcement,
    Material,
}

/// Body of `POST /functions/send-notification`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    #[serde(default, rename = "content", skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_type: Option<String>,
}

impl NotificationRequest {
    pub fn announcement(title: impl Into<String>, body: Option<String>) -> Self {
        Self {
            kind: NotificationKind::Announcement,
            title: title.into(),
            body,
            material_type: None,
        }
    }

    pub fn material(title: impl Into<String>, material_type: Option<String>) -> Self {
        Self {
            kind: NotificationKind::Material,
            title: title.into(),
            body: None,
            material_type,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("Notification title is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchResult {
    pub sent: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_id: Option<String>,
}

impl DispatchResult {
    pub fn nothing_sent() -> Self {
        Self { sent: 0, delivery_id: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let req: NotificationRequest = serde_json::from_str(
            r#"{"type":"material","title":"Week 3 Slides","materialType":"PDF"}"#,
        )
        .unwrap();
        assert_eq!(req, NotificationRequest::material("Week 3 Slides", Some("PDF".to_string())));

        let req: NotificationRequest = serde_json::from_str(
            r#"{"type":"announcement","title":"Quiz","content":"Friday\nRoom 2"}"#,
        )
        .unwrap();
        assert_eq!(req.kind, NotificationKind::Announcement);
        assert_eq!(req.body.as_deref(), Some("Friday\nRoom 2"));
    }

    #[test]
    fn test_validate_rejects_blank_title() {
        assert!(NotificationRequest::announcement("  ", None).validate().is_err());
        assert!(NotificationRequest::announcement("Quiz", None).validate().is_ok());
    }
}

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    config::{CourseConfig, EmailConfig, EmailProvider},
    domain::{DispatchResult, NotificationRequest},
    error::{AppError, Result},
};

pub mod logging;
pub mod resend;
pub mod smtp;
pub mod templates;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use templates::Branding;

#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub id: String,
}

/// An outbound e-mail service. One `send` is one request to the provider,
/// addressed to every recipient at once; failures are reported as
/// `AppError::NotificationDeliveryFailed`.
#[async_trait]
pub trait EmailDelivery: Send + Sync {
    fn name(&self) -> &str;
    async fn send(&self, email: &OutboundEmail) -> Result<DeliveryReceipt>;
}

pub fn build_delivery(config: &EmailConfig) -> Result<Arc<dyn EmailDelivery>> {
    let delivery: Arc<dyn EmailDelivery> = match config.provider {
        EmailProvider::Resend => {
            let api_key = config.resend_api_key.clone().ok_or_else(|| {
                AppError::Internal("email.resend_api_key is required for the resend provider".to_string())
            })?;
            Arc::new(resend::ResendDelivery::new(api_key, config.resend_base_url.clone()))
        }
        EmailProvider::Smtp => {
            let host = config.smtp_host.as_deref().ok_or_else(|| {
                AppError::Internal("email.smtp_host is required for the smtp provider".to_string())
            })?;
            Arc::new(smtp::SmtpDelivery::new(
                host,
                config.smtp_port,
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            )?)
        }
        EmailProvider::Log => Arc::new(logging::LogDelivery),
    };

    tracing::info!("Notification e-mails go through the {} provider", delivery.name());
    Ok(delivery)
}

/// Renders a notification and hands it to the delivery service in a
/// single call.
pub struct NotificationDispatcher {
    delivery: Arc<dyn EmailDelivery>,
    from: String,
    branding: Branding,
}

impl NotificationDispatcher {
    pub fn new(delivery: Arc<dyn EmailDelivery>, from: impl Into<String>, branding: Branding) -> Self {
        Self {
            delivery,
            from: from.into(),
            branding,
        }
    }

    pub fn from_config(
        delivery: Arc<dyn EmailDelivery>,
        email: &EmailConfig,
        course: &CourseConfig,
    ) -> Self {
        Self::new(
            delivery,
            email.from.clone(),
            Branding {
                course_name: course.name.clone(),
                site_url: course.site_url.clone(),
            },
        )
    }

    pub async fn dispatch(
        &self,
        request: &NotificationRequest,
        subscribers: &[String],
    ) -> Result<DispatchResult> {
        if subscribers.is_empty() {
            tracing::info!("No subscribers for {:?} notification '{}'", request.kind, request.title);
            return Ok(DispatchResult::nothing_sent());
        }

        request.validate()?;

        let rendered = templates::render(request, &self.branding)?;
        let email = OutboundEmail {
            from: self.from.clone(),
            to: subscribers.to_vec(),
            subject: rendered.subject,
            html: rendered.html,
        };

        let receipt = self.delivery.send(&email).await.map_err(|e| match e {
            AppError::NotificationDeliveryFailed(msg) => AppError::NotificationDeliveryFailed(msg),
            other => AppError::NotificationDeliveryFailed(other.to_string()),
        })?;

        tracing::info!(
            "Sent '{}' to {} subscribers via {} (id {})",
            email.subject,
            email.to.len(),
            self.delivery.name(),
            receipt.id
        );

        Ok(DispatchResult {
            sent: email.to.len(),
            delivery_id: Some(receipt.id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::testing::{FailingDelivery, RecordingDelivery};

    fn dispatcher(delivery: Arc<dyn EmailDelivery>) -> NotificationDispatcher {
        NotificationDispatcher::new(
            delivery,
            "STAT102 Course <noreply@resend.dev>",
            Branding {
                course_name: "STAT102 - Applied Statistics".to_string(),
                site_url: "https://stat102.example.edu".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_empty_subscriber_list_sends_nothing() {
        let delivery = Arc::new(RecordingDelivery::default());
        let result = dispatcher(delivery.clone())
            .dispatch(&NotificationRequest::announcement("Midterm Date Set", None), &[])
            .await
            .unwrap();

        assert_eq!(result, DispatchResult { sent: 0, delivery_id: None });
        assert!(delivery.sent().is_empty());
    }

    #[tokio::test]
    async fn test_material_goes_out_in_one_call() {
        let delivery = Arc::new(RecordingDelivery::default());
        let subscribers = vec!["a@x.edu".to_string(), "b@x.edu".to_string()];
        let result = dispatcher(delivery.clone())
            .dispatch(
                &NotificationRequest::material("Week 3 Slides", Some("PDF".to_string())),
                &subscribers,
            )
            .await
            .unwrap();

        let sent = delivery.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, subscribers);
        assert_eq!(sent[0].subject, "New Course Material: Week 3 Slides");
        assert_eq!(sent[0].from, "STAT102 Course <noreply@resend.dev>");
        assert_eq!(result.sent, 2);
        assert!(result.delivery_id.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_addresses_are_not_collapsed() {
        let delivery = Arc::new(RecordingDelivery::default());
        let subscribers = vec!["a@x.edu".to_string(), "a@x.edu".to_string()];
        let result = dispatcher(delivery.clone())
            .dispatch(&NotificationRequest::announcement("Quiz", None), &subscribers)
            .await
            .unwrap();

        assert_eq!(result.sent, 2);
        assert_eq!(delivery.sent()[0].to.len(), 2);
    }

    #[tokio::test]
    async fn test_delivery_failure_is_not_retried() {
        let delivery = Arc::new(FailingDelivery::new("domain not verified"));
        let err = dispatcher(delivery.clone())
            .dispatch(
                &NotificationRequest::announcement("Quiz", Some("Friday".to_string())),
                &["a@x.edu".to_string()],
            )
            .await
            .unwrap_err();

        match err {
            AppError::NotificationDeliveryFailed(msg) => assert_eq!(msg, "domain not verified"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(delivery.attempts(), 1);
    }

    #[tokio::test]
    async fn test_empty_list_wins_over_blank_title() {
        let delivery = Arc::new(RecordingDelivery::default());
        let result = dispatcher(delivery.clone())
            .dispatch(&NotificationRequest::announcement(" ", None), &[])
            .await
            .unwrap();

        assert_eq!(result, DispatchResult::nothing_sent());
        assert!(delivery.sent().is_empty());
    }

    #[tokio::test]
    async fn test_blank_title_is_rejected_before_sending() {
        let delivery = Arc::new(RecordingDelivery::default());
        let err = dispatcher(delivery.clone())
            .dispatch(&NotificationRequest::announcement(" ", None), &["a@x.edu".to_string()])
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(delivery.sent().is_empty());
    }
}

use std::sync::Arc;

use crate::{
    domain::{DispatchResult, NotificationRequest},
    error::{AppError, Result},
    notifications::NotificationDispatcher,
    repository::SubscriberSource,
};

pub struct NotificationService {
    dispatcher: NotificationDispatcher,
    subscribers: Arc<dyn SubscriberSource>,
}

impl NotificationService {
    pub fn new(dispatcher: NotificationDispatcher, subscribers: Arc<dyn SubscriberSource>) -> Self {
        Self {
            dispatcher,
            subscribers,
        }
    }

    /// Load the current subscriber list and send one notification to all of
    /// it. Nothing is sent if the list cannot be loaded.
    pub async fn notify(&self, request: &NotificationRequest) -> Result<DispatchResult> {
        request.validate()?;

        let subscribers = self
            .subscribers
            .list_subscribed()
            .await
            .map_err(|e| AppError::SubscriberFetchFailed(e.to_string()))?;

        self.dispatcher.dispatch(request, &subscribers).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::{
        testing::{RecordingDelivery, StaticSubscribers, UnavailableSubscribers},
        Branding,
    };

    fn dispatcher(delivery: Arc<RecordingDelivery>) -> NotificationDispatcher {
        NotificationDispatcher::new(
            delivery,
            "course@x.edu",
            Branding {
                course_name: "STAT102".to_string(),
                site_url: "https://stat102.example.edu".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_subscriber_fetch_failure_aborts_dispatch() {
        let delivery = Arc::new(RecordingDelivery::default());
        let service = NotificationService::new(dispatcher(delivery.clone()), Arc::new(UnavailableSubscribers));

        let err = service
            .notify(&NotificationRequest::announcement("Quiz", None))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::SubscriberFetchFailed(_)));
        assert!(delivery.sent().is_empty());
    }

    #[tokio::test]
    async fn test_notify_sends_to_loaded_subscribers() {
        let delivery = Arc::new(RecordingDelivery::default());
        let service = NotificationService::new(
            dispatcher(delivery.clone()),
            Arc::new(StaticSubscribers(vec!["a@x.edu".to_string()])),
        );

        let result = service
            .notify(&NotificationRequest::announcement("Quiz", Some("Friday".to_string())))
            .await
            .unwrap();

        assert_eq!(result.sent, 1);
        assert_eq!(delivery.sent()[0].subject, "New Announcement: Quiz");
    }
}

//! In-memory collaborators for tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    notifications::{DeliveryReceipt, EmailDelivery, OutboundEmail},
    repository::SubscriberSource,
};

/// Accepts every message and remembers it.
#[derive(Default)]
pub struct RecordingDelivery {
    sent: Mutex<Vec<OutboundEmail>>,
}

impl RecordingDelivery {
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl EmailDelivery for RecordingDelivery {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, email: &OutboundEmail) -> Result<DeliveryReceipt> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(email.clone());
        }
        Ok(DeliveryReceipt {
            id: Uuid::new_v4().to_string(),
        })
    }
}

/// Rejects every message with a fixed provider error.
pub struct FailingDelivery {
    message: String,
    attempts: AtomicUsize,
}

impl FailingDelivery {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmailDelivery for FailingDelivery {
    fn name(&self) -> &str {
        "failing"
    }

    async fn send(&self, _email: &OutboundEmail) -> Result<DeliveryReceipt> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(AppError::NotificationDeliveryFailed(self.message.clone()))
    }
}

/// Subscriber source that is always unreachable.
pub struct UnavailableSubscribers;

#[async_trait]
impl SubscriberSource for UnavailableSubscribers {
    async fn list_subscribed(&self) -> Result<Vec<String>> {
        Err(AppError::Database("connection refused".to_string()))
    }
}

/// Subscriber source with a fixed list.
pub struct StaticSubscribers(pub Vec<String>);

#[async_trait]
impl SubscriberSource for StaticSubscribers {
    async fn list_subscribed(&self) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::Result,
    notifications::{DeliveryReceipt, EmailDelivery, OutboundEmail},
};

/// Development provider: writes the message to the log instead of sending it.
pub struct LogDelivery;

#[async_trait]
impl EmailDelivery for LogDelivery {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, email: &OutboundEmail) -> Result<DeliveryReceipt> {
        let id = format!("log-{}", Uuid::new_v4());
        tracing::info!(
            "Would send '{}' from {} to {} recipients ({} bytes of HTML), id {}",
            email.subject,
            email.from,
            email.to.len(),
            email.html.len(),
            id
        );
        tracing::debug!("Recipients: {}", email.to.join(", "));
        Ok(DeliveryReceipt { id })
    }
}

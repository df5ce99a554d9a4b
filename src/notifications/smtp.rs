use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{
    error::{AppError, Result},
    notifications::{DeliveryReceipt, EmailDelivery, OutboundEmail},
};

/// Delivery over SMTP with STARTTLS. Every subscriber goes on the `To`
/// line of a single message.
pub struct SmtpDelivery {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpDelivery {
    pub fn new(
        host: &str,
        port: Option<u16>,
        username: Option<String>,
        password: Option<String>,
    ) -> Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| AppError::Internal(format!("Invalid SMTP relay {}: {}", host, e)))?;

        if let Some(port) = port {
            builder = builder.port(port);
        }
        if let (Some(username), Some(password)) = (username, password) {
            builder = builder.credentials(Credentials::new(username, password));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address.parse::<Mailbox>().map_err(|e| {
        AppError::NotificationDeliveryFailed(format!("Invalid address {}: {}", address, e))
    })
}

/// One message with every recipient on the `To` line.
fn build_message(email: &OutboundEmail) -> Result<Message> {
    let mut builder = Message::builder()
        .from(parse_mailbox(&email.from)?)
        .subject(email.subject.clone())
        .header(ContentType::TEXT_HTML);

    for recipient in &email.to {
        builder = builder.to(parse_mailbox(recipient)?);
    }

    builder
        .body(email.html.clone())
        .map_err(|e| AppError::NotificationDeliveryFailed(e.to_string()))
}

#[async_trait]
impl EmailDelivery for SmtpDelivery {
    fn name(&self) -> &str {
        "smtp"
    }

    async fn send(&self, email: &OutboundEmail) -> Result<DeliveryReceipt> {
        let message = build_message(email)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| AppError::NotificationDeliveryFailed(e.to_string()))?;

        Ok(DeliveryReceipt {
            id: response.message().collect::<Vec<_>>().join(" "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(to: &[&str]) -> OutboundEmail {
        OutboundEmail {
            from: "Course <noreply@example.com>".to_string(),
            to: to.iter().map(|s| s.to_string()).collect(),
            subject: "New Course Material: Week 3 Slides".to_string(),
            html: "<p>Type: PDF</p>".to_string(),
        }
    }

    #[test]
    fn test_message_addresses_all_recipients() {
        let message = build_message(&email(&["a@x.edu", "b@x.edu"])).unwrap();

        let to = message.headers().get_raw("To").unwrap_or_default().to_string();
        assert!(to.contains("a@x.edu") && to.contains("b@x.edu"), "{}", to);
        assert_eq!(message.envelope().to().len(), 2);

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: New Course Material: Week 3 Slides"));
        assert!(raw.contains("text/html"));
    }

    #[test]
    fn test_invalid_recipient_fails_delivery() {
        let err = build_message(&email(&["not-an-address"])).unwrap_err();
        assert!(matches!(err, AppError::NotificationDeliveryFailed(_)));
    }

    #[tokio::test]
    async fn test_unreachable_relay_fails_delivery() {
        // Bind then drop to get a port nothing listens on
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let delivery = SmtpDelivery::new("localhost", Some(port), None, None).unwrap();
        let err = delivery.send(&email(&["a@x.edu"])).await.unwrap_err();
        assert!(matches!(err, AppError::NotificationDeliveryFailed(_)));
    }
}

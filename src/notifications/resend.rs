use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    notifications::{DeliveryReceipt, EmailDelivery, OutboundEmail},
};

const DEFAULT_BASE_URL: &str = "https://api.resend.com";

/// Delivery through Resend's HTTPS API.
pub struct ResendDelivery {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
}

#[derive(Deserialize)]
struct SendEmailResponse {
    id: String,
}

#[derive(Deserialize)]
struct ResendErrorBody {
    message: String,
}

impl ResendDelivery {
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        }
    }
}

#[async_trait]
impl EmailDelivery for ResendDelivery {
    fn name(&self) -> &str {
        "resend"
    }

    async fn send(&self, email: &OutboundEmail) -> Result<DeliveryReceipt> {
        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&SendEmailBody {
                from: &email.from,
                to: &email.to,
                subject: &email.subject,
                html: &email.html,
            })
            .send()
            .await
            .map_err(|e| AppError::NotificationDeliveryFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ResendErrorBody>().await {
                Ok(body) => body.message,
                Err(_) => format!("Resend returned {}", status),
            };
            tracing::warn!("Resend rejected message '{}': {}", email.subject, message);
            return Err(AppError::NotificationDeliveryFailed(message));
        }

        let sent: SendEmailResponse = response
            .json()
            .await
            .map_err(|e| AppError::NotificationDeliveryFailed(format!("Unexpected Resend response: {}", e)))?;

        Ok(DeliveryReceipt { id: sent.id })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::State,
        http::{header, HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};

    use super::*;

    struct Stub {
        status: StatusCode,
        reply: Value,
        requests: Mutex<Vec<(Option<String>, Value)>>,
    }

    async fn emails(
        State(stub): State<Arc<Stub>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        stub.requests.lock().unwrap().push((auth, body));
        (stub.status, Json(stub.reply.clone()))
    }

    /// Serves `POST /emails` on an ephemeral port and returns its base URL.
    async fn serve(stub: Arc<Stub>) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/emails", post(emails)).with_state(stub);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn email() -> OutboundEmail {
        OutboundEmail {
            from: "Course <noreply@example.com>".to_string(),
            to: vec!["a@x.edu".to_string(), "b@x.edu".to_string()],
            subject: "New Announcement: Quiz".to_string(),
            html: "<p>Friday</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_send_posts_every_recipient_in_one_request() {
        let stub = Arc::new(Stub {
            status: StatusCode::OK,
            reply: json!({ "id": "abc" }),
            requests: Mutex::new(Vec::new()),
        });
        let base_url = serve(stub.clone()).await;

        let receipt = ResendDelivery::new("key".to_string(), Some(format!("{}/", base_url)))
            .send(&email())
            .await
            .unwrap();

        assert_eq!(receipt, DeliveryReceipt { id: "abc".to_string() });

        let requests = stub.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let (auth, body) = &requests[0];
        assert_eq!(auth.as_deref(), Some("Bearer key"));
        assert_eq!(body["to"], json!(["a@x.edu", "b@x.edu"]));
        assert_eq!(body["from"], "Course <noreply@example.com>");
        assert_eq!(body["subject"], "New Announcement: Quiz");
        assert_eq!(body["html"], "<p>Friday</p>");
    }

    #[tokio::test]
    async fn test_rejection_carries_provider_message() {
        let stub = Arc::new(Stub {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            reply: json!({ "statusCode": 422, "name": "validation_error", "message": "domain not verified" }),
            requests: Mutex::new(Vec::new()),
        });
        let base_url = serve(stub.clone()).await;

        let err = ResendDelivery::new("key".to_string(), Some(base_url))
            .send(&email())
            .await
            .unwrap_err();

        match err {
            AppError::NotificationDeliveryFailed(msg) => assert_eq!(msg, "domain not verified"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(stub.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rejection_without_json_body_reports_status() {
        let stub = Arc::new(Stub {
            status: StatusCode::UNAUTHORIZED,
            reply: Value::Null,
            requests: Mutex::new(Vec::new()),
        });
        let base_url = serve(stub).await;

        let err = ResendDelivery::new("bad".to_string(), Some(base_url))
            .send(&email())
            .await
            .unwrap_err();

        match err {
            AppError::NotificationDeliveryFailed(msg) => assert!(msg.contains("401"), "{}", msg),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}

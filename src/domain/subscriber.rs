use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub email: String,
    pub subscribed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionRequest {
    pub email: String,
}

/// Lower-cases and trims an address, rejecting anything without a local
/// part and a dotted domain.
pub fn normalize_email(raw: &str) -> Result<String> {
    let email = raw.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(AppError::Validation(format!("Invalid email address: {}", raw.trim())));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  A@X.edu ").unwrap(), "a@x.edu");
        assert!(normalize_email("no-at-sign").is_err());
        assert!(normalize_email("@x.edu").is_err());
        assert!(normalize_email("a@localhost").is_err());
        assert!(normalize_email("a b@x.edu").is_err());
    }

    #[test]
    fn test_subscriber_wire_format() {
        let subscriber = Subscriber {
            email: "a@x.edu".to_string(),
            subscribed: true,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&subscriber).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
        assert_eq!(json["subscribed"], true);
    }
}

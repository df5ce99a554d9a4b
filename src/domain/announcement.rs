use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAnnouncement {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub pinned: bool,
}

impl NewAnnouncement {
    /// Trims every field and rejects blank titles or bodies. A blank link
    /// is dropped rather than stored as an empty string.
    pub fn validate(self) -> Result<NewAnnouncement> {
        let title = self.title.trim().to_string();
        let body = self.body.trim().to_string();

        if title.is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }
        if body.is_empty() {
            return Err(AppError::Validation("Details are required".to_string()));
        }

        let link = self
            .link
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());

        Ok(NewAnnouncement {
            title,
            body,
            link,
            pinned: self.pinned,
        })
    }

    pub fn into_announcement(self) -> Announcement {
        Announcement {
            id: Uuid::new_v4(),
            title: self.title,
            body: self.body,
            link: self.link,
            pinned: self.pinned,
            created_at: Utc::now(),
        }
    }
}

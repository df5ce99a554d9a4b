use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::{fs, sync::RwLock};
use uuid::Uuid;

use crate::{
    domain::{Announcement, Material, Subscriber},
    error::{AppError, Result},
    repository::{AnnouncementRepository, MaterialRepository, SubscriberRepository, SubscriberSource},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    announcements: Vec<Announcement>,
    #[serde(default)]
    materials: Vec<Material>,
    #[serde(default)]
    subscribers: Vec<Subscriber>,
}

/// Record store kept as a single JSON document on disk.
///
/// The whole document lives in memory; every mutation rewrites the file
/// through a temporary sibling and a rename, so a crash leaves either the
/// old or the new contents. Writers are serialised by the lock, and the
/// in-memory copy only changes once the new contents are on disk.
pub struct FileStore {
    path: PathBuf,
    doc: RwLock<Document>,
}

impl FileStore {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let doc = match fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => Document::default(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                AppError::Storage(format!("Corrupt record file {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Document::default(),
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        Ok(Self {
            path,
            doc: RwLock::new(doc),
        })
    }

    async fn persist(&self, doc: &Document) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(doc)
            .map_err(|e| AppError::Storage(format!("Failed to encode records: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &bytes)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &self.path).await.map_err(|e| {
            AppError::Storage(format!("Failed to replace {}: {}", self.path.display(), e))
        })?;

        Ok(())
    }

    /// Apply `change` to a copy of the document, write the copy out, then
    /// make it current. On any error the stored records are left untouched.
    async fn update<T, F>(&self, change: F) -> Result<T>
    where
        F: FnOnce(&mut Document) -> Result<T> + Send,
        T: Send,
    {
        let mut doc = self.doc.write().await;
        let mut next = doc.clone();
        let value = change(&mut next)?;
        self.persist(&next).await?;
        *doc = next;
        Ok(value)
    }
}

#[async_trait]
impl AnnouncementRepository for FileStore {
    async fn create(&self, announcement: Announcement) -> Result<Announcement> {
        self.update(|doc| {
            if doc.announcements.iter().any(|a| a.id == announcement.id) {
                return Err(AppError::Storage(format!("Duplicate announcement id {}", announcement.id)));
            }
            doc.announcements.push(announcement.clone());
            Ok(announcement)
        })
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Announcement>> {
        let doc = self.doc.read().await;
        Ok(doc.announcements.iter().find(|a| a.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Announcement>> {
        Ok(self.doc.read().await.announcements.clone())
    }

    async fn set_pinned(&self, id: Uuid, pinned: bool) -> Result<Announcement> {
        self.update(|doc| {
            let announcement = doc
                .announcements
                .iter_mut()
                .find(|a| a.id == id)
                .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))?;
            announcement.pinned = pinned;
            Ok(announcement.clone())
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.update(|doc| {
            let before = doc.announcements.len();
            doc.announcements.retain(|a| a.id != id);
            if doc.announcements.len() == before {
                return Err(AppError::NotFound("Announcement not found".to_string()));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl MaterialRepository for FileStore {
    async fn create(&self, material: Material) -> Result<Material> {
        self.update(|doc| {
            if doc.materials.iter().any(|m| m.id == material.id) {
                return Err(AppError::Storage(format!("Duplicate material id {}", material.id)));
            }
            doc.materials.push(material.clone());
            Ok(material)
        })
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Material>> {
        let doc = self.doc.read().await;
        Ok(doc.materials.iter().find(|m| m.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Material>> {
        Ok(self.doc.read().await.materials.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.update(|doc| {
            let before = doc.materials.len();
            doc.materials.retain(|m| m.id != id);
            if doc.materials.len() == before {
                return Err(AppError::NotFound("Material not found".to_string()));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl SubscriberSource for FileStore {
    async fn list_subscribed(&self) -> Result<Vec<String>> {
        let doc = self.doc.read().await;
        Ok(doc
            .subscribers
            .iter()
            .filter(|s| s.subscribed)
            .map(|s| s.email.clone())
            .collect())
    }
}

#[async_trait]
impl SubscriberRepository for FileStore {
    async fn subscribe(&self, email: &str) -> Result<Subscriber> {
        self.update(|doc| {
            let subscriber = match doc.subscribers.iter().position(|s| s.email == email) {
                Some(index) => {
                    doc.subscribers[index].subscribed = true;
                    doc.subscribers[index].clone()
                }
                None => {
                    let subscriber = Subscriber {
                        email: email.to_string(),
                        subscribed: true,
                        created_at: Utc::now(),
                    };
                    doc.subscribers.push(subscriber.clone());
                    subscriber
                }
            };
            Ok(subscriber)
        })
        .await
    }

    async fn unsubscribe(&self, email: &str) -> Result<()> {
        self.update(|doc| {
            let subscriber = doc
                .subscribers
                .iter_mut()
                .find(|s| s.email == email)
                .ok_or_else(|| AppError::NotFound("Subscriber not found".to_string()))?;
            subscriber.subscribed = false;
            Ok(())
        })
        .await
    }
}

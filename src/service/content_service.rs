use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::{
    domain::{
        Announcement, Material, ModuleFilter, NewAnnouncement, NewMaterial, NotificationRequest,
        Role,
    },
    error::{AppError, Result},
    repository::{AnnouncementRepository, MaterialRepository},
    service::{
        notification_service::NotificationService,
        projection::{project_announcements, project_materials, ListView},
    },
    web::uploads::UploadStore,
};

/// What happened to the notification that follows a successful create.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum NotificationNotice {
    Sent { sent: usize },
    Failed { message: String },
}

/// A created record together with the outcome of its notification. The
/// record is persisted either way.
#[derive(Debug, Clone, Serialize)]
pub struct Posted<T> {
    pub record: T,
    pub notification: NotificationNotice,
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct ContentService {
    announcements: Arc<dyn AnnouncementRepository>,
    materials: Arc<dyn MaterialRepository>,
    notifications: Arc<NotificationService>,
    uploads: UploadStore,
}

impl ContentService {
    pub fn new(
        announcements: Arc<dyn AnnouncementRepository>,
        materials: Arc<dyn MaterialRepository>,
        notifications: Arc<NotificationService>,
        uploads: UploadStore,
    ) -> Self {
        Self {
            announcements,
            materials,
            notifications,
            uploads,
        }
    }

    pub async fn announcements(&self, role: Role) -> Result<ListView<Announcement>> {
        let all = self.announcements.list().await?;
        let total = all.len();
        Ok(ListView::new(project_announcements(all), total, role))
    }

    pub async fn post_announcement(&self, request: NewAnnouncement) -> Result<Posted<Announcement>> {
        let request = request.validate()?;
        let announcement = self.announcements.create(request.into_announcement()).await?;
        tracing::info!("Posted announcement {} '{}'", announcement.id, announcement.title);

        let notification = self
            .notify(NotificationRequest::announcement(
                announcement.title.clone(),
                Some(announcement.body.clone()),
            ))
            .await;

        Ok(Posted {
            record: announcement,
            notification,
        })
    }

    pub async fn toggle_pin(&self, id: Uuid) -> Result<Announcement> {
        let announcement = self
            .announcements
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))?;

        self.announcements.set_pinned(id, !announcement.pinned).await
    }

    pub async fn delete_announcement(&self, id: Uuid) -> Result<()> {
        self.announcements.delete(id).await?;
        tracing::info!("Deleted announcement {}", id);
        Ok(())
    }

    pub async fn materials(
        &self,
        role: Role,
        filter: &ModuleFilter,
        query: &str,
    ) -> Result<ListView<Material>> {
        let all = self.materials.list().await?;
        Ok(ListView::new(project_materials(&all, filter, query), all.len(), role))
    }

    /// Store a new material. An uploaded file takes precedence over a
    /// pasted link.
    pub async fn add_material(
        &self,
        request: NewMaterial,
        file: Option<UploadedFile>,
    ) -> Result<Posted<Material>> {
        let mut request = request.validate(file.is_some())?;

        let uploaded_url = match &file {
            Some(file) => {
                let url = self.uploads.save(&file.file_name, &file.bytes).await?;
                request.url = url.clone();
                Some(url)
            }
            None => None,
        };

        let material = match self.materials.create(request.into_material()).await {
            Ok(material) => material,
            Err(e) => {
                if let Some(url) = uploaded_url {
                    if let Err(cleanup) = self.uploads.delete(&url).await {
                        tracing::warn!("Failed to remove orphaned upload {}: {}", url, cleanup);
                    }
                }
                return Err(e);
            }
        };
        tracing::info!("Added material {} '{}' to {}", material.id, material.title, material.module);

        let notification = self
            .notify(NotificationRequest::material(
                material.title.clone(),
                Some(material.material_type.to_string()),
            ))
            .await;

        Ok(Posted {
            record: material,
            notification,
        })
    }

    pub async fn delete_material(&self, id: Uuid) -> Result<()> {
        let material = self
            .materials
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Material not found".to_string()))?;

        self.materials.delete(id).await?;
        tracing::info!("Deleted material {}", id);

        if let Err(e) = self.uploads.delete(&material.url).await {
            tracing::warn!("Material {} deleted but its file was not: {}", id, e);
        }

        Ok(())
    }

    async fn notify(&self, request: NotificationRequest) -> NotificationNotice {
        match self.notifications.notify(&request).await {
            Ok(result) => NotificationNotice::Sent { sent: result.sent },
            Err(e) => {
                tracing::warn!("Notification for '{}' failed: {}", request.title, e);
                NotificationNotice::Failed {
                    message: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::UploadsConfig,
        domain::{MaterialType, MODULES},
        notifications::{
            testing::{FailingDelivery, RecordingDelivery, StaticSubscribers},
            Branding, EmailDelivery, NotificationDispatcher,
        },
        repository::FileStore,
    };

    struct Fixture {
        service: ContentService,
        store: Arc<FileStore>,
        dir: tempfile::TempDir,
    }

    async fn fixture(delivery: Arc<dyn EmailDelivery>, subscribers: &[&str]) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::open(dir.path().join("records.json")).await.unwrap());

        let dispatcher = NotificationDispatcher::new(
            delivery,
            "Course <noreply@example.com>",
            Branding {
                course_name: "STAT102".to_string(),
                site_url: "https://stat102.example.edu".to_string(),
            },
        );
        let subscribers = StaticSubscribers(subscribers.iter().map(|s| s.to_string()).collect());
        let notifications = Arc::new(NotificationService::new(dispatcher, Arc::new(subscribers)));

        let uploads = UploadStore::new(
            &UploadsConfig {
                dir: dir.path().join("uploads").to_string_lossy().into_owned(),
                max_file_size: 1024 * 1024,
            },
            "http://localhost:8080",
        );

        Fixture {
            service: ContentService::new(store.clone(), store.clone(), notifications, uploads),
            store,
            dir,
        }
    }

    fn new_material(url: &str) -> NewMaterial {
        NewMaterial {
            title: "Week 1 slides".to_string(),
            desc: String::new(),
            url: url.to_string(),
            material_type: MaterialType::Slides,
            module: MODULES[0].title.to_string(),
        }
    }

    #[tokio::test]
    async fn test_invalid_announcement_is_not_stored_or_sent() {
        let delivery = Arc::new(RecordingDelivery::default());
        let f = fixture(delivery.clone(), &["a@x.edu"]).await;

        let result = f
            .service
            .post_announcement(NewAnnouncement {
                title: "   ".to_string(),
                body: "Friday".to_string(),
                link: None,
                pinned: false,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(AnnouncementRepository::list(f.store.as_ref()).await.unwrap().is_empty());
        assert!(delivery.sent().is_empty());
    }

    #[tokio::test]
    async fn test_failed_notification_keeps_announcement() {
        let delivery = Arc::new(FailingDelivery::new("rate limited"));
        let f = fixture(delivery.clone(), &["a@x.edu"]).await;

        let posted = f
            .service
            .post_announcement(NewAnnouncement {
                title: "Quiz".to_string(),
                body: "Friday".to_string(),
                link: Some("  ".to_string()),
                pinned: false,
            })
            .await
            .unwrap();

        assert_eq!(posted.record.link, None);
        assert!(matches!(posted.notification, NotificationNotice::Failed { .. }));
        assert_eq!(AnnouncementRepository::list(f.store.as_ref()).await.unwrap().len(), 1);
        assert_eq!(delivery.attempts(), 1);
    }

    #[tokio::test]
    async fn test_toggle_pin_flips_state() {
        let f = fixture(Arc::new(RecordingDelivery::default()), &[]).await;
        let posted = f
            .service
            .post_announcement(NewAnnouncement {
                title: "Quiz".to_string(),
                body: "Friday".to_string(),
                link: None,
                pinned: false,
            })
            .await
            .unwrap();
        assert_eq!(posted.notification, NotificationNotice::Sent { sent: 0 });

        assert!(f.service.toggle_pin(posted.record.id).await.unwrap().pinned);
        assert!(!f.service.toggle_pin(posted.record.id).await.unwrap().pinned);

        let missing = f.service.toggle_pin(Uuid::new_v4()).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_material_needs_link_or_file() {
        let f = fixture(Arc::new(RecordingDelivery::default()), &[]).await;
        let result = f.service.add_material(new_material(""), None).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_uploaded_material_file_is_removed_with_record() {
        let delivery = Arc::new(RecordingDelivery::default());
        let f = fixture(delivery.clone(), &["a@x.edu"]).await;

        let posted = f
            .service
            .add_material(
                new_material("https://ignored.example.com/file.pdf"),
                Some(UploadedFile {
                    file_name: "week1.pptx".to_string(),
                    bytes: b"slides".to_vec(),
                }),
            )
            .await
            .unwrap();

        let url = posted.record.url.clone();
        assert!(url.starts_with("http://localhost:8080/uploads/"));
        assert_eq!(posted.notification, NotificationNotice::Sent { sent: 1 });
        assert!(delivery.sent()[0].html.contains("Type: Slides"));

        let name = url.rsplit('/').next().unwrap();
        let stored = f.dir.path().join("uploads").join(name);
        assert!(stored.exists());

        f.service.delete_material(posted.record.id).await.unwrap();
        assert!(!stored.exists());
        assert!(MaterialRepository::list(f.store.as_ref()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_material_write_removes_upload() {
        let delivery = Arc::new(RecordingDelivery::default());
        let f = fixture(delivery.clone(), &["a@x.edu"]).await;
        tokio::fs::create_dir(f.dir.path().join("records.json.tmp")).await.unwrap();

        let result = f
            .service
            .add_material(
                new_material(""),
                Some(UploadedFile {
                    file_name: "week1.pdf".to_string(),
                    bytes: b"%PDF".to_vec(),
                }),
            )
            .await;

        assert!(matches!(result, Err(AppError::Storage(_))));
        assert!(MaterialRepository::list(f.store.as_ref()).await.unwrap().is_empty());
        let mut uploads = tokio::fs::read_dir(f.dir.path().join("uploads")).await.unwrap();
        assert!(uploads.next_entry().await.unwrap().is_none());
        assert!(delivery.sent().is_empty());
    }

    #[tokio::test]
    async fn test_materials_view_reports_totals() {
        let f = fixture(Arc::new(RecordingDelivery::default()), &[]).await;
        f.service
            .add_material(new_material("https://example.com/a.pdf"), None)
            .await
            .unwrap();

        let view = f
            .service
            .materials(Role::Student, &ModuleFilter::Module(MODULES[1].title.to_string()), "")
            .await
            .unwrap();
        assert_eq!((view.shown, view.total, view.can_edit), (0, 1, false));

        let view = f.service.materials(Role::Professor, &ModuleFilter::All, "week").await.unwrap();
        assert_eq!((view.shown, view.total, view.can_edit), (1, 1, true));
    }
}

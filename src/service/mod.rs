pub mod content_service;
pub mod notification_service;
pub mod projection;

use std::sync::Arc;

use crate::auth::AuthService;
use crate::repository::*;
use content_service::ContentService;
use notification_service::NotificationService;

pub use content_service::{NotificationNotice, Posted, UploadedFile};
pub use projection::{project_announcements, project_materials, ListView};

pub struct ServiceContext {
    pub repositories: Repositories,
    pub content_service: Arc<ContentService>,
    pub notification_service: Arc<NotificationService>,
    pub auth_service: Arc<AuthService>,
}

impl ServiceContext {
    pub fn new(
        repositories: Repositories,
        notification_service: Arc<NotificationService>,
        auth_service: Arc<AuthService>,
        uploads: crate::web::uploads::UploadStore,
    ) -> Self {
        let content_service = Arc::new(ContentService::new(
            repositories.announcements.clone(),
            repositories.materials.clone(),
            notification_service.clone(),
            uploads,
        ));

        Self {
            repositories,
            content_service,
            notification_service,
            auth_service,
        }
    }
}

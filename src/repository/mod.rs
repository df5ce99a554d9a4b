use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

use crate::config::{DatabaseConfig, StoreBackend};
use crate::domain::*;
use crate::error::Result;

pub mod announcement_repository;
pub mod file_store;
pub mod material_repository;
pub mod subscriber_repository;

pub use announcement_repository::SqliteAnnouncementRepository;
pub use file_store::FileStore;
pub use material_repository::SqliteMaterialRepository;
pub use subscriber_repository::SqliteSubscriberRepository;

/// Storage for announcements. `list` returns records in insertion order;
/// presentation order is the projector's job.
#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    async fn create(&self, announcement: Announcement) -> Result<Announcement>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Announcement>>;
    async fn list(&self) -> Result<Vec<Announcement>>;
    async fn set_pinned(&self, id: Uuid, pinned: bool) -> Result<Announcement>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait MaterialRepository: Send + Sync {
    async fn create(&self, material: Material) -> Result<Material>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Material>>;
    async fn list(&self) -> Result<Vec<Material>>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Source of notification recipients.
#[async_trait]
pub trait SubscriberSource: Send + Sync {
    /// Addresses currently opted in.
    async fn list_subscribed(&self) -> Result<Vec<String>>;
}

#[async_trait]
pub trait SubscriberRepository: SubscriberSource {
    async fn subscribe(&self, email: &str) -> Result<Subscriber>;
    async fn unsubscribe(&self, email: &str) -> Result<()>;
}

#[derive(Clone)]
pub struct Repositories {
    pub announcements: Arc<dyn AnnouncementRepository>,
    pub materials: Arc<dyn MaterialRepository>,
    pub subscribers: Arc<dyn SubscriberRepository>,
    pub subscriber_source: Arc<dyn SubscriberSource>,
}

impl Repositories {
    /// Opens the backend named in configuration. SQLite databases are
    /// migrated before use; file stores are created on first write.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        match config.backend {
            StoreBackend::Sqlite => {
                let pool = SqlitePoolOptions::new()
                    .max_connections(config.max_connections)
                    .connect(&config.url)
                    .await?;

                sqlx::migrate!("./migrations").run(&pool).await?;

                tracing::info!("Using SQLite record store at {}", config.url);
                Ok(Self::sqlite(pool))
            }
            StoreBackend::File => {
                let store = Arc::new(FileStore::open(&config.file_path).await?);
                tracing::info!("Using file record store at {}", config.file_path);
                Ok(Self::file(store))
            }
        }
    }

    pub fn sqlite(pool: sqlx::SqlitePool) -> Self {
        let subscribers = Arc::new(SqliteSubscriberRepository::new(pool.clone()));
        Self {
            announcements: Arc::new(SqliteAnnouncementRepository::new(pool.clone())),
            materials: Arc::new(SqliteMaterialRepository::new(pool)),
            subscribers: subscribers.clone(),
            subscriber_source: subscribers,
        }
    }

    pub fn file(store: Arc<FileStore>) -> Self {
        Self {
            announcements: store.clone(),
            materials: store.clone(),
            subscribers: store.clone(),
            subscriber_source: store,
        }
    }
}

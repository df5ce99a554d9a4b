use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lectern::{
    api,
    auth::AuthService,
    config::Settings,
    notifications::{build_delivery, NotificationDispatcher},
    repository::Repositories,
    service::{notification_service::NotificationService, ServiceContext},
    web::uploads::UploadStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lectern=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });

    tracing::info!("Starting Lectern server on {}:{}", settings.server.host, settings.server.port);

    if settings.auth.professor_passcode_hash.is_none() && settings.auth.class_rep_passcode_hash.is_none() {
        tracing::warn!("No staff passcodes configured; run `lectern-admin issue-passcode` to create one");
    }

    // Open the record store (migrations run for SQLite)
    let repositories = Repositories::connect(&settings.database).await?;

    // Notification pipeline
    let delivery = build_delivery(&settings.email)?;
    let dispatcher = NotificationDispatcher::from_config(delivery, &settings.email, &settings.course);
    let notification_service = Arc::new(NotificationService::new(
        dispatcher,
        repositories.subscriber_source.clone(),
    ));

    let auth_service = Arc::new(AuthService::new(&settings.auth));

    let uploads = UploadStore::new(&settings.uploads, &settings.server.base_url);
    tokio::fs::create_dir_all(uploads.dir()).await?;

    // Create service context
    let service_context = Arc::new(ServiceContext::new(
        repositories,
        notification_service,
        auth_service,
        uploads,
    ));

    let app = api::create_app(service_context, Arc::new(settings.clone()));

    let listener = tokio::net::TcpListener::bind(
        format!("{}:{}", settings.server.host, settings.server.port)
    ).await?;

    tracing::info!("Server listening on http://{}:{}", settings.server.host, settings.server.port);

    axum::serve(listener, app).await?;

    Ok(())
}

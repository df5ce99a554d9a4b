pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::{
    config::Settings,
    service::ServiceContext,
    web,
};
use state::AppState;

/// Room for the non-file multipart fields on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn create_app(
    service_context: Arc<ServiceContext>,
    settings: Arc<Settings>,
) -> Router {
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Health endpoints
        .route("/health", get(handlers::root::health_check))
        .route("/api", get(handlers::root::api_info))

        // Auth routes
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))

        // API routes
        .nest("/api", api_routes(app_state.clone()))

        // Notification function, kept at its historical path
        .nest("/functions", function_routes(app_state.clone()))

        // Uploaded material files
        .merge(web::create_upload_routes(&app_state))

        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(public_api_routes(state.clone()))
        .merge(staff_api_routes(state))
}

/// Readable by anyone. The caller's role only decides `canEdit`.
fn public_api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/course", get(handlers::course::details))
        .route("/announcements", get(handlers::announcements::list))
        .route("/materials", get(handlers::materials::list))
        .route("/subscribers", post(handlers::subscribers::subscribe))
        .route("/subscribers", delete(handlers::subscribers::unsubscribe))
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::optional_role,
        ))
}

fn staff_api_routes(state: AppState) -> Router<AppState> {
    let upload_limit = state.settings.uploads.max_file_size + MULTIPART_OVERHEAD;

    Router::new()
        .route("/announcements", post(handlers::announcements::create))
        .route("/announcements/:id", delete(handlers::announcements::delete))
        .route("/announcements/:id/pin", post(handlers::announcements::toggle_pin))
        .route("/materials", post(handlers::materials::create))
        .route(
            "/materials/upload",
            post(handlers::materials::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/materials/:id", delete(handlers::materials::delete))
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_staff,
        ))
}

fn function_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/send-notification", post(handlers::notifications::send_notification))
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_staff,
        ))
}

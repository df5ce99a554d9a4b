pub mod uploads;

use axum::Router;
use tower_http::services::ServeDir;

use crate::api::state::AppState;
use uploads::UPLOADS_ROUTE;

/// Serves saved material files at `/uploads/<name>`.
pub fn create_upload_routes(state: &AppState) -> Router<AppState> {
    Router::new().nest_service(UPLOADS_ROUTE, ServeDir::new(&state.settings.uploads.dir))
}

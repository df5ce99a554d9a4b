use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    api::state::AppState,
    auth::{AuthService, SESSION_COOKIE},
    domain::Role,
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub role: Role,
    pub passcode: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub role: Role,
    pub can_edit: bool,
}

impl From<Role> for SessionResponse {
    fn from(role: Role) -> Self {
        Self {
            role,
            can_edit: role.can_edit(),
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let token = state
        .service_context
        .auth_service
        .login(req.role, req.passcode.as_deref())?;

    let secure = state.settings.server.base_url.starts_with("https://");
    let cookie = state
        .service_context
        .auth_service
        .create_session_cookie(&token, secure);

    Ok((jar.add(cookie), Json(SessionResponse::from(req.role))))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    // Sessions are stateless, dropping the cookie is enough
    (jar.add(AuthService::create_logout_cookie()), StatusCode::NO_CONTENT)
}

/// Role of the current session. Callers without one are students.
pub async fn me(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Json<SessionResponse> {
    let role = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| {
            state
                .service_context
                .auth_service
                .validate_session(cookie.value())
                .ok()
        })
        .map(|claims| claims.role)
        .unwrap_or_default();

    Json(SessionResponse::from(role))
}

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{
    api::state::AppState,
    auth::SESSION_COOKIE,
    domain::Role,
    error::AppError,
};

/// The caller's role, resolved from the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentRole(pub Role);

fn session_role(state: &AppState, jar: &CookieJar) -> Result<Role, AppError> {
    let session_cookie = jar
        .get(SESSION_COOKIE)
        .ok_or(AppError::Unauthorized)?;

    let claims = state
        .service_context
        .auth_service
        .validate_session(session_cookie.value())?;

    Ok(claims.role)
}

/// Only professors and class representatives get through.
pub async fn require_staff(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let role = session_role(&state, &jar)?;

    if !role.can_edit() {
        return Err(AppError::Forbidden);
    }

    request.extensions_mut().insert(CurrentRole(role));

    Ok(next.run(request).await)
}

/// Anyone gets through; callers without a valid session are students.
pub async fn optional_role(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let role = session_role(&state, &jar).unwrap_or_default();

    request.extensions_mut().insert(CurrentRole(role));

    next.run(request).await
}

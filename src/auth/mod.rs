//! Session-cookie authentication
//!
//! Handlers never reach into ambient session state: the middleware
//! resolves the cookie against the [`SessionStore`] and passes the
//! verified identity down as a [`CurrentUser`] request extension.

pub mod session;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use http::HeaderMap;

use crate::error::AppError;
use crate::state::AppState;
use session::{Role, SESSION_COOKIE};

/// Authenticated identity attached to the request by the auth middleware
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    /// Session token, kept so logout can destroy the session
    pub token: String,
}

/// Extract the session token from the `Cookie` header
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(http::header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

fn resolve_user(state: &AppState, headers: &HeaderMap) -> Option<CurrentUser> {
    let token = session_token(headers)?;
    let session = state.sessions.get(&token)?;
    Some(CurrentUser {
        user_id: session.user_id,
        username: session.username,
        role: session.role,
        token,
    })
}

/// Middleware requiring a valid session (any role)
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = resolve_user(&state, request.headers()).ok_or(AppError::Unauthorized)?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Middleware requiring a valid session with the admin role
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = resolve_user(&state, request.headers()).ok_or(AppError::Unauthorized)?;
    if user.role != Role::Admin {
        return Err(AppError::Forbidden("Admin role required".to_string()));
    }
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Resolve the current user without failing - for routes open to guests
pub fn optional_user(state: &AppState, headers: &HeaderMap) -> Option<CurrentUser> {
    resolve_user(state, headers)
}

//! Authentication endpoints: register, login, logout, session check

use axum::{Json, extract::State};
use http::{HeaderMap, StatusCode, header::SET_COOKIE};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::auth::optional_user;
use crate::auth::session::{Role, SESSION_COOKIE};
use crate::db::user;
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::util::{hash_password, verify_password};

fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; HttpOnly; Path=/; Max-Age=86400; SameSite=Lax")
}

fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; Path=/; Max-Age=0")
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// POST /api/register: create a customer account and log it in
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, [(http::HeaderName, String); 1], Json<Value>)> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::Validation("Missing required fields".to_string()));
    }

    let password_hash = hash_password(&req.password)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))?;

    let user_id = match user::create(
        &state.pool,
        req.name.trim(),
        req.email.trim(),
        &password_hash,
        Role::Customer.as_str(),
    )
    .await
    {
        Ok(id) => id,
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            return Err(AppError::Validation(
                "Email is already registered".to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    let token = state.sessions.create(user_id, req.name.trim(), Role::Customer);
    tracing::info!(user_id, "New account registered");

    Ok((
        StatusCode::CREATED,
        [(SET_COOKIE, session_cookie(&token))],
        Json(json!({ "message": "Registration successful.", "role": Role::Customer })),
    ))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<([(http::HeaderName, String); 1], Json<Value>)> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "Missing required fields (email and password)".to_string(),
        ));
    }

    let Some(account) = user::find_by_email(&state.pool, &req.email).await? else {
        return Err(AppError::invalid_credentials());
    };

    if !verify_password(&req.password, &account.password_hash) {
        return Err(AppError::invalid_credentials());
    }

    let role = Role::from_db(&account.role);
    let token = state.sessions.create(account.id, &account.name, role);
    tracing::debug!(user_id = account.id, "Login successful");

    Ok((
        [(SET_COOKIE, session_cookie(&token))],
        Json(json!({ "message": "Login successful.", "role": role })),
    ))
}

/// POST /api/logout: destroy the session (if any) and clear the cookie
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ([(http::HeaderName, String); 1], Json<Value>) {
    if let Some(token) = crate::auth::session_token(&headers) {
        state.sessions.destroy(&token);
    }
    (
        [(SET_COOKIE, clear_session_cookie())],
        Json(json!({ "message": "Session closed." })),
    )
}

/// GET /api/check-session: advisory login state for the frontend
pub async fn check_session(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    match optional_user(&state, &headers) {
        Some(user) => Json(json!({
            "is_logged_in": true,
            "role": user.role,
            "username": user.username,
        })),
        None => Json(json!({
            "is_logged_in": false,
            "role": "guest",
            "username": null,
        })),
    }
}

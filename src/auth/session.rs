//! In-process session store
//!
//! Opaque UUID tokens mapped to the logged-in identity, delivered to the
//! browser as an HttpOnly cookie. Sessions expire after 24 hours; a sweep
//! task in `main` evicts stale entries.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "session_id";

const SESSION_TTL_HOURS: i64 = 24;

/// User role stored on the session and in the `users.role` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Customer => "customer",
        }
    }

    /// Parse a role from its database representation, defaulting to customer
    pub fn from_db(value: &str) -> Self {
        match value {
            "admin" => Role::Admin,
            _ => Role::Customer,
        }
    }
}

/// A live session
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

/// Thread-safe session store shared across requests
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<DashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session and return its opaque token
    pub fn create(&self, user_id: i64, username: &str, role: Role) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        self.inner.insert(
            token.clone(),
            Session {
                user_id,
                username: username.to_string(),
                role,
                expires_at: Utc::now() + Duration::hours(SESSION_TTL_HOURS),
            },
        );
        token
    }

    /// Look up a session, evicting it if expired
    pub fn get(&self, token: &str) -> Option<Session> {
        let session = self.inner.get(token)?.clone();
        if session.expires_at <= Utc::now() {
            self.inner.remove(token);
            return None;
        }
        Some(session)
    }

    /// Destroy a session (logout)
    pub fn destroy(&self, token: &str) {
        self.inner.remove(token);
    }

    /// Evict all expired sessions; called periodically from `main`
    pub fn cleanup(&self) {
        let now = Utc::now();
        self.inner.retain(|_, s| s.expires_at > now);
    }

    #[cfg(test)]
    fn insert_raw(&self, token: &str, session: Session) {
        self.inner.insert(token.to_string(), session);
    }
}

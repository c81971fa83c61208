//! SessionService — issues, resolves and revokes user sessions stored in
//! SQLite. Identity itself is established elsewhere; this service only
//! records who a token belongs to and until when.

use crate::models::session::Session;
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use std::{future::Future, sync::Arc};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("user id must not be empty")]
    EmptyUserId,
    #[error("session lifetime runs past the representable date range")]
    ExpiryOutOfRange,
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// "Get current session" as consumed by the session gate.
pub trait SessionProvider {
    /// Returns the live session for `token`, or `None` when the token is
    /// unknown or expired.
    fn current_session(
        &self,
        token: &str,
    ) -> impl Future<Output = SessionResult<Option<Session>>> + Send;
}

#[derive(Clone)]
pub struct SessionService {
    pub db: Arc<SqlitePool>,

    /// Lifetime of newly issued sessions.
    pub ttl: Duration,
}

impl SessionService {
    pub fn new(db: Arc<SqlitePool>, ttl: Duration) -> Self {
        Self { db, ttl }
    }

    /// Create a session for `user_id` expiring after the configured TTL.
    pub async fn issue(&self, user_id: &str) -> SessionResult<Session> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(SessionError::EmptyUserId);
        }

        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or(SessionError::ExpiryOutOfRange)?;
        let session = Session {
            token: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            created_at: now,
            expires_at,
        };

        sqlx::query(
            "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&session.token)
        .bind(&session.user_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&*self.db)
        .await?;

        debug!(user = %session.user_id, "issued session");
        Ok(session)
    }

    /// Remove a session. Unknown tokens are ignored.
    pub async fn revoke(&self, token: &str) -> SessionResult<()> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&*self.db)
            .await?;
        debug!(removed = result.rows_affected(), "revoked session");
        Ok(())
    }
}

impl SessionProvider for SessionService {
    async fn current_session(&self, token: &str) -> SessionResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT token, user_id, created_at, expires_at FROM sessions WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&*self.db)
        .await?;

        Ok(session.filter(|s| s.is_live_at(Utc::now())))
    }
}

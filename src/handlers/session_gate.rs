//! Session gate for protected routes.
//!
//! Handlers that take a [`Viewer`] only run for requests carrying a live
//! session cookie. Everything else, including a failed lookup, is redirected
//! to `/` before the handler is entered.

use crate::{services::session_service::SessionProvider, state::AppState};
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
    response::Redirect,
};
use tracing::warn;

pub const SESSION_COOKIE: &str = "species_session";

/// The signed-in user making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: String,
}

/// Extract the session token from the `Cookie` header(s).
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
}

/// Resolve the viewer for `headers`. Lookup errors count as "no session".
pub async fn resolve_viewer<P: SessionProvider>(provider: &P, headers: &HeaderMap) -> Option<Viewer> {
    let token = session_token(headers)?;
    match provider.current_session(token).await {
        Ok(Some(session)) => Some(Viewer {
            user_id: session.user_id,
        }),
        Ok(None) => None,
        Err(err) => {
            warn!("session lookup failed: {}", err);
            None
        }
    }
}

impl FromRequestParts<AppState> for Viewer {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        resolve_viewer(&state.sessions, &parts.headers)
            .await
            .ok_or_else(|| Redirect::to("/"))
    }
}

/// `Set-Cookie` value installing `token`.
pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age_secs
    )
}

/// `Set-Cookie` value removing the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

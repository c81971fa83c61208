//! Landing page, sign-in handoff and sign-out.

use crate::{
    errors::AppError,
    handlers::session_gate::{SESSION_COOKIE, clear_session_cookie, session_cookie, session_token},
    services::session_service::SessionProvider,
    state::AppState,
    views::species_views::landing_page,
};
use axum::{
    extract::{Query, State},
    http::{HeaderMap, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub token: Option<String>,
}

/// `GET /`
pub async fn landing() -> Html<String> {
    Html(landing_page())
}

/// `GET /auth/callback?token=...` — install the session cookie for a live
/// session and continue to the list; anything else goes back to `/`.
pub async fn auth_callback(
    State(state): State<AppState>,
    Query(q): Query<CallbackQuery>,
) -> Response {
    let Some(token) = q.token.filter(|t| !t.trim().is_empty()) else {
        return Redirect::to("/").into_response();
    };

    match state.sessions.current_session(&token).await {
        Ok(Some(session)) => {
            info!(user = %session.user_id, "signed in");
            let max_age = (session.expires_at - Utc::now()).num_seconds().max(0);
            (
                [(header::SET_COOKIE, session_cookie(&session.token, max_age))],
                Redirect::to("/species"),
            )
                .into_response()
        }
        Ok(None) => Redirect::to("/").into_response(),
        Err(err) => {
            warn!("session lookup failed during sign-in: {}", err);
            Redirect::to("/").into_response()
        }
    }
}

/// `POST /auth/sign-out` — revoke the session (if any) and clear the cookie.
pub async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    if let Some(token) = session_token(&headers) {
        state.sessions.revoke(token).await?;
        info!("{} cleared", SESSION_COOKIE);
    }
    Ok((
        [(header::SET_COOKIE, clear_session_cookie())],
        Redirect::to("/"),
    ))
}

//! Defines routes for the species registry.
//!
//! ## Structure
//! - **Public endpoints**
//!   - `GET    /`                     — landing page
//!   - `GET    /healthz`, `/readyz`   — probes
//!   - `GET    /auth/callback`        — install session cookie from `?token=`
//!   - `POST   /auth/sign-out`        — revoke session, clear cookie
//!
//! - **Protected endpoints** (session gate redirects to `/`)
//!   - `GET    /species`              — list, `?q=` search, `?notice=` banner
//!   - `POST   /species`              — create
//!   - `GET    /species/new`          — create form
//!   - `GET    /species/{id}`         — details
//!   - `GET    /species/{id}/edit`    — edit form (owner)
//!   - `POST   /species/{id}/edit`    — update (owner)
//!   - `POST   /species/{id}/delete`  — delete (owner)
//!   - `GET    /api/species`          — JSON list, `?q=`
//!   - `GET    /api/species/{id}`     — JSON details

use crate::{
    handlers::{
        api_handlers::{get_species_json, list_species_json},
        auth_handlers::{auth_callback, landing, sign_out},
        health_handlers::{healthz, readyz},
        species_handlers::{
            create_species, delete_species, edit_species_form, list_species, new_species_form,
            show_species, update_species,
        },
    },
    state::AppState,
};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Build the router. State (`AppState`) is attached by the caller.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(landing))
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/auth/callback", get(auth_callback))
        .route("/auth/sign-out", post(sign_out))
        // HTML pages
        .route("/species", get(list_species).post(create_species))
        .route("/species/new", get(new_species_form))
        .route("/species/{id}", get(show_species))
        .route("/species/{id}/edit", get(edit_species_form).post(update_species))
        .route("/species/{id}/delete", post(delete_species))
        // JSON
        .route("/api/species", get(list_species_json))
        .route("/api/species/{id}", get(get_species_json))
        .layer(TraceLayer::new_for_http())
}

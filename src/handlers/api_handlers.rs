//! JSON read API mirroring the list and details pages.

use crate::{
    errors::AppError,
    handlers::session_gate::Viewer,
    models::species::Species,
    services::species_service::SpeciesStore,
    state::AppState,
    workflow::browser::SpeciesBrowser,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SpeciesSummary {
    #[serde(flatten)]
    pub species: Species,
    pub can_manage: bool,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub items: Vec<SpeciesSummary>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct SpeciesDetails {
    #[serde(flatten)]
    pub species: Species,
    pub title: String,
    pub description_text: String,
    pub population_text: String,
    pub can_manage: bool,
}

/// `GET /api/species?q=`
pub async fn list_species_json(
    viewer: Viewer,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ListResponse>, AppError> {
    let mut browser = SpeciesBrowser::load(&state.species, viewer.user_id).await;
    browser.set_query(query.q.unwrap_or_default());

    let Some(cards) = browser.cards() else {
        return Err(AppError::internal(browser.failure().unwrap_or_default()));
    };
    let items: Vec<SpeciesSummary> = cards
        .into_iter()
        .map(|card| SpeciesSummary {
            species: card.species.clone(),
            can_manage: card.can_manage,
        })
        .collect();

    Ok(Json(ListResponse {
        total: items.len(),
        items,
    }))
}

/// `GET /api/species/{id}`
pub async fn get_species_json(
    viewer: Viewer,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SpeciesDetails>, AppError> {
    let species = state.species.get(id).await?;
    Ok(Json(SpeciesDetails {
        title: species.display_title().to_string(),
        description_text: species.description_or_fallback().to_string(),
        population_text: species.population_label(),
        can_manage: species.is_owned_by(&viewer.user_id),
        species,
    }))
}

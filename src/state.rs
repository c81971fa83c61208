use crate::services::{session_service::SessionService, species_service::SpeciesService};

/// Shared router state. Each handler receives the services it needs from
/// here instead of constructing clients itself.
#[derive(Clone)]
pub struct AppState {
    pub species: SpeciesService,
    pub sessions: SessionService,
}

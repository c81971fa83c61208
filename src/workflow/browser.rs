//! The list/search state of one page view.
//!
//! `SpeciesBrowser` owns the record copy fetched for a viewer plus the live
//! search query. The copy is read-only; mutations go through the store and
//! are picked up by [`SpeciesBrowser::reload`].

use crate::{
    models::species::Species,
    services::{
        search::{filter_species, matches_query},
        species_service::SpeciesStore,
    },
};
use tracing::error;

pub const FETCH_FAILED: &str = "Failed to load species.";

#[derive(Debug)]
pub enum Listing {
    Loaded(Vec<Species>),
    /// The fetch failed as a whole; nothing is shown.
    Failed(String),
}

/// One record plus whether the viewer may edit or delete it and whether it
/// matches the current query.
#[derive(Debug, Clone, Copy)]
pub struct SpeciesCard<'a> {
    pub species: &'a Species,
    pub can_manage: bool,
    pub matches_query: bool,
}

#[derive(Debug)]
pub struct SpeciesBrowser {
    viewer_id: String,
    listing: Listing,
    query: String,
}

impl SpeciesBrowser {
    /// Fetch all records newest-first for `viewer_id`. A store failure yields
    /// a failed listing rather than an empty one.
    pub async fn load<S: SpeciesStore>(store: &S, viewer_id: impl Into<String>) -> Self {
        let mut browser = Self {
            viewer_id: viewer_id.into(),
            listing: Listing::Loaded(Vec::new()),
            query: String::new(),
        };
        browser.reload(store).await;
        browser
    }

    /// Refetch the whole record set, keeping the current query.
    pub async fn reload<S: SpeciesStore>(&mut self, store: &S) {
        self.listing = match store.list_newest_first().await {
            Ok(records) => Listing::Loaded(records),
            Err(err) => {
                error!("Error fetching species: {}", err);
                Listing::Failed(FETCH_FAILED.to_string())
            }
        };
    }

    pub fn viewer_id(&self) -> &str {
        &self.viewer_id
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn failure(&self) -> Option<&str> {
        match &self.listing {
            Listing::Failed(message) => Some(message),
            Listing::Loaded(_) => None,
        }
    }

    /// Records matching the current query, or `None` when the fetch failed.
    pub fn visible(&self) -> Option<Vec<&Species>> {
        match &self.listing {
            Listing::Loaded(records) => Some(filter_species(records, &self.query)),
            Listing::Failed(_) => None,
        }
    }

    /// Cards for the records matching the current query.
    pub fn cards(&self) -> Option<Vec<SpeciesCard<'_>>> {
        self.visible().map(|records| {
            records
                .into_iter()
                .map(|species| self.card(species, true))
                .collect()
        })
    }

    /// Cards for the whole fetched copy, flagged by the current query. The
    /// list page renders all of them and filters in place as the query
    /// changes.
    pub fn every_card(&self) -> Option<Vec<SpeciesCard<'_>>> {
        match &self.listing {
            Listing::Loaded(records) => Some(
                records
                    .iter()
                    .map(|species| self.card(species, matches_query(species, &self.query)))
                    .collect(),
            ),
            Listing::Failed(_) => None,
        }
    }

    fn card<'a>(&self, species: &'a Species, matches_query: bool) -> SpeciesCard<'a> {
        SpeciesCard {
            species,
            can_manage: species.is_owned_by(&self.viewer_id),
            matches_query,
        }
    }
}

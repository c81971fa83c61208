//! Case-insensitive substring filter over an already-fetched record set.
//!
//! A record is visible when the lowercased query occurs in any of its
//! present scientific name, common name or description. The empty query
//! matches everything. Input order is preserved.

use crate::models::species::Species;

pub fn filter_species<'a>(records: &'a [Species], query: &str) -> Vec<&'a Species> {
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|sp| matches_needle(sp, &needle))
        .collect()
}

/// Whether `species` is visible under `query`.
pub fn matches_query(species: &Species, query: &str) -> bool {
    matches_needle(species, &query.to_lowercase())
}

/// Lowercased searchable fields, one per line. The page filters on this
/// text as the user types, with the same substring rule as above.
pub fn search_text(species: &Species) -> String {
    species
        .searchable_fields()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("\n")
}

/// `needle` must already be lowercased.
fn matches_needle(species: &Species, needle: &str) -> bool {
    needle.is_empty()
        || species
            .searchable_fields()
            .any(|field| field.to_lowercase().contains(needle))
}

//! Represents a species record — the single entity tracked by the registry.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use thiserror::Error;

/// Taxonomic kingdoms accepted at write time.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Kingdom {
    #[default]
    Animalia,
    Plantae,
    Fungi,
    Protista,
    Archaea,
    Bacteria,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("`{0}` is not one of Animalia, Plantae, Fungi, Protista, Archaea, Bacteria")]
pub struct UnknownKingdom(pub String);

impl Kingdom {
    pub const ALL: [Kingdom; 6] = [
        Kingdom::Animalia,
        Kingdom::Plantae,
        Kingdom::Fungi,
        Kingdom::Protista,
        Kingdom::Archaea,
        Kingdom::Bacteria,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Kingdom::Animalia => "Animalia",
            Kingdom::Plantae => "Plantae",
            Kingdom::Fungi => "Fungi",
            Kingdom::Protista => "Protista",
            Kingdom::Archaea => "Archaea",
            Kingdom::Bacteria => "Bacteria",
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn parse(value: &str) -> Result<Self, UnknownKingdom> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == value)
            .ok_or_else(|| UnknownKingdom(value.to_string()))
    }
}

impl fmt::Display for Kingdom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Kingdom {
    type Error = UnknownKingdom;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Kingdom::parse(&value)
    }
}

/// A persisted species entry.
///
/// `id` is assigned by SQLite and never reused; `owner_id` is the user that
/// created the record and is the only viewer allowed to edit or delete it.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq)]
pub struct Species {
    pub id: i64,

    pub scientific_name: String,

    pub common_name: Option<String>,

    #[sqlx(try_from = "String")]
    pub kingdom: Kingdom,

    pub total_population: Option<i64>,

    pub description: Option<String>,

    pub owner_id: String,
}

/// Validated field set written by insert and update.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SpeciesInput {
    pub scientific_name: String,
    pub common_name: Option<String>,
    pub kingdom: Kingdom,
    pub total_population: Option<i64>,
    pub description: Option<String>,
}

impl Species {
    /// Display title: common name when present, otherwise the scientific name.
    pub fn display_title(&self) -> &str {
        self.common_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.scientific_name)
    }

    pub fn description_or_fallback(&self) -> &str {
        self.description
            .as_deref()
            .unwrap_or("No description available.")
    }

    pub fn population_label(&self) -> String {
        self.total_population
            .map(|n| n.to_string())
            .unwrap_or_else(|| "Unknown".into())
    }

    /// UI-level ownership gate. Exact string equality.
    pub fn is_owned_by(&self, viewer_id: &str) -> bool {
        self.owner_id == viewer_id
    }

    /// The three fields the search view matches against, skipping absent ones.
    pub fn searchable_fields(&self) -> impl Iterator<Item = &str> {
        [
            Some(self.scientific_name.as_str()),
            self.common_name.as_deref(),
            self.description.as_deref(),
        ]
        .into_iter()
        .flatten()
    }
}

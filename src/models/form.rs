//! Create/edit form input and its validation schema.
//!
//! The form arrives as raw strings (HTML `application/x-www-form-urlencoded`).
//! [`SpeciesForm::validate`] turns it into a [`SpeciesInput`] or reports every
//! offending field at once.

use super::species::{Kingdom, Species, SpeciesInput};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw, unvalidated form values. Missing fields deserialize as empty.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct SpeciesForm {
    pub scientific_name: String,
    pub common_name: String,
    pub kingdom: String,
    pub total_population: String,
    pub description: String,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, field: &'static str, reason: impl Into<String>) {
        self.0.push(FieldError {
            field,
            reason: reason.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.reason.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|e| e.field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.reason))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl SpeciesForm {
    /// Pre-fill the form from an existing record for editing.
    pub fn from_species(species: &Species) -> Self {
        Self {
            scientific_name: species.scientific_name.clone(),
            common_name: species.common_name.clone().unwrap_or_default(),
            kingdom: species.kingdom.as_str().to_string(),
            total_population: species
                .total_population
                .map(|n| n.to_string())
                .unwrap_or_default(),
            description: species.description.clone().unwrap_or_default(),
        }
    }

    /// Check every field against the schema.
    ///
    /// - `scientific_name`: trimmed, non-empty
    /// - `common_name`, `description`: blank means absent
    /// - `kingdom`: blank falls back to `Animalia`, otherwise must be exact
    /// - `total_population`: blank means absent, otherwise an integer > 0
    pub fn validate(&self) -> Result<SpeciesInput, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let scientific_name = self.scientific_name.trim();
        if scientific_name.is_empty() {
            errors.push("scientific_name", "is required");
        }

        let kingdom_raw = self.kingdom.trim();
        let kingdom = if kingdom_raw.is_empty() {
            Kingdom::default()
        } else {
            match Kingdom::parse(kingdom_raw) {
                Ok(k) => k,
                Err(err) => {
                    errors.push("kingdom", err.to_string());
                    Kingdom::default()
                }
            }
        };

        let population_raw = self.total_population.trim();
        let total_population = if population_raw.is_empty() {
            None
        } else {
            match population_raw.parse::<i64>() {
                Ok(n) if n > 0 => Some(n),
                Ok(_) => {
                    errors.push("total_population", "must be a positive integer");
                    None
                }
                Err(_) => {
                    errors.push("total_population", "must be a whole number");
                    None
                }
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(SpeciesInput {
            scientific_name: scientific_name.to_string(),
            common_name: optional(&self.common_name),
            kingdom,
            total_population,
            description: optional(&self.description),
        })
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> SpeciesForm {
        SpeciesForm {
            scientific_name: "  Quercus alba ".into(),
            common_name: "White Oak".into(),
            kingdom: "Plantae".into(),
            total_population: "".into(),
            description: "".into(),
        }
    }

    #[test]
    fn valid_form_is_normalized() {
        let input = form().validate().expect("valid");
        assert_eq!(input.scientific_name, "Quercus alba");
        assert_eq!(input.common_name.as_deref(), Some("White Oak"));
        assert_eq!(input.kingdom, Kingdom::Plantae);
        assert_eq!(input.total_population, None);
        assert_eq!(input.description, None);
    }

    #[test]
    fn blank_scientific_name_is_rejected() {
        let mut f = form();
        f.scientific_name = "   ".into();
        let errs = f.validate().expect_err("blank name");
        assert_eq!(errs.for_field("scientific_name"), Some("is required"));
    }

    #[test]
    fn zero_negative_and_fractional_population_are_rejected() {
        for bad in ["0", "-5", "3.5", "many"] {
            let mut f = form();
            f.total_population = bad.into();
            let errs = f.validate().expect_err(bad);
            assert_eq!(errs.fields().collect::<Vec<_>>(), vec!["total_population"]);
        }

        let mut f = form();
        f.total_population = " 42 ".into();
        assert_eq!(f.validate().expect("valid").total_population, Some(42));
    }

    #[test]
    fn kingdom_outside_enum_is_rejected() {
        let mut f = form();
        f.kingdom = "Chromista".into();
        let errs = f.validate().expect_err("bad kingdom");
        assert!(errs.for_field("kingdom").is_some());
    }

    #[test]
    fn blank_kingdom_falls_back_to_animalia() {
        let mut f = form();
        f.kingdom = String::new();
        assert_eq!(f.validate().expect("valid").kingdom, Kingdom::Animalia);
    }

    #[test]
    fn every_violation_is_reported() {
        let f = SpeciesForm {
            scientific_name: String::new(),
            kingdom: "Monera".into(),
            total_population: "0".into(),
            ..SpeciesForm::default()
        };
        let errs = f.validate().expect_err("three violations");
        assert_eq!(
            errs.fields().collect::<Vec<_>>(),
            vec!["scientific_name", "kingdom", "total_population"]
        );
    }

    #[test]
    fn prefill_round_trips_existing_record() {
        let sp = Species {
            id: 7,
            scientific_name: "Amanita muscaria".into(),
            common_name: None,
            kingdom: Kingdom::Fungi,
            total_population: Some(1_000),
            description: Some("Fly agaric".into()),
            owner_id: "bob".into(),
        };
        let f = SpeciesForm::from_species(&sp);
        assert_eq!(f.common_name, "");
        assert_eq!(f.total_population, "1000");
        let input = f.validate().expect("valid");
        assert_eq!(input.kingdom, Kingdom::Fungi);
        assert_eq!(input.description.as_deref(), Some("Fly agaric"));
    }
}

//! Create/edit form lifecycle.
//!
//! ```text
//! Closed --open--> Open --submit--> Submitting --ok--> Closed (+ reload)
//!                    ^                   |
//!                    +------error--------+
//! ```
//!
//! Validation runs before the store is touched. A store failure leaves the
//! form open with the draft untouched so the user can correct it.

use crate::{
    models::{
        form::{SpeciesForm, ValidationErrors},
        species::Species,
    },
    services::species_service::SpeciesStore,
    workflow::notification::{Notice, Notification},
};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create { owner_id: String },
    Edit { id: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorPhase {
    Closed,
    Open,
    Submitting,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditorError {
    #[error("the form is not open")]
    NotOpen,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Blocked locally; the store was not called.
    Invalid(ValidationErrors),
    /// The store refused the write; the form is still open.
    Failed(Notification),
    /// Written. The form is closed and the surrounding list must be reloaded.
    Saved {
        species: Species,
        notice: Notice,
    },
}

#[derive(Debug)]
pub struct SpeciesEditor {
    mode: EditorMode,
    phase: EditorPhase,
    draft: SpeciesForm,
    errors: ValidationErrors,
}

impl SpeciesEditor {
    /// A closed, empty form that will insert a record owned by `owner_id`.
    pub fn for_create(owner_id: impl Into<String>) -> Self {
        Self {
            mode: EditorMode::Create {
                owner_id: owner_id.into(),
            },
            phase: EditorPhase::Closed,
            draft: SpeciesForm::default(),
            errors: ValidationErrors::default(),
        }
    }

    /// A closed form pre-filled from `species`.
    pub fn for_edit(species: &Species) -> Self {
        Self {
            mode: EditorMode::Edit { id: species.id },
            phase: EditorPhase::Closed,
            draft: SpeciesForm::from_species(species),
            errors: ValidationErrors::default(),
        }
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn phase(&self) -> EditorPhase {
        self.phase
    }

    pub fn draft(&self) -> &SpeciesForm {
        &self.draft
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn open(&mut self) {
        if self.phase == EditorPhase::Closed {
            self.phase = EditorPhase::Open;
        }
    }

    /// Discard pending errors and close. The draft is kept.
    pub fn close(&mut self) {
        self.phase = EditorPhase::Closed;
        self.errors = ValidationErrors::default();
    }

    /// Replace the draft with fresh user input. Only while open.
    pub fn set_draft(&mut self, draft: SpeciesForm) -> Result<(), EditorError> {
        if self.phase != EditorPhase::Open {
            return Err(EditorError::NotOpen);
        }
        self.draft = draft;
        Ok(())
    }

    /// Validate the draft and, if clean, write it to `store`.
    pub async fn submit<S: SpeciesStore>(&mut self, store: &S) -> Result<SubmitOutcome, EditorError> {
        if self.phase != EditorPhase::Open {
            return Err(EditorError::NotOpen);
        }

        let input = match self.draft.validate() {
            Ok(input) => input,
            Err(errors) => {
                info!(
                    fields = ?errors.fields().collect::<Vec<_>>(),
                    "submission blocked by validation"
                );
                self.errors = errors.clone();
                return Ok(SubmitOutcome::Invalid(errors));
            }
        };
        self.errors = ValidationErrors::default();
        self.phase = EditorPhase::Submitting;

        let (result, notice, failure_title) = match &self.mode {
            EditorMode::Create { owner_id } => (
                store.insert(owner_id, &input).await,
                Notice::Created,
                "Create failed",
            ),
            EditorMode::Edit { id } => (
                store.update(*id, &input).await,
                Notice::Updated,
                "Update failed",
            ),
        };

        match result {
            Ok(species) => {
                info!(id = species.id, "saved species `{}`", species.scientific_name);
                self.close();
                Ok(SubmitOutcome::Saved { species, notice })
            }
            Err(err) => {
                warn!("{}: {}", failure_title, err);
                self.phase = EditorPhase::Open;
                Ok(SubmitOutcome::Failed(Notification::failure(
                    failure_title,
                    err.to_string(),
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{
        browser::{
            SpeciesBrowser,
            tests::{FakeStore, species},
        },
        notification::Severity,
    };
    use std::sync::atomic::Ordering;

    fn oak_form() -> SpeciesForm {
        SpeciesForm {
            scientific_name: "Quercus alba".into(),
            common_name: "White Oak".into(),
            kingdom: "Plantae".into(),
            total_population: "1200".into(),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn submit_requires_open_form() {
        let store = FakeStore::default();
        let mut editor = SpeciesEditor::for_create("alice");
        assert_eq!(editor.phase(), EditorPhase::Closed);
        assert_eq!(editor.set_draft(oak_form()), Err(EditorError::NotOpen));
        assert!(matches!(
            editor.submit(&store).await,
            Err(EditorError::NotOpen)
        ));
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn non_positive_population_never_reaches_store() {
        for bad in ["0", "-3"] {
            let store = FakeStore::default();
            let mut editor = SpeciesEditor::for_create("alice");
            editor.open();
            editor
                .set_draft(SpeciesForm {
                    total_population: bad.into(),
                    ..oak_form()
                })
                .unwrap();

            let outcome = editor.submit(&store).await.unwrap();
            assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
            assert_eq!(editor.phase(), EditorPhase::Open);
            assert!(editor.errors().for_field("total_population").is_some());
            assert_eq!(store.writes.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn unknown_kingdom_never_reaches_store() {
        let store = FakeStore::default();
        let mut editor = SpeciesEditor::for_create("alice");
        editor.open();
        editor
            .set_draft(SpeciesForm {
                kingdom: "Chromista".into(),
                ..oak_form()
            })
            .unwrap();

        assert!(matches!(
            editor.submit(&store).await.unwrap(),
            SubmitOutcome::Invalid(_)
        ));
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn insert_failure_keeps_form_open_with_input() {
        let store = FakeStore {
            fail_writes: Some("duplicate key value".into()),
            ..FakeStore::default()
        };
        let mut editor = SpeciesEditor::for_create("alice");
        editor.open();
        editor.set_draft(oak_form()).unwrap();

        let outcome = editor.submit(&store).await.unwrap();
        let SubmitOutcome::Failed(notification) = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert_eq!(notification.title, "Create failed");
        assert_eq!(notification.severity, Severity::Destructive);
        assert!(notification.description.contains("duplicate key value"));

        assert_eq!(editor.phase(), EditorPhase::Open);
        assert_eq!(editor.draft(), &oak_form());
        assert!(store.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn successful_update_closes_and_reload_sees_changes() {
        let store = FakeStore::with(vec![
            species(1, "Quercus alba", Some("White Oak"), "alice"),
            species(3, "Panthera leo", Some("Lion"), "bob"),
        ]);
        let mut browser = SpeciesBrowser::load(&store, "alice").await;

        let current = store.get(1).await.unwrap();
        let mut editor = SpeciesEditor::for_edit(&current);
        editor.open();
        editor
            .set_draft(SpeciesForm {
                common_name: "Eastern White Oak".into(),
                ..SpeciesForm::from_species(&current)
            })
            .unwrap();

        let outcome = editor.submit(&store).await.unwrap();
        let SubmitOutcome::Saved { species, notice } = outcome else {
            panic!("expected save, got {outcome:?}");
        };
        assert_eq!(species.id, 1);
        assert_eq!(notice, Notice::Updated);
        assert_eq!(notice.notification().title, "Species updated!");
        assert_eq!(notice.notification().severity, Severity::Normal);
        assert_eq!(editor.phase(), EditorPhase::Closed);

        browser.reload(&store).await;
        browser.set_query("eastern");
        let visible = browser.visible().unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].common_name.as_deref(), Some("Eastern White Oak"));
        assert_eq!(visible[0].owner_id, "alice");
    }

    #[tokio::test]
    async fn create_assigns_owner() {
        let store = FakeStore::default();
        let mut editor = SpeciesEditor::for_create("carol");
        editor.open();
        editor.set_draft(oak_form()).unwrap();

        let SubmitOutcome::Saved { species, notice } = editor.submit(&store).await.unwrap() else {
            panic!("expected save");
        };
        assert_eq!(notice, Notice::Created);
        assert_eq!(species.owner_id, "carol");
        assert_eq!(species.total_population, Some(1200));
    }
}

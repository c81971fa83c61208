//! HTML handlers for the species list, details and the create/edit form.
//! All of them sit behind the session gate via the [`Viewer`] extractor.

use crate::{
    errors::AppError,
    handlers::session_gate::Viewer,
    models::{form::SpeciesForm, species::Species},
    services::species_service::SpeciesStore,
    state::AppState,
    views::species_views::{details_page, form_page, list_page},
    workflow::{
        browser::SpeciesBrowser,
        editor::{EditorPhase, SpeciesEditor, SubmitOutcome},
        notification::Notice,
    },
};
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{debug, info, warn};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub notice: Option<String>,
}

/// `GET /species` — fetch newest-first, apply `?q=`, render cards.
///
/// A failed fetch renders the failure message with HTTP 500.
pub async fn list_species(
    viewer: Viewer,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Response {
    let mut browser = SpeciesBrowser::load(&state.species, viewer.user_id).await;
    browser.set_query(query.q.unwrap_or_default());

    let notification = query
        .notice
        .as_deref()
        .and_then(Notice::parse)
        .map(Notice::notification);
    let html = Html(list_page(&browser, notification.as_ref()));

    if browser.failure().is_some() {
        (StatusCode::INTERNAL_SERVER_ERROR, html).into_response()
    } else {
        html.into_response()
    }
}

/// `GET /species/{id}`
pub async fn show_species(
    viewer: Viewer,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let species = state.species.get(id).await?;
    Ok(Html(details_page(&species, &viewer.user_id)))
}

/// `GET /species/new`
pub async fn new_species_form(viewer: Viewer) -> Html<String> {
    let mut editor = SpeciesEditor::for_create(viewer.user_id.clone());
    editor.open();
    Html(form_page(&editor, &viewer.user_id, None))
}

/// `POST /species`
pub async fn create_species(
    viewer: Viewer,
    State(state): State<AppState>,
    Form(form): Form<SpeciesForm>,
) -> Result<Response, AppError> {
    let mut editor = SpeciesEditor::for_create(viewer.user_id.clone());
    editor.open();
    editor.set_draft(form)?;
    let outcome = editor.submit(&state.species).await?;
    Ok(respond_to_submit(&editor, &viewer, outcome))
}

/// `GET /species/{id}/edit` — owner only.
pub async fn edit_species_form(
    viewer: Viewer,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let species = state.species.get(id).await?;
    ensure_owner(&species, &viewer)?;

    let mut editor = SpeciesEditor::for_edit(&species);
    editor.open();
    Ok(Html(form_page(&editor, &viewer.user_id, None)))
}

/// `POST /species/{id}/edit` — owner only.
pub async fn update_species(
    viewer: Viewer,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<SpeciesForm>,
) -> Result<Response, AppError> {
    let species = state.species.get(id).await?;
    ensure_owner(&species, &viewer)?;

    let mut editor = SpeciesEditor::for_edit(&species);
    editor.open();
    editor.set_draft(form)?;
    let outcome = editor.submit(&state.species).await?;
    Ok(respond_to_submit(&editor, &viewer, outcome))
}

/// `POST /species/{id}/delete` — owner only.
pub async fn delete_species(
    viewer: Viewer,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    let species = state.species.get(id).await?;
    ensure_owner(&species, &viewer)?;

    state.species.delete(id).await?;
    info!(id, user = %viewer.user_id, "species deleted");
    Ok(reload_with(Notice::Deleted))
}

/// Server-side re-check of the ownership gate shown in the UI.
fn ensure_owner(species: &Species, viewer: &Viewer) -> Result<(), AppError> {
    if species.is_owned_by(&viewer.user_id) {
        Ok(())
    } else {
        warn!(
            id = species.id,
            user = %viewer.user_id,
            "refusing change to species owned by someone else"
        );
        Err(AppError::forbidden(format!(
            "species `{}` belongs to another user",
            species.id
        )))
    }
}

/// Success reloads the list; anything else re-renders the still-open form.
fn respond_to_submit(editor: &SpeciesEditor, viewer: &Viewer, outcome: SubmitOutcome) -> Response {
    match outcome {
        SubmitOutcome::Saved { species, notice } => {
            debug_assert_eq!(editor.phase(), EditorPhase::Closed);
            info!(
                id = species.id,
                user = %viewer.user_id,
                notice = notice.as_str(),
                "species saved"
            );
            reload_with(notice).into_response()
        }
        SubmitOutcome::Invalid(errors) => {
            debug!(user = %viewer.user_id, "re-rendering form: {}", errors);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(form_page(editor, &viewer.user_id, None)),
            )
                .into_response()
        }
        SubmitOutcome::Failed(notification) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(form_page(editor, &viewer.user_id, Some(&notification))),
        )
            .into_response(),
    }
}

fn reload_with(notice: Notice) -> Redirect {
    Redirect::to(&format!("/species?notice={}", notice.as_str()))
}

//! Pages for the species list, record cards, details and the create/edit form.

use super::{escape_html, layout, notification_banner};
use crate::{
    models::species::{Kingdom, Species},
    services::search::search_text,
    workflow::{
        browser::{SpeciesBrowser, SpeciesCard},
        editor::{EditorMode, SpeciesEditor},
        notification::Notification,
    },
};

/// Hides cards whose `data-search` text lacks the lowercased query and
/// toggles the empty-state message. The same rule runs server-side for `?q=`.
const LIVE_SEARCH_SCRIPT: &str = concat!(
    "<script>function filterSpecies(q){q=q.toLowerCase();var n=0;",
    "document.querySelectorAll('#species-cards .card').forEach(function(c){",
    "var m=c.dataset.search.indexOf(q)!==-1;c.hidden=!m;if(m){n++;}});",
    "document.getElementById('species-empty').hidden=n>0;}</script>"
);

pub fn landing_page() -> String {
    layout(
        "Species Registry",
        None,
        concat!(
            "<h1>Species Registry</h1>",
            "<p>Sign in to view and manage species records. ",
            "Ask an administrator for a sign-in link.</p>"
        ),
    )
}

/// The protected list view. When the fetch failed, only the failure message
/// is rendered: no search box, no cards, no add/edit/delete affordances.
pub fn list_page(browser: &SpeciesBrowser, notification: Option<&Notification>) -> String {
    let mut body = String::new();
    if let Some(n) = notification {
        body.push_str(&notification_banner(n));
    }
    body.push_str("<div class=\"toolbar\"><h2>Species List</h2>");

    let Some(cards) = browser.every_card() else {
        body.push_str("</div><hr>");
        body.push_str(&format!(
            "<p class=\"error\">{}</p>",
            escape_html(browser.failure().unwrap_or_default())
        ));
        return layout("Species List", Some(browser.viewer_id()), &body);
    };

    body.push_str("<a class=\"button\" href=\"/species/new\">Add Species</a></div><hr>");
    body.push_str(LIVE_SEARCH_SCRIPT);
    body.push_str(&format!(
        concat!(
            "<form method=\"get\" action=\"/species\" class=\"search\">",
            "<input type=\"search\" name=\"q\" placeholder=\"Search species...\" ",
            "value=\"{}\" oninput=\"filterSpecies(this.value)\" autocomplete=\"off\">",
            "<noscript><button type=\"submit\">Search</button></noscript></form>"
        ),
        escape_html(browser.query())
    ));

    let any_match = cards.iter().any(|card| card.matches_query);
    body.push_str("<div class=\"cards\" id=\"species-cards\">");
    for card in &cards {
        body.push_str(&species_card(card));
    }
    body.push_str(&format!(
        "<p class=\"empty\" id=\"species-empty\"{}>No species found.</p>",
        hidden_attr(!any_match)
    ));
    body.push_str("</div>");

    layout("Species List", Some(browser.viewer_id()), &body)
}

fn hidden_attr(hidden: bool) -> &'static str {
    if hidden { " hidden" } else { "" }
}

/// Summary card. Edit/delete controls only for the owner; cards outside the
/// current query are rendered hidden.
pub fn species_card(card: &SpeciesCard<'_>) -> String {
    let sp = card.species;
    let mut html = format!(
        concat!(
            "<article class=\"card\" data-id=\"{id}\" data-search=\"{search}\"{hidden}>",
            "<h3>{title}</h3>",
            "<h4><em>{scientific}</em></h4>",
            "<p>{description}</p>",
            "<a class=\"button\" href=\"/species/{id}\">Learn More</a>"
        ),
        id = sp.id,
        search = escape_html(&search_text(sp)),
        hidden = hidden_attr(!card.matches_query),
        title = escape_html(sp.display_title()),
        scientific = escape_html(&sp.scientific_name),
        description = escape_html(sp.description.as_deref().unwrap_or_default()),
    );
    if card.can_manage {
        html.push_str(&owner_actions(sp));
    }
    html.push_str("</article>");
    html
}

fn owner_actions(sp: &Species) -> String {
    format!(
        concat!(
            "<div class=\"owner-actions\">",
            "<a class=\"button secondary\" href=\"/species/{id}/edit\">Edit</a>",
            "<form method=\"post\" action=\"/species/{id}/delete\">",
            "<button type=\"submit\" class=\"destructive\">Delete</button></form>",
            "</div>"
        ),
        id = sp.id
    )
}

/// Read-only expanded view with fallbacks for absent optional fields.
pub fn details_page(sp: &Species, viewer_id: &str) -> String {
    let mut body = format!(
        concat!(
            "<section class=\"details\">",
            "<h2>{title}</h2>",
            "<p class=\"description\">{description}</p>",
            "<p><strong>Scientific Name:</strong> {scientific}</p>",
            "<p><strong>Kingdom:</strong> {kingdom}</p>",
            "<p><strong>Total Population:</strong> {population}</p>"
        ),
        title = escape_html(sp.display_title()),
        description = escape_html(sp.description_or_fallback()),
        scientific = escape_html(&sp.scientific_name),
        kingdom = sp.kingdom,
        population = escape_html(&sp.population_label()),
    );
    if sp.is_owned_by(viewer_id) {
        body.push_str(&owner_actions(sp));
    }
    body.push_str("<a href=\"/species\">Back to list</a></section>");
    layout(sp.display_title(), Some(viewer_id), &body)
}

/// The open create/edit form, re-rendered with the user's draft, any field
/// errors and an optional failure notification.
pub fn form_page(
    editor: &SpeciesEditor,
    viewer_id: &str,
    notification: Option<&Notification>,
) -> String {
    let (heading, blurb, action, submit) = match editor.mode() {
        EditorMode::Create { .. } => (
            "Add Species",
            "Add a new species here. Click \"Add Species\" below when you're done.".to_string(),
            "/species".to_string(),
            "Add Species",
        ),
        EditorMode::Edit { id } => (
            "Edit Species",
            "Update the details of this species.".to_string(),
            format!("/species/{}/edit", id),
            "Save Changes",
        ),
    };

    let draft = editor.draft();
    let errors = editor.errors();
    let field_error = |field: &str| {
        errors
            .for_field(field)
            .map(|reason| format!("<span class=\"field-error\">{}</span>", escape_html(reason)))
            .unwrap_or_default()
    };

    let mut body = String::new();
    if let Some(n) = notification {
        body.push_str(&notification_banner(n));
    }
    body.push_str(&format!(
        "<h2>{}</h2><p>{}</p><form method=\"post\" action=\"{}\" class=\"species-form\">",
        heading,
        escape_html(&blurb),
        action
    ));

    body.push_str(&text_input(
        "scientific_name",
        "Scientific Name",
        &draft.scientific_name,
        &field_error("scientific_name"),
    ));
    body.push_str(&text_input(
        "common_name",
        "Common Name",
        &draft.common_name,
        &field_error("common_name"),
    ));

    body.push_str("<label>Kingdom<select name=\"kingdom\">");
    let selected = Kingdom::parse(draft.kingdom.trim()).unwrap_or_default();
    for k in Kingdom::ALL {
        body.push_str(&format!(
            "<option value=\"{0}\"{1}>{0}</option>",
            k,
            if k == selected { " selected" } else { "" }
        ));
    }
    body.push_str("</select>");
    body.push_str(&field_error("kingdom"));
    body.push_str("</label>");

    body.push_str(&format!(
        concat!(
            "<label>Total Population",
            "<input type=\"number\" name=\"total_population\" min=\"1\" step=\"1\" ",
            "placeholder=\"Total Population\" value=\"{}\">{}</label>"
        ),
        escape_html(&draft.total_population),
        field_error("total_population")
    ));
    body.push_str(&format!(
        concat!(
            "<label>Description",
            "<textarea name=\"description\" placeholder=\"Description\">{}</textarea>{}</label>"
        ),
        escape_html(&draft.description),
        field_error("description")
    ));

    body.push_str(&format!(
        concat!(
            "<div class=\"actions\"><button type=\"submit\">{}</button>",
            "<a class=\"button secondary\" href=\"/species\">Cancel</a></div></form>"
        ),
        submit
    ));

    layout(heading, Some(viewer_id), &body)
}

fn text_input(name: &str, label: &str, value: &str, error: &str) -> String {
    format!(
        "<label>{label}<input type=\"text\" name=\"{name}\" placeholder=\"{label}\" value=\"{}\">{error}</label>",
        escape_html(value)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::form::SpeciesForm;

    fn oak() -> Species {
        Species {
            id: 1,
            scientific_name: "Quercus alba".into(),
            common_name: Some("White Oak".into()),
            kingdom: Kingdom::Plantae,
            total_population: None,
            description: None,
            owner_id: "alice".into(),
        }
    }

    #[test]
    fn card_hides_owner_actions_from_others() {
        let sp = oak();
        let mine = species_card(&SpeciesCard {
            species: &sp,
            can_manage: true,
            matches_query: true,
        });
        let theirs = species_card(&SpeciesCard {
            species: &sp,
            can_manage: false,
            matches_query: true,
        });
        assert!(mine.contains("/species/1/edit"));
        assert!(mine.contains("/species/1/delete"));
        assert!(!theirs.contains("/species/1/edit"));
        assert!(!theirs.contains("/species/1/delete"));
        assert!(theirs.contains("Learn More"));
    }

    #[test]
    fn card_carries_lowercased_search_text() {
        let sp = Species {
            description: Some("Tall & \"stately\"".into()),
            ..oak()
        };
        let shown = species_card(&SpeciesCard {
            species: &sp,
            can_manage: false,
            matches_query: true,
        });
        assert!(shown.starts_with(&format!(
            "<article class=\"card\" data-id=\"1\" data-search=\"{}\">",
            "quercus alba\nwhite oak\ntall &amp; &quot;stately&quot;"
        )));

        let filtered_out = species_card(&SpeciesCard {
            species: &sp,
            can_manage: false,
            matches_query: false,
        });
        assert!(filtered_out.starts_with("<article "));
        assert!(filtered_out.contains("&quot;\" hidden>"));
    }

    #[tokio::test]
    async fn list_page_filters_in_place_as_the_query_changes() {
        use crate::workflow::browser::tests::{FakeStore, species};

        let store = FakeStore::with(vec![
            species(3, "Panthera leo", Some("Lion"), "bob"),
            species(1, "Quercus alba", Some("White Oak"), "alice"),
        ]);
        let mut browser = SpeciesBrowser::load(&store, "alice").await;
        browser.set_query("oak");
        let html = list_page(&browser, None);

        assert!(html.contains("oninput=\"filterSpecies(this.value)\""));
        assert!(html.contains("function filterSpecies(q)"));
        assert!(html.contains("value=\"oak\""));
        // the whole fetched copy is on the page; non-matches start hidden
        assert!(html.contains("data-id=\"3\" data-search=\"panthera leo\nlion\" hidden>"));
        assert!(html.contains("data-id=\"1\" data-search=\"quercus alba\nwhite oak\">"));
        assert!(html.contains("<p class=\"empty\" id=\"species-empty\" hidden>"));

        browser.set_query("zebra");
        let html = list_page(&browser, None);
        assert!(html.contains("<p class=\"empty\" id=\"species-empty\">No species found.</p>"));
    }

    #[test]
    fn details_show_fallback_text() {
        let html = details_page(&oak(), "bob");
        assert!(html.contains("<h2>White Oak</h2>"));
        assert!(html.contains("No description available."));
        assert!(html.contains("<strong>Total Population:</strong> Unknown"));
        assert!(html.contains("<strong>Kingdom:</strong> Plantae"));
        assert!(!html.contains("/species/1/edit"));
    }

    #[test]
    fn edit_form_preserves_draft_and_errors() {
        let mut editor = SpeciesEditor::for_edit(&oak());
        editor.open();
        editor
            .set_draft(SpeciesForm {
                scientific_name: "Quercus <alba>".into(),
                kingdom: "Fungi".into(),
                total_population: "0".into(),
                ..SpeciesForm::default()
            })
            .unwrap();

        let html = form_page(&editor, "alice", None);
        assert!(html.contains("action=\"/species/1/edit\""));
        assert!(html.contains("value=\"Quercus &lt;alba&gt;\""));
        assert!(html.contains("<option value=\"Fungi\" selected>"));
        assert!(html.contains("value=\"0\""));
    }
}

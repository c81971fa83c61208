//! Server-rendered HTML. Every piece of user-supplied text goes through
//! [`escape_html`] before it reaches the page.

pub mod species_views;

use crate::workflow::notification::{Notification, Severity};

pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Wrap `body` in the shared page chrome. A sign-out button is shown when
/// the page is rendered for a signed-in viewer.
pub fn layout(title: &str, viewer: Option<&str>, body: &str) -> String {
    let mut html = String::from("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">");
    html.push_str(&format!("<title>{}</title>", escape_html(title)));
    html.push_str("</head><body><header>");
    html.push_str("<a href=\"/species\">Species Registry</a>");
    if let Some(user) = viewer {
        html.push_str(&format!(
            concat!(
                "<span class=\"viewer\">Signed in as {}</span>",
                "<form method=\"post\" action=\"/auth/sign-out\">",
                "<button type=\"submit\">Sign out</button></form>"
            ),
            escape_html(user)
        ));
    }
    html.push_str("</header><main>");
    html.push_str(body);
    html.push_str("</main></body></html>");
    html
}

/// Dismissible banner for a success or failure notification.
pub fn notification_banner(notification: &Notification) -> String {
    let class = match notification.severity {
        Severity::Normal => "toast",
        Severity::Destructive => "toast destructive",
    };
    format!(
        concat!(
            "<div class=\"{}\" role=\"status\">",
            "<strong>{}</strong><p>{}</p>",
            "<button type=\"button\" onclick=\"this.parentElement.remove()\">Dismiss</button>",
            "</div>"
        ),
        class,
        escape_html(&notification.title),
        escape_html(&notification.description)
    )
}

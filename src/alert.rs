//! Alert messages that are swapped into the page's alert container by htmx.
//!
//! Forms set `hx-target-error="#alert-container"` so that error responses
//! rendered with [Alert] replace the contents of that container.

use maud::{Markup, html};

/// Alert message types for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertType {
    Success,
    Error,
}

/// A dismissable alert with a short message and optional details.
#[derive(Debug, Clone)]
pub struct Alert {
    pub alert_type: AlertType,
    pub message: String,
    pub details: String,
}

impl Alert {
    /// Create a new success alert
    pub fn success(message: &str, details: &str) -> Self {
        Self {
            alert_type: AlertType::Success,
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Create a new error alert
    pub fn error(message: &str, details: &str) -> Self {
        Self {
            alert_type: AlertType::Error,
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    pub fn into_html(self) -> Markup {
        let colour_style = match self.alert_type {
            AlertType::Success => {
                "text-green-800 bg-green-50 border-green-300 \
                dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
            }
            AlertType::Error => {
                "text-red-800 bg-red-50 border-red-300 \
                dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
            }
        };

        html! {
            div
                role="alert"
                class={"flex items-start p-4 mb-4 text-sm border rounded-lg shadow " (colour_style)}
            {
                div class="flex-1"
                {
                    span class="font-semibold" { (self.message) }

                    @if !self.details.is_empty() {
                        p class="mt-1" { (self.details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    class="ms-3 font-bold"
                    onclick="this.parentElement.remove()"
                {
                    "×"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn error_alert_shows_message_and_details() {
        let html = Alert::error("Could not save", "Try again later.")
            .into_html()
            .into_string();
        let fragment = Html::parse_fragment(&html);

        let alert = fragment
            .select(&Selector::parse("div[role=alert]").unwrap())
            .next()
            .expect("alert element missing");
        let text = alert.text().collect::<String>();

        assert!(text.contains("Could not save"));
        assert!(text.contains("Try again later."));
        assert!(alert.value().attr("class").unwrap().contains("text-red-800"));
    }

    #[test]
    fn details_paragraph_is_omitted_when_empty() {
        let html = Alert::success("Saved", "").into_html().into_string();
        let fragment = Html::parse_fragment(&html);

        let paragraphs = fragment.select(&Selector::parse("p").unwrap()).count();

        assert_eq!(paragraphs, 0);
    }
}

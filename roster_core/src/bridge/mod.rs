//! Form submission bridge
//!
//! Client-side counterpart of the `POST /schedules` endpoint. The hosting
//! view intercepts its form's submit event (suppressing the native
//! navigation), captures the fields into a [`FormSnapshot`], and hands it
//! to [`FormBridge::submit`], which issues exactly one URL-encoded POST to
//! the page's own URL and decodes the reply into a tagged
//! [`SubmitOutcome`]. [`dispatch`] then applies the outcome to the UI
//! through the [`SubmitView`] seam: close the modal, notify, and reload on
//! success; render the flattened field errors inline on a validation
//! failure; render a generic message on anything else.
//!
//! One call is one request. There is no retry, no timeout, and no
//! in-flight guard; overlapping submissions are unordered relative to
//! each other.

pub mod outcome;
pub mod view;

pub use outcome::{SubmitOutcome, UNEXPECTED_ERROR_MESSAGE};
pub use view::SubmitView;

use reqwest::Url;

use outcome::{decode_response, flatten_messages};

/// Ordered key/value capture of a form's fields at submit time.
///
/// Order is preserved so the serialized payload matches form order, the
/// way a browser would serialize the element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    fields: Vec<(String, String)>,
}

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field append.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First value submitted under `name`, if any.
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }
}

impl FromIterator<(String, String)> for FormSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// The bridge itself: constructed once by the hosting view with the URL
/// the form posts to (the page's own URL).
#[derive(Debug, Clone)]
pub struct FormBridge {
    client: reqwest::Client,
    url: Url,
}

impl FormBridge {
    pub fn new(url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    /// Shares an existing client, e.g. the application-wide one.
    pub fn with_client(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Posts the snapshot and decodes the reply. Transport failures and
    /// undecodable bodies collapse into [`SubmitOutcome::Failed`]; nothing
    /// is retried or escalated.
    pub async fn submit(&self, form: &FormSnapshot) -> SubmitOutcome {
        let response = match self
            .client
            .post(self.url.clone())
            .form(&form.fields())
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(url = %self.url, error = %err, "form submission failed to send");
                return SubmitOutcome::Failed;
            }
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(url = %self.url, error = %err, "failed to read submission response");
                return SubmitOutcome::Failed;
            }
        };

        decode_response(status, &body)
    }

    /// Submits and immediately applies the outcome to the view.
    pub async fn submit_and_render(
        &self,
        form: &FormSnapshot,
        view: &mut dyn SubmitView,
    ) -> SubmitOutcome {
        let outcome = self.submit(form).await;
        dispatch(&outcome, view);
        outcome
    }
}

/// Applies a decoded outcome to the hosting view.
///
/// Success closes the modal, notifies with the server's message, and
/// reloads once. A validation failure leaves the modal open and renders
/// every field message, joined by line breaks, into the inline error
/// region. Any other failure renders the generic message into the same
/// region.
pub fn dispatch(outcome: &SubmitOutcome, view: &mut dyn SubmitView) {
    match outcome {
        SubmitOutcome::Success { message } => {
            view.close_modal();
            view.notify(message);
            view.reload();
        }
        SubmitOutcome::Invalid { field_errors } => {
            view.show_errors(&flatten_messages(field_errors));
        }
        SubmitOutcome::Failed => {
            view.show_errors(UNEXPECTED_ERROR_MESSAGE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct RecordingView {
        modal_closed: bool,
        notifications: Vec<String>,
        errors_shown: Vec<String>,
        reloads: usize,
    }

    impl SubmitView for RecordingView {
        fn close_modal(&mut self) {
            self.modal_closed = true;
        }

        fn notify(&mut self, message: &str) {
            self.notifications.push(message.to_string());
        }

        fn show_errors(&mut self, text: &str) {
            self.errors_shown.push(text.to_string());
        }

        fn reload(&mut self) {
            self.reloads += 1;
        }
    }

    #[test]
    fn snapshot_preserves_form_order() {
        let form = FormSnapshot::new()
            .field("schedule", "1")
            .field("role", "2")
            .field("person", "3");

        let names: Vec<&str> = form.fields().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["schedule", "role", "person"]);
        assert_eq!(form.value_of("role"), Some("2"));
        assert_eq!(form.value_of("missing"), None);
    }

    #[test]
    fn success_outcome_closes_notifies_and_reloads_once() {
        let outcome = SubmitOutcome::Success {
            message: "Saved".to_string(),
        };
        let mut view = RecordingView::default();

        dispatch(&outcome, &mut view);

        assert!(view.modal_closed);
        assert_eq!(view.notifications, ["Saved"]);
        assert_eq!(view.reloads, 1);
        assert!(view.errors_shown.is_empty());
    }

    #[test]
    fn invalid_outcome_renders_joined_messages_and_keeps_modal_open() {
        let mut field_errors = BTreeMap::new();
        field_errors.insert("date".to_string(), vec!["Invalid date".to_string()]);
        field_errors.insert("role".to_string(), vec!["Required".to_string()]);
        let outcome = SubmitOutcome::Invalid { field_errors };
        let mut view = RecordingView::default();

        dispatch(&outcome, &mut view);

        assert!(!view.modal_closed);
        assert_eq!(view.reloads, 0);
        assert_eq!(view.errors_shown, ["Invalid date\nRequired"]);
    }

    #[test]
    fn failed_outcome_renders_the_generic_message() {
        let mut view = RecordingView::default();

        dispatch(&SubmitOutcome::Failed, &mut view);

        assert!(!view.modal_closed);
        assert_eq!(view.errors_shown, [UNEXPECTED_ERROR_MESSAGE]);
    }
}

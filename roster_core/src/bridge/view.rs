//! UI seam for submission outcomes
//!
//! The bridge never touches presentation directly; the hosting
//! application implements this trait over whatever it renders with.

/// Side effects a submission outcome may require of the hosting view.
pub trait SubmitView {
    /// Hide the modal dialog containing the form.
    fn close_modal(&mut self);

    /// Present a non-blocking notification (toast) with the server's
    /// message.
    fn notify(&mut self, message: &str);

    /// Render the given text into the inline error region inside the
    /// modal. The modal stays open for correction.
    fn show_errors(&mut self, text: &str);

    /// Reload the hosting page to reflect server-side state.
    fn reload(&mut self);
}

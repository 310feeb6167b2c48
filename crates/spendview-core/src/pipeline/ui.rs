use crate::model::ChartVariant;

/// Status shown when the upload trigger fires without a file
pub const MSG_SELECT_FILE: &str = "Select a file first.";
/// Status shown after storage accepted the file
pub const MSG_UPLOADED: &str = "Uploaded! Data has updated!";
/// Status shown for any credential/transfer failure
pub const MSG_UPLOAD_FAILED: &str = "Upload failed.";

/// Output port for user-visible state.
///
/// Implementations bind these calls to whatever front-end hosts the
/// dashboard (terminal, web page, test recorder).
pub trait UiPort: Send + Sync {
    /// Enable or disable the upload trigger
    fn set_trigger_enabled(&self, enabled: bool);

    /// Show or hide the progress indicator
    fn set_progress_visible(&self, visible: bool);

    /// Update the progress indicator (0-100)
    fn set_progress(&self, percent: u8);

    /// Replace the status line
    fn set_status(&self, message: &str);

    /// Reflect the selected chart variant on the toggle controls
    fn set_active_variant(&self, variant: ChartVariant);

    /// Forget the selected file
    fn clear_file_selection(&self);
}

//! [`UiPort`] adapter printing upload progress and status lines.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use spendview_core::pipeline::UiPort;
use spendview_core::ChartVariant;
use tracing::debug;

/// Width of the progress bar in cells
const PROGRESS_WIDTH: usize = 20;

/// Prints status and progress to a writer (stderr in the binary)
pub struct ConsoleUi<W> {
    out: Mutex<W>,
    trigger_enabled: AtomicBool,
    progress_visible: AtomicBool,
}

impl<W: Write + Send> ConsoleUi<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            trigger_enabled: AtomicBool::new(true),
            progress_visible: AtomicBool::new(false),
        }
    }

    /// Whether a new upload may be started
    pub fn trigger_enabled(&self) -> bool {
        self.trigger_enabled.load(Ordering::Acquire)
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn line(&self, text: &str) {
        let mut out = self.out.lock();
        // Console output is best-effort
        let _ = writeln!(out, "{}", text);
        let _ = out.flush();
    }
}

/// `[#####---------------]  25%`
fn progress_bar(percent: u8) -> String {
    let percent = percent.min(100) as usize;
    let filled = percent * PROGRESS_WIDTH / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_WIDTH - filled),
        percent
    )
}

impl<W: Write + Send> UiPort for ConsoleUi<W> {
    fn set_trigger_enabled(&self, enabled: bool) {
        self.trigger_enabled.store(enabled, Ordering::Release);
        debug!("Upload trigger {}", if enabled { "enabled" } else { "disabled" });
    }

    fn set_progress_visible(&self, visible: bool) {
        self.progress_visible.store(visible, Ordering::Release);
    }

    fn set_progress(&self, percent: u8) {
        if self.progress_visible.load(Ordering::Acquire) {
            self.line(&progress_bar(percent));
        }
    }

    fn set_status(&self, message: &str) {
        if !message.is_empty() {
            self.line(message);
        }
    }

    fn set_active_variant(&self, variant: ChartVariant) {
        debug!("Active chart: {}", variant.display_name());
    }

    fn clear_file_selection(&self) {
        debug!("File selection cleared");
    }
}

//! Upload pipeline: credential -> transfer -> settle -> reconcile.
//!
//! Each step starts only after the previous one resolved. A busy flag keeps
//! at most one attempt in flight; triggering while busy does nothing.

mod session;
mod ui;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, info_span, warn, Instrument};

use crate::api::events::{emit, EventSender};
use crate::api::CoreEvent;
use crate::backend::{BackendError, ExpenseBackend};
use crate::chart::ChartSurface;
use crate::config::UploadSettings;
use crate::fetcher::SummaryFetcher;

pub(crate) use session::BusyGuard;
pub use session::{UploadFile, UploadSession};
pub use ui::{UiPort, MSG_SELECT_FILE, MSG_UPLOADED, MSG_UPLOAD_FAILED};

#[cfg(test)]
pub(crate) use ui::testing;

/// Error returned by [`UploadPipeline::start_upload`]
#[derive(Debug, Error)]
pub enum UploadError {
    /// The trigger fired with no file selected
    #[error("no file selected")]
    NoFileSelected,

    /// The file exceeds the configured upload limit
    #[error("file is {size} bytes, limit is {limit}")]
    FileTooLarge { size: u64, limit: u64 },

    /// The presign endpoint failed
    #[error("could not acquire upload credential: {0}")]
    CredentialAcquisitionFailed(#[source] BackendError),

    /// Storage did not accept the file
    #[error("transfer to storage failed: {0}")]
    TransferFailed(#[source] BackendError),
}

/// How a call to [`UploadPipeline::start_upload`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Another attempt was in flight; nothing was done
    Ignored,
    /// The file was stored; `refreshed` tells whether the follow-up
    /// summary fetch succeeded
    Completed { refreshed: bool },
}

/// Orchestrates one upload attempt at a time
pub struct UploadPipeline<B, S: ChartSurface, U> {
    backend: Arc<B>,
    fetcher: Arc<SummaryFetcher<B, S>>,
    ui: Arc<U>,
    settings: UploadSettings,
    busy: AtomicBool,
    events: EventSender,
}

impl<B, S, U> UploadPipeline<B, S, U>
where
    B: ExpenseBackend,
    S: ChartSurface,
    U: UiPort,
{
    pub(crate) fn new(
        backend: Arc<B>,
        fetcher: Arc<SummaryFetcher<B, S>>,
        ui: Arc<U>,
        settings: UploadSettings,
        events: EventSender,
    ) -> Self {
        Self {
            backend,
            fetcher,
            ui,
            settings,
            busy: AtomicBool::new(false),
            events,
        }
    }

    /// Whether an upload attempt is in flight
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Upload `file` and refresh the totals once storage accepted it.
    ///
    /// Returns [`UploadOutcome::Ignored`] without any I/O if another
    /// attempt holds the busy flag.
    pub async fn start_upload(
        &self,
        file: Option<UploadFile>,
    ) -> Result<UploadOutcome, UploadError> {
        let Some(guard) = BusyGuard::acquire(&self.busy) else {
            info!("Upload already in progress, ignoring trigger");
            return Ok(UploadOutcome::Ignored);
        };

        let Some(file) = file else {
            self.ui.set_status(MSG_SELECT_FILE);
            return Err(UploadError::NoFileSelected);
        };

        if file.size() > self.settings.max_file_bytes {
            self.ui.set_status(MSG_UPLOAD_FAILED);
            return Err(UploadError::FileTooLarge {
                size: file.size(),
                limit: self.settings.max_file_bytes,
            });
        }

        let session = UploadSession::new(file);
        let span = info_span!("upload", session = %session.id());
        self.run(session, guard).instrument(span).await
    }

    async fn run(
        &self,
        mut session: UploadSession,
        guard: BusyGuard<'_>,
    ) -> Result<UploadOutcome, UploadError> {
        if let Some(warning) = session.file().processing_warning() {
            warn!("{}", warning);
        }
        info!(
            "Uploading {} ({} bytes, {})",
            session.file().name(),
            session.file().size(),
            session.file().mime()
        );

        self.ui.set_trigger_enabled(false);
        self.update_status(&mut session, "");
        self.ui.set_progress_visible(true);
        self.update_progress(&mut session, 0);
        emit(
            &self.events,
            CoreEvent::UploadStarted {
                session: session.id(),
                file_name: session.file().name().to_string(),
            },
        );

        if let Err(e) = self.transfer(&mut session).await {
            error!("Upload failed: {}", e);
            self.update_status(&mut session, MSG_UPLOAD_FAILED);
            self.ui.set_progress_visible(false);
            self.ui.set_trigger_enabled(true);
            emit(
                &self.events,
                CoreEvent::UploadFailed {
                    session: session.id(),
                    reason: e.to_string(),
                },
            );
            return Err(e);
        }

        if let Some(post) = session.credential() {
            info!("Stored {} at {}", session.file().name(), post.url);
        }

        // Settle: give the backend time to process the receipt
        self.update_progress(&mut session, 100);
        self.update_status(&mut session, MSG_UPLOADED);
        tokio::time::sleep(self.settings.settle_delay()).await;

        // Reconcile: the UI is idle again before the summary comes back
        self.ui.set_progress_visible(false);
        let refresh = self.fetcher.refresh();
        self.ui.set_trigger_enabled(true);
        self.ui.clear_file_selection();
        self.update_progress(&mut session, 0);
        drop(guard);

        let refreshed = match refresh.await {
            Ok(_) => true,
            Err(e) => {
                warn!("Totals not refreshed after upload: {}", e);
                false
            }
        };
        info!("Upload settled (refreshed: {})", refreshed);
        emit(
            &self.events,
            CoreEvent::UploadSettled {
                session: session.id(),
                refreshed,
            },
        );
        Ok(UploadOutcome::Completed { refreshed })
    }

    /// Steps 1 and 2: acquire the credential, then push the file
    async fn transfer(&self, session: &mut UploadSession) -> Result<(), UploadError> {
        let credential = self
            .backend
            .presign()
            .await
            .map_err(UploadError::CredentialAcquisitionFailed)?;

        let result = self.backend.transfer(&credential, session.file()).await;
        session.set_credential(credential);
        let receipt = result.map_err(UploadError::TransferFailed)?;

        if !receipt.is_success() {
            if self.settings.strict_transfer {
                return Err(UploadError::TransferFailed(BackendError::Status {
                    status: receipt.status,
                }));
            }
            warn!(
                "Storage answered HTTP {}; reporting success (strict_transfer is off)",
                receipt.status
            );
        }
        Ok(())
    }

    fn update_progress(&self, session: &mut UploadSession, percent: u8) {
        session.set_progress(percent);
        self.ui.set_progress(session.progress());
    }

    fn update_status(&self, session: &mut UploadSession, message: &str) {
        session.set_status(message);
        self.ui.set_status(session.status());
    }
}

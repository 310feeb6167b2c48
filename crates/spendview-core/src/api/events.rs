//! Core event system for push-based change notification.
//!
//! Front-ends that do not want to poll the model subscribe through
//! [`Dashboard::subscribe()`](super::Dashboard::subscribe) and react to
//! these events instead.

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::model::{CategoryTotals, ChartVariant};

/// Default broadcast channel capacity
pub(crate) const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Sender half shared by the fetcher, pipeline and facade
pub(crate) type EventSender = broadcast::Sender<CoreEvent>;

/// Events emitted by the core when state changes occur.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreEvent {
    /// Totals were replaced by a successful summary fetch
    TotalsUpdated { totals: CategoryTotals },

    /// A chart was (re)mounted on the surface
    ChartRendered { variant: ChartVariant },

    /// The user picked another chart variant
    VariantChanged { variant: ChartVariant },

    /// An upload session began
    UploadStarted { session: Uuid, file_name: String },

    /// An upload settled and the summary was re-queried
    UploadSettled { session: Uuid, refreshed: bool },

    /// An upload failed during credential acquisition or transfer
    UploadFailed { session: Uuid, reason: String },
}

/// Create the broadcast channel; the initial receiver is dropped.
pub(crate) fn event_channel() -> EventSender {
    let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
    event_tx
}

/// Send an event, ignoring the error raised when nobody is subscribed
pub(crate) fn emit(tx: &EventSender, event: CoreEvent) {
    let _ = tx.send(event);
}

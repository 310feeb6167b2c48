//! Dashboard: the Facade entry-point for all consumers (CLI, tests, other front-ends).
//!
//! This struct owns every component and exposes high-level methods.
//! Consumers never need to acquire locks or wire components themselves.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

use super::events::{emit, CoreEvent, EventSender};
use crate::backend::ExpenseBackend;
use crate::chart::{ChartConfig, ChartSurface, SharedRenderer, SurfaceError};
use crate::config::Settings;
use crate::fetcher::{FetchError, SummaryFetcher};
use crate::model::{CategoryTotals, ChartVariant, SharedModel};
use crate::pipeline::{UiPort, UploadError, UploadFile, UploadOutcome, UploadPipeline};

/// The Facade that wires model, renderer, fetcher and upload pipeline.
///
/// Constructed via [`DashboardBuilder`](super::builder::DashboardBuilder).
pub struct Dashboard<B, S: ChartSurface, U> {
    /// Application settings
    settings: Arc<Settings>,
    /// Totals and selected variant
    model: SharedModel,
    /// Renderer owning the live chart
    renderer: SharedRenderer<S>,
    /// Summary fetcher shared with the pipeline
    fetcher: Arc<SummaryFetcher<B, S>>,
    /// Upload pipeline
    pipeline: UploadPipeline<B, S, U>,
    /// UI output port
    ui: Arc<U>,
    /// Broadcast sender for core events
    event_tx: EventSender,
}

impl<B, S, U> Dashboard<B, S, U>
where
    B: ExpenseBackend,
    S: ChartSurface,
    U: UiPort,
{
    pub(crate) fn new(
        settings: Arc<Settings>,
        model: SharedModel,
        renderer: SharedRenderer<S>,
        backend: Arc<B>,
        ui: Arc<U>,
        event_tx: EventSender,
    ) -> Self {
        let fetcher = Arc::new(SummaryFetcher::new(
            backend.clone(),
            model.clone(),
            renderer.clone(),
            event_tx.clone(),
        ));
        let pipeline = UploadPipeline::new(
            backend,
            fetcher.clone(),
            ui.clone(),
            settings.upload.clone(),
            event_tx.clone(),
        );
        Self {
            settings,
            model,
            renderer,
            fetcher,
            pipeline,
            ui,
            event_tx,
        }
    }

    // =========================================================
    // Actions
    // =========================================================

    /// Page-load initialisation: reflect the selected variant and fetch totals once
    pub async fn start(&self) -> Result<CategoryTotals, FetchError> {
        let variant = self.variant();
        self.ui.set_active_variant(variant);
        info!("Dashboard starting ({} chart)", variant);
        self.refresh().await
    }

    /// Re-query the summary and redraw the current variant
    pub async fn refresh(&self) -> Result<CategoryTotals, FetchError> {
        self.fetcher.refresh().await
    }

    /// Select another chart variant and redraw the current totals with it
    pub fn switch_variant(&self, variant: ChartVariant) -> Result<ChartConfig, SurfaceError> {
        let totals = {
            let mut model = self.model.write();
            model.set_variant(variant);
            model.totals()
        };
        self.ui.set_active_variant(variant);
        emit(&self.event_tx, CoreEvent::VariantChanged { variant });

        let config = self.renderer.lock().render(variant, &totals)?;
        emit(&self.event_tx, CoreEvent::ChartRendered { variant });
        Ok(config)
    }

    /// Run one upload attempt (see [`UploadPipeline::start_upload`])
    pub async fn start_upload(
        &self,
        file: Option<UploadFile>,
    ) -> Result<UploadOutcome, UploadError> {
        self.pipeline.start_upload(file).await
    }

    // =========================================================
    // Queries
    // =========================================================

    /// Latest committed totals
    pub fn totals(&self) -> CategoryTotals {
        self.model.read().totals()
    }

    /// Currently selected variant
    pub fn variant(&self) -> ChartVariant {
        self.model.read().variant()
    }

    /// Whether an upload is in flight
    pub fn is_busy(&self) -> bool {
        self.pipeline.is_busy()
    }

    /// Access application settings (read-only)
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[cfg(test)]
    pub(crate) fn model(&self) -> &SharedModel {
        &self.model
    }

    /// Access the renderer (and through it the surface)
    pub fn renderer(&self) -> &SharedRenderer<S> {
        &self.renderer
    }

    #[cfg(test)]
    pub(crate) fn ui(&self) -> &U {
        &self.ui
    }

    /// Subscribe to core events.
    ///
    /// If the receiver falls behind, older events are dropped (lagged).
    pub fn subscribe(&self) -> broadcast::Receiver<CoreEvent> {
        self.event_tx.subscribe()
    }
}

//! Summary fetcher: pull aggregated totals and redraw the chart.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::events::{emit, EventSender};
use crate::api::CoreEvent;
use crate::backend::{BackendError, ExpenseBackend};
use crate::chart::{ChartSurface, SharedRenderer};
use crate::model::{CategoryTotals, SharedModel};

/// Error returned by [`SummaryFetcher::refresh`]
#[derive(Debug, Error)]
pub enum FetchError {
    /// The summary could not be retrieved or normalized
    #[error("summary fetch failed: {0}")]
    SummaryFetchFailed(#[source] BackendError),
}

/// Retrieves category totals and pushes them into the model and renderer
pub struct SummaryFetcher<B, S: ChartSurface> {
    backend: Arc<B>,
    model: SharedModel,
    renderer: SharedRenderer<S>,
    events: EventSender,
}

impl<B, S> SummaryFetcher<B, S>
where
    B: ExpenseBackend,
    S: ChartSurface,
{
    pub(crate) fn new(
        backend: Arc<B>,
        model: SharedModel,
        renderer: SharedRenderer<S>,
        events: EventSender,
    ) -> Self {
        Self {
            backend,
            model,
            renderer,
            events,
        }
    }

    /// Fetch the summary, replace the totals and redraw the selected variant.
    ///
    /// On failure the model is not touched and nothing is redrawn.
    pub async fn refresh(&self) -> Result<CategoryTotals, FetchError> {
        let totals = match self.fetch().await {
            Ok(totals) => totals,
            Err(e) => {
                warn!("Error fetching chart data: {}", e);
                return Err(FetchError::SummaryFetchFailed(e));
            }
        };
        debug!("Chart data: {}", serde_json::to_string(&totals).unwrap_or_default());

        let variant = {
            let mut model = self.model.write();
            model.set_totals(totals);
            model.variant()
        };
        emit(&self.events, CoreEvent::TotalsUpdated { totals });

        match self.renderer.lock().render(variant, &totals) {
            Ok(_) => emit(&self.events, CoreEvent::ChartRendered { variant }),
            Err(e) => warn!("Failed to draw {} chart: {}", variant, e),
        }

        info!("Totals refreshed (sum {})", totals.total());
        Ok(totals)
    }

    async fn fetch(&self) -> Result<CategoryTotals, BackendError> {
        let body = self.backend.fetch_summary().await?;
        CategoryTotals::from_summary(&body).map_err(|e| BackendError::malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::events::event_channel;
    use crate::backend::testing::FakeBackend;
    use crate::chart::testing::RecordingSurface;
    use crate::chart::ChartRenderer;
    use crate::model::{ChartDataModel, ChartVariant};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fetcher(
        backend: FakeBackend,
        variant: ChartVariant,
    ) -> SummaryFetcher<FakeBackend, RecordingSurface> {
        SummaryFetcher::new(
            Arc::new(backend),
            ChartDataModel::shared(variant),
            ChartRenderer::new(RecordingSurface::default(), "₹").shared(),
            event_channel(),
        )
    }

    #[tokio::test]
    async fn test_refresh_normalizes_and_renders_selected_variant() {
        let backend = FakeBackend::default();
        backend.push_summary(Ok(json!({ "Food": 500 })));
        let fetcher = fetcher(backend, ChartVariant::Pie);

        let totals = fetcher.refresh().await.unwrap();

        assert_eq!(totals, CategoryTotals::new(500.0, 0.0, 0.0, 0.0));
        assert_eq!(fetcher.model.read().totals(), totals);
        let renderer = fetcher.renderer.lock();
        assert_eq!(renderer.surface().mounted.len(), 1);
        assert_eq!(renderer.surface().mounted[0].variant, ChartVariant::Pie);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_totals() {
        let backend = FakeBackend::default();
        backend.push_summary(Ok(json!({ "Food": 1.5, "Travel": 20 })));
        backend.push_summary(Ok(json!({ "Food": "lots" })));
        backend.push_summary(Err(BackendError::Status { status: 500 }));
        backend.push_summary(Ok(json!("not an object")));
        let fetcher = fetcher(backend, ChartVariant::Radar);

        let before = fetcher.refresh().await.unwrap();
        let stamped = fetcher.model.read().fetched_at();

        for _ in 0..3 {
            let err = fetcher.refresh().await.unwrap_err();
            assert!(matches!(err, FetchError::SummaryFetchFailed(_)));
        }

        let model = fetcher.model.read();
        let after = model.totals();
        assert_eq!(
            before.amounts().map(f64::to_bits),
            after.amounts().map(f64::to_bits)
        );
        assert_eq!(model.fetched_at(), stamped);
        assert_eq!(fetcher.renderer.lock().surface().mounted.len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_emits_events() {
        let backend = FakeBackend::default();
        backend.push_summary(Ok(json!({ "Clothes": 40 })));
        let fetcher = fetcher(backend, ChartVariant::Radar);
        let mut rx = fetcher.events.subscribe();

        fetcher.refresh().await.unwrap();

        assert_eq!(
            rx.recv().await.unwrap(),
            CoreEvent::TotalsUpdated {
                totals: CategoryTotals::new(0.0, 40.0, 0.0, 0.0)
            }
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            CoreEvent::ChartRendered {
                variant: ChartVariant::Radar
            }
        );
    }

    #[tokio::test]
    async fn test_render_failure_still_commits_totals() {
        let backend = FakeBackend::default();
        backend.push_summary(Ok(json!({ "Medical": 9 })));
        let fetcher = fetcher(backend, ChartVariant::Radar);
        fetcher.renderer.lock().surface_mut().fail_next = true;

        let totals = fetcher.refresh().await.unwrap();

        assert_eq!(fetcher.model.read().totals(), totals);
        assert!(!fetcher.renderer.lock().is_mounted());
    }
}

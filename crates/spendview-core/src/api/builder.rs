//! Builder for constructing a [`Dashboard`] instance.
//!
//! ```ignore
//! let dashboard = DashboardBuilder::new(backend, surface, ui)
//!     .with_settings(settings)
//!     .build();
//! ```

use std::sync::Arc;

use crate::backend::ExpenseBackend;
use crate::chart::{ChartRenderer, ChartSurface};
use crate::config::Settings;
use crate::model::{ChartDataModel, SharedModel};
use crate::pipeline::UiPort;

use super::core::Dashboard;
use super::events::event_channel;

/// Builder for constructing a [`Dashboard`] Facade instance
pub struct DashboardBuilder<B, S, U> {
    backend: Arc<B>,
    surface: S,
    ui: Arc<U>,
    settings: Arc<Settings>,
    model: Option<SharedModel>,
}

impl<B, S, U> DashboardBuilder<B, S, U>
where
    B: ExpenseBackend,
    S: ChartSurface,
    U: UiPort,
{
    /// Create a new builder with default settings
    pub fn new(backend: B, surface: S, ui: U) -> Self {
        Self {
            backend: Arc::new(backend),
            surface,
            ui: Arc::new(ui),
            settings: Arc::new(Settings::default()),
            model: None,
        }
    }

    /// Use the given settings
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Arc::new(settings);
        self
    }

    /// Use already-shared settings
    pub fn with_shared_settings(mut self, settings: Arc<Settings>) -> Self {
        self.settings = settings;
        self
    }

    /// Use an existing shared model instead of creating a new one
    pub fn with_model(mut self, model: SharedModel) -> Self {
        self.model = Some(model);
        self
    }

    /// Build the `Dashboard` instance
    ///
    /// If no model was provided, a fresh one is created with
    /// `chart.default_variant` selected and all totals at zero.
    pub fn build(self) -> Dashboard<B, S, U> {
        let model = self
            .model
            .unwrap_or_else(|| ChartDataModel::shared(self.settings.chart.default_variant));
        let renderer =
            ChartRenderer::new(self.surface, self.settings.chart.currency_symbol.clone()).shared();

        Dashboard::new(
            self.settings,
            model,
            renderer,
            self.backend,
            self.ui,
            event_channel(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::FakeBackend;
    use crate::chart::testing::RecordingSurface;
    use crate::model::{CategoryTotals, ChartVariant};
    use crate::pipeline::testing::RecordingUi;
    use pretty_assertions::assert_eq;

    fn builder() -> DashboardBuilder<FakeBackend, RecordingSurface, RecordingUi> {
        DashboardBuilder::new(
            FakeBackend::default(),
            RecordingSurface::default(),
            RecordingUi::default(),
        )
    }

    #[test]
    fn test_builder_defaults() {
        let dash = builder().build();

        assert_eq!(dash.variant(), ChartVariant::Radar);
        assert_eq!(dash.totals(), CategoryTotals::default());
        assert_eq!(dash.settings().upload.settle_delay_ms, 3000);
        assert!(!dash.is_busy());
        assert!(!dash.renderer().lock().is_mounted());
    }

    #[test]
    fn test_builder_default_variant_from_settings() {
        let mut settings = Settings::default();
        settings.chart.default_variant = ChartVariant::Pie;

        let dash = builder().with_settings(settings).build();

        assert_eq!(dash.variant(), ChartVariant::Pie);
    }

    #[test]
    fn test_builder_with_model() {
        let model = ChartDataModel::shared(ChartVariant::Pie);
        model
            .write()
            .set_totals(CategoryTotals::new(1.0, 2.0, 3.0, 4.0));

        let dash = builder().with_model(model.clone()).build();

        assert!(Arc::ptr_eq(dash.model(), &model));
        assert_eq!(dash.totals(), CategoryTotals::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn test_builder_currency_symbol_reaches_renderer() {
        let mut settings = Settings::default();
        settings.chart.currency_symbol = "$".to_string();
        let model = ChartDataModel::shared(ChartVariant::Radar);
        model
            .write()
            .set_totals(CategoryTotals::new(1200.0, 0.0, 0.0, 0.0));

        let dash = builder()
            .with_shared_settings(Arc::new(settings))
            .with_model(model)
            .build();
        let config = dash.switch_variant(ChartVariant::Radar).unwrap();

        assert_eq!(config.options.tooltips[0], "Food: $1,200");
    }
}

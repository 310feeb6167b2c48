use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

use super::config::ChartConfig;
use crate::model::{CategoryTotals, ChartVariant};

/// Shared renderer type alias
pub type SharedRenderer<S> = Arc<Mutex<ChartRenderer<S>>>;

/// Error raised by a display surface while mounting a chart
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// Writing to the underlying terminal/file failed
    #[error("surface I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The surface refused the configuration
    #[error("surface rejected chart: {message}")]
    Rejected { message: String },
}

/// Display surface that a chart configuration is drawn on.
///
/// `mount` creates a live chart instance and returns its handle; `dispose`
/// tears it down again, releasing anything the instance registered.
pub trait ChartSurface {
    /// Live chart instance bound to the surface
    type Handle;

    /// Draw `config` and return the live instance
    fn mount(&mut self, config: &ChartConfig) -> Result<Self::Handle, SurfaceError>;

    /// Tear down a previously mounted instance
    fn dispose(&mut self, handle: Self::Handle);
}

/// Draws charts on a surface, keeping at most one live instance.
pub struct ChartRenderer<S: ChartSurface> {
    surface: S,
    current: Option<S::Handle>,
    currency_symbol: String,
}

impl<S: ChartSurface> ChartRenderer<S> {
    /// Create a renderer that prefixes amounts with `currency_symbol`
    pub fn new(surface: S, currency_symbol: impl Into<String>) -> Self {
        Self {
            surface,
            current: None,
            currency_symbol: currency_symbol.into(),
        }
    }

    /// Wrap into a shared renderer
    pub fn shared(self) -> SharedRenderer<S> {
        Arc::new(Mutex::new(self))
    }

    /// Dispose the live chart (if any) and mount a fresh one.
    ///
    /// Returns the configuration that was mounted. If mounting fails the
    /// surface is left empty.
    pub fn render(
        &mut self,
        variant: ChartVariant,
        totals: &CategoryTotals,
    ) -> Result<ChartConfig, SurfaceError> {
        if let Some(previous) = self.current.take() {
            debug!("Disposing previous chart before rendering {}", variant);
            self.surface.dispose(previous);
        }

        let config = ChartConfig::build(variant, totals, &self.currency_symbol);
        let handle = self.surface.mount(&config)?;
        self.current = Some(handle);
        Ok(config)
    }

    /// Whether a chart is currently mounted
    pub fn is_mounted(&self) -> bool {
        self.current.is_some()
    }

    /// Borrow the underlying surface
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutably borrow the underlying surface
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingSurface;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_render_mounts_once() {
        let mut renderer = ChartRenderer::new(RecordingSurface::default(), "₹");
        renderer
            .render(ChartVariant::Radar, &CategoryTotals::default())
            .unwrap();

        assert!(renderer.is_mounted());
        assert_eq!(renderer.surface().live, vec![1]);
        assert!(renderer.surface().disposed.is_empty());
    }

    #[test]
    fn test_each_render_disposes_exactly_one_prior_chart() {
        let mut renderer = ChartRenderer::new(RecordingSurface::default(), "₹");
        let totals = CategoryTotals::new(1.0, 2.0, 3.0, 4.0);

        let variants = [
            ChartVariant::Radar,
            ChartVariant::Pie,
            ChartVariant::Pie,
            ChartVariant::Radar,
        ];
        for (i, variant) in variants.into_iter().enumerate() {
            renderer.render(variant, &totals).unwrap();
            assert_eq!(renderer.surface().live.len(), 1);
            assert_eq!(renderer.surface().disposed.len(), i);
        }
        assert_eq!(renderer.surface().disposed, vec![1, 2, 3]);
        assert_eq!(renderer.surface().live, vec![4]);
    }

    #[test]
    fn test_rerender_is_equivalent() {
        let mut renderer = ChartRenderer::new(RecordingSurface::default(), "₹");
        let totals = CategoryTotals::new(100.0, 100.0, 0.0, 200.0);

        let first = renderer.render(ChartVariant::Pie, &totals).unwrap();
        let second = renderer.render(ChartVariant::Pie, &totals).unwrap();
        assert_eq!(first, second);
        assert_eq!(renderer.surface().mounted.len(), 2);
    }

    #[test]
    fn test_failed_mount_leaves_surface_empty() {
        let mut renderer = ChartRenderer::new(RecordingSurface::default(), "₹");
        renderer
            .render(ChartVariant::Radar, &CategoryTotals::default())
            .unwrap();

        renderer.surface_mut().fail_next = true;
        let result = renderer.render(ChartVariant::Pie, &CategoryTotals::default());

        assert!(matches!(result, Err(SurfaceError::Rejected { .. })));
        assert!(!renderer.is_mounted());
        assert!(renderer.surface().live.is_empty());
    }
}

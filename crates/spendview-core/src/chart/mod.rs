//! Chart configuration building and rendering.

pub mod config;
pub mod format;
mod renderer;

pub use config::{ChartConfig, LegendPosition, SliceLabel};
pub use renderer::{ChartRenderer, ChartSurface, SharedRenderer, SurfaceError};

#[cfg(test)]
pub(crate) use renderer::testing;

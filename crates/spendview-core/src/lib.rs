//! Core library for spendview.
//!
//! Receipt files are pushed to blob storage through a presigned POST, the
//! backend aggregates them into per-category totals, and the totals are
//! rendered as a radar or pie chart. Consumers (the CLI, tests, other
//! front-ends) drive everything through [`api::Dashboard`] and plug in their
//! own [`pipeline::UiPort`] and [`chart::ChartSurface`] adapters.

pub mod api;
pub mod backend;
pub mod chart;
pub mod config;
pub mod fetcher;
pub mod model;
pub mod pipeline;

pub use api::{CoreEvent, Dashboard, DashboardBuilder};
pub use config::Settings;
pub use model::{Category, CategoryTotals, ChartDataModel, ChartVariant, SharedModel};

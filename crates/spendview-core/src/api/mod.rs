//! Public API layer (Facade) for spendview-core.
//!
//! [`Dashboard`] owns the chart model, the renderer, the summary fetcher
//! and the upload pipeline, and exposes typed query/action methods.
//!
//! # Quick Start
//!
//! ```ignore
//! use spendview_core::api::DashboardBuilder;
//!
//! let dashboard = DashboardBuilder::new(backend, surface, ui)
//!     .with_settings(settings)
//!     .build();
//!
//! dashboard.start().await?;
//! let mut rx = dashboard.subscribe();
//! ```

mod builder;
mod core;
pub mod events;

pub use builder::DashboardBuilder;
pub use core::Dashboard;
pub use events::CoreEvent;

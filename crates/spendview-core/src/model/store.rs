use parking_lot::RwLock;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::{CategoryTotals, ChartVariant};

/// Shared model type alias
pub type SharedModel = Arc<RwLock<ChartDataModel>>;

/// Last known totals plus the selected chart variant.
///
/// Writers hold the lock only for the assignment itself, never across an
/// `.await`, so readers always observe a committed snapshot.
#[derive(Debug, Clone, Default)]
pub struct ChartDataModel {
    totals: CategoryTotals,
    variant: ChartVariant,
    fetched_at: Option<DateTime<Utc>>,
}

impl ChartDataModel {
    /// Create an empty model showing the given variant
    pub fn new(variant: ChartVariant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    /// Create a new shared model
    pub fn shared(variant: ChartVariant) -> SharedModel {
        Arc::new(RwLock::new(Self::new(variant)))
    }

    pub fn totals(&self) -> CategoryTotals {
        self.totals
    }

    /// Replace the totals wholesale and record when they were fetched
    pub fn set_totals(&mut self, totals: CategoryTotals) {
        self.totals = totals;
        self.fetched_at = Some(Utc::now());
    }

    pub fn variant(&self) -> ChartVariant {
        self.variant
    }

    pub fn set_variant(&mut self, variant: ChartVariant) {
        self.variant = variant;
    }

    /// When totals were last replaced by a successful fetch
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }
}

//! Declarative chart configuration handed to a [`ChartSurface`](super::ChartSurface).
//!
//! Formatting callbacks cannot cross the surface boundary, so tick labels,
//! tooltips and pie overlay labels are pre-rendered strings.

use serde::Serialize;

use super::format::{format_currency, format_percent, percentage};
use crate::model::{Category, CategoryTotals, ChartVariant};

/// Radial axis upper bound
pub const RADAR_MAX: f64 = 50_000.0;
/// Radial axis tick step
pub const RADAR_STEP: f64 = 10_000.0;

const RADAR_FILL: &str = "rgba(224,122,95,0.15)";
const RADAR_STROKE: &str = "#e07a5f";
const RADAR_POINT_RADIUS: u32 = 8;
const PIE_BORDER: &str = "#ffffff";
const BORDER_WIDTH: u32 = 2;
const LEGEND_LABEL_COLOR: &str = "#fff";

/// Complete configuration for one rendered chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub variant: ChartVariant,
    pub data: ChartData,
    pub options: ChartOptions,
    /// Labels drawn on top of pie slices (empty for radar)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overlay: Vec<SliceLabel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<f64>,
    pub background_color: Vec<String>,
    pub border_color: String,
    pub border_width: u32,
    pub fill: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_radius: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    /// Fixed radial scale (radar only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<RadialScale>,
    pub legend: Legend,
    /// Tooltip text per data point, in label order
    pub tooltips: Vec<String>,
    /// Whether per-point value labels are drawn by the engine itself
    pub data_labels: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadialScale {
    pub min: f64,
    pub max: f64,
    pub step_size: f64,
    /// Formatted tick labels from `min` to `max`
    pub ticks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    pub position: LegendPosition,
    pub label_color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Top,
    Bottom,
}

/// Two-line label centered on a non-empty pie slice
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceLabel {
    pub category: Category,
    pub value: f64,
    /// Share of the total, rounded to one decimal
    pub percent: f64,
    pub amount_text: String,
    pub percent_text: String,
    /// Slice center, degrees clockwise from 12 o'clock
    pub mid_angle_deg: f64,
}

impl ChartConfig {
    /// Build the configuration for `variant` over `totals`
    pub fn build(variant: ChartVariant, totals: &CategoryTotals, currency_symbol: &str) -> Self {
        match variant {
            ChartVariant::Radar => Self::radar(totals, currency_symbol),
            ChartVariant::Pie => Self::pie(totals, currency_symbol),
        }
    }

    fn radar(totals: &CategoryTotals, symbol: &str) -> Self {
        let steps = (RADAR_MAX / RADAR_STEP) as usize;
        let ticks = (0..=steps)
            .map(|i| format_currency(symbol, i as f64 * RADAR_STEP))
            .collect();
        let tooltips = totals
            .iter()
            .map(|(category, amount)| format!("{}: {}", category, format_currency(symbol, amount)))
            .collect();

        Self {
            variant: ChartVariant::Radar,
            data: ChartData {
                labels: category_labels(),
                datasets: vec![Dataset {
                    label: Some(format!("Amount ({})", symbol)),
                    data: totals.amounts().to_vec(),
                    background_color: vec![RADAR_FILL.to_string()],
                    border_color: RADAR_STROKE.to_string(),
                    border_width: BORDER_WIDTH,
                    fill: true,
                    point_radius: Some(RADAR_POINT_RADIUS),
                }],
            },
            options: ChartOptions {
                responsive: true,
                maintain_aspect_ratio: false,
                scale: Some(RadialScale {
                    min: 0.0,
                    max: RADAR_MAX,
                    step_size: RADAR_STEP,
                    ticks,
                }),
                legend: Legend {
                    position: LegendPosition::Bottom,
                    label_color: LEGEND_LABEL_COLOR.to_string(),
                },
                tooltips,
                data_labels: false,
            },
            overlay: Vec::new(),
        }
    }

    fn pie(totals: &CategoryTotals, symbol: &str) -> Self {
        let total = totals.total();
        let tooltips = totals
            .iter()
            .map(|(category, amount)| {
                format!(
                    "{}: {} ({})",
                    category,
                    format_currency(symbol, amount),
                    format_percent(percentage(amount, total))
                )
            })
            .collect();

        Self {
            variant: ChartVariant::Pie,
            data: ChartData {
                labels: category_labels(),
                datasets: vec![Dataset {
                    label: None,
                    data: totals.amounts().to_vec(),
                    background_color: Category::ALL.iter().map(|c| c.color().to_string()).collect(),
                    border_color: PIE_BORDER.to_string(),
                    border_width: BORDER_WIDTH,
                    fill: true,
                    point_radius: None,
                }],
            },
            options: ChartOptions {
                responsive: true,
                maintain_aspect_ratio: false,
                scale: None,
                legend: Legend {
                    position: LegendPosition::Bottom,
                    label_color: LEGEND_LABEL_COLOR.to_string(),
                },
                tooltips,
                data_labels: false,
            },
            overlay: slice_labels(totals, symbol),
        }
    }
}

fn category_labels() -> Vec<String> {
    Category::ALL.iter().map(|c| c.name().to_string()).collect()
}

/// Overlay labels for every slice with a positive value.
///
/// Zero slices are skipped before any division, so an all-zero pie
/// yields no labels.
fn slice_labels(totals: &CategoryTotals, symbol: &str) -> Vec<SliceLabel> {
    let total = totals.total();
    let mut preceding = 0.0;
    let mut labels = Vec::new();

    for (category, value) in totals.iter() {
        if value <= 0.0 {
            continue;
        }
        let percent = percentage(value, total);
        labels.push(SliceLabel {
            category,
            value,
            percent,
            amount_text: format_currency(symbol, value),
            percent_text: format_percent(percent),
            mid_angle_deg: 360.0 * (preceding + value / 2.0) / total,
        });
        preceding += value;
    }
    labels
}

//! ratatui-backed chart surface.
//!
//! Each mount lays the chart out into an off-screen [`Buffer`] and prints the
//! result below the previous output. Terminal output cannot be taken back, so
//! disposing only retires the handle.

use std::io::Write;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};
use spendview_core::chart::{ChartConfig, ChartSurface, SurfaceError};
use spendview_core::{Category, ChartVariant};
use tracing::debug;

/// Default drawing width in cells
pub const DEFAULT_WIDTH: u16 = 60;

/// Cells used by the radar magnitude bars
const BAR_CELLS: usize = 24;

/// Fixed label width for alignment (longest label "Clothes"/"Medical" = 7 chars)
const LABEL_WIDTH: usize = 7;

/// Draws chart configurations as text blocks on a writer
pub struct TerminalSurface<W> {
    out: W,
    width: u16,
    next_id: usize,
    live: Option<usize>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self::with_width(out, DEFAULT_WIDTH)
    }

    pub fn with_width(out: W, width: u16) -> Self {
        Self {
            out,
            width: width.max(20),
            next_id: 0,
            live: None,
        }
    }

    /// Handle of the chart currently on screen
    pub fn live(&self) -> Option<usize> {
        self.live
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChartSurface for TerminalSurface<W> {
    type Handle = usize;

    fn mount(&mut self, config: &ChartConfig) -> Result<usize, SurfaceError> {
        let lines = match config.variant {
            ChartVariant::Radar => radar_lines(config),
            ChartVariant::Pie => pie_lines(config),
        };
        let buf = draw(config.variant, lines, self.width);
        for row in buffer_rows(&buf) {
            writeln!(self.out, "{}", row)?;
        }
        self.out.flush()?;

        self.next_id += 1;
        self.live = Some(self.next_id);
        debug!("Terminal chart #{} drawn", self.next_id);
        Ok(self.next_id)
    }

    fn dispose(&mut self, handle: usize) {
        if self.live == Some(handle) {
            self.live = None;
        }
        debug!("Terminal chart #{} disposed", handle);
    }
}

/// Lay `lines` out inside a rounded block sized to fit them
fn draw(variant: ChartVariant, lines: Vec<Line<'static>>, width: u16) -> Buffer {
    let height = lines.len() as u16 + 2;
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);

    let block = Block::default()
        .title(format!(" Expenses ({}) ", variant.display_name()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Gray));
    Paragraph::new(lines).block(block).render(area, &mut buf);
    buf
}

/// One magnitude bar per category, scaled to the radial axis maximum
fn radar_lines(config: &ChartConfig) -> Vec<Line<'static>> {
    let max = config.options.scale.as_ref().map(|s| s.max).unwrap_or(0.0);
    let Some(dataset) = config.data.datasets.first() else {
        return Vec::new();
    };

    config
        .data
        .labels
        .iter()
        .zip(&dataset.data)
        .enumerate()
        .map(|(i, (label, value))| {
            let filled = if max > 0.0 {
                ((value / max).clamp(0.0, 1.0) * BAR_CELLS as f64).round() as usize
            } else {
                0
            };
            let text = config
                .options
                .tooltips
                .get(i)
                .and_then(|t| t.split_once(": "))
                .map(|(_, amount)| amount.to_string())
                .unwrap_or_default();
            Line::from(vec![
                Span::raw(format!(" {:<width$} ", label, width = LABEL_WIDTH)),
                Span::styled("█".repeat(filled), Style::default().fg(Color::Cyan)),
                Span::styled(
                    "░".repeat(BAR_CELLS - filled),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(format!(" {}", text)),
            ])
        })
        .collect()
}

/// Slice rows with amount and share, then the legend
fn pie_lines(config: &ChartConfig) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = config
        .overlay
        .iter()
        .map(|slice| {
            Line::from(vec![
                Span::styled(" ■ ", Style::default().fg(hex_color(slice.category.color()))),
                Span::raw(format!(
                    "{:<width$} {:>14} {:>7}",
                    slice.category.name(),
                    slice.amount_text,
                    slice.percent_text,
                    width = LABEL_WIDTH
                )),
            ])
        })
        .collect();

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            " No spending recorded yet",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let mut legend = vec![Span::raw(" ")];
    for category in Category::ALL {
        legend.push(Span::styled("■ ", Style::default().fg(hex_color(category.color()))));
        legend.push(Span::styled(
            format!("{}  ", category.name()),
            Style::default().add_modifier(Modifier::DIM),
        ));
    }
    lines.push(Line::default());
    lines.push(Line::from(legend));
    lines
}

/// Parse `#rrggbb` (an alpha suffix is ignored)
fn hex_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    let channel = |i: usize| {
        digits
            .get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
    };
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::Gray,
    }
}

/// Plain-text rows of a buffer, trailing blanks trimmed
fn buffer_rows(buf: &Buffer) -> Vec<String> {
    let area = buf.area;
    (area.top()..area.bottom())
        .map(|y| {
            let row: String = (area.left()..area.right())
                .map(|x| buf[(x, y)].symbol())
                .collect();
            row.trim_end().to_string()
        })
        .collect()
}

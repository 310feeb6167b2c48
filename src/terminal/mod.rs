//! Terminal adapters for the dashboard's UI and chart ports.

mod console_ui;
mod json;
mod surface;

use std::io::Write;

use spendview_core::chart::{ChartConfig, ChartSurface, SurfaceError};

pub use console_ui::ConsoleUi;
pub use json::JsonSurface;
pub use surface::{TerminalSurface, DEFAULT_WIDTH};

/// Terminal drawing plus an optional JSON mirror of every chart
pub struct CliSurface<W> {
    terminal: TerminalSurface<W>,
    json: Option<JsonSurface>,
}

impl<W: Write> CliSurface<W> {
    pub fn new(terminal: TerminalSurface<W>, json: Option<JsonSurface>) -> Self {
        Self { terminal, json }
    }

    pub fn terminal(&self) -> &TerminalSurface<W> {
        &self.terminal
    }
}

impl<W: Write> ChartSurface for CliSurface<W> {
    type Handle = (usize, Option<usize>);

    fn mount(&mut self, config: &ChartConfig) -> Result<Self::Handle, SurfaceError> {
        let drawn = self.terminal.mount(config)?;
        let json = match self.json.as_mut().map(|json| json.mount(config)).transpose() {
            Ok(json) => json,
            Err(e) => {
                self.terminal.dispose(drawn);
                return Err(e);
            }
        };
        Ok((drawn, json))
    }

    fn dispose(&mut self, (drawn, json): Self::Handle) {
        self.terminal.dispose(drawn);
        if let (Some(surface), Some(handle)) = (self.json.as_mut(), json) {
            surface.dispose(handle);
        }
    }
}

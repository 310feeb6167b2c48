use std::io;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use spendview::commands;
use spendview::config::Config;
use spendview::terminal::{CliSurface, ConsoleUi, JsonSurface, TerminalSurface};
use spendview_core::backend::HttpBackend;
use spendview_core::{ChartDataModel, DashboardBuilder, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Config::parse_args();

    // Setup logging
    setup_logging(cli.debug);

    // Load settings
    let mut settings = Settings::load(cli.config.as_ref())?;
    settings.apply_env()?;
    settings.merge_cli(&cli.overrides());
    settings.validate()?;

    let backend = HttpBackend::new(&settings).context("Failed to build HTTP client")?;
    let surface = CliSurface::new(
        TerminalSurface::new(io::stdout()),
        cli.json_out.clone().map(JsonSurface::new),
    );
    let model = ChartDataModel::shared(cli.variant().unwrap_or(settings.chart.default_variant));
    let dashboard = DashboardBuilder::new(backend, surface, ConsoleUi::new(io::stderr()))
        .with_settings(settings)
        .with_model(model)
        .build();

    commands::run(&dashboard, cli.command()).await
}

fn setup_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("spendview=debug,spendview_core=debug")
    } else {
        EnvFilter::new("spendview=info,spendview_core=info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}

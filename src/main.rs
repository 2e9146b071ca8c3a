use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use eframe::egui;

use zline::app::ZLineApp;
use zline::data::sample::Dataset;
use zline::state::app_state::AppState;
use zline::state::chart_config::ChartConfig;

/// Line chart of the sample traffic series with z-score threshold highlighting.
#[derive(Debug, Parser)]
#[command(name = "zline", version, about)]
struct Args {
    /// JSON chart configuration. Missing keys use defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Deviation threshold in standard deviations; overrides the config.
    #[arg(long, allow_negative_numbers = true)]
    threshold: Option<f64>,

    /// Print the computed series as JSON and exit without opening a window.
    #[arg(long)]
    print: bool,
}

fn load_config(args: &Args) -> anyhow::Result<ChartConfig> {
    let config = match &args.config {
        Some(path) => ChartConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ChartConfig::default(),
    };
    match args.threshold {
        Some(t) => Ok(config.with_threshold(t)?),
        None => Ok(config),
    }
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `--print` output stays parseable.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = Args::parse();
    let config = load_config(&args)?;
    tracing::info!(
        "Starting with threshold {} for {} series",
        config.threshold,
        config.series.len()
    );

    let state = AppState::new(Dataset::sample(), config);

    if args.print {
        let json = serde_json::to_string_pretty(state.views())?;
        println!("{json}");
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("zline")
            .with_inner_size([900.0, 560.0])
            .with_min_inner_size([500.0, 300.0]),
        ..Default::default()
    };

    eframe::run_native(
        "zline",
        options,
        Box::new(|cc| Ok(Box::new(ZLineApp::new(cc, state)))),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))
}

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod columns;
mod controller;
mod domain;
mod file_source;
mod grid;
mod sort;
mod source;
mod ui;

use app::App;
use controller::Controller;
use domain::{GridConfig, GridError};
use file_source::FileSource;

/// A tui based data grid over windowed record sources.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Tabular data file to display (csv, parquet, arrow)
    file: String,

    /// Records per page
    #[arg(long, default_value_t = 25)]
    page_size: usize,

    /// Column names to hide from the grid
    #[arg(long, value_name = "COLUMN")]
    hide: Vec<String>,

    /// Widest rendered column
    #[arg(long, default_value_t = 40)]
    max_column_width: usize,

    /// Write logs to this file (RUST_LOG controls the filter)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Err(e) => {
            ratatui::restore();
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
        Ok(_) => {
            ratatui::restore();
            ExitCode::SUCCESS
        }
    }
}

fn run(args: Args) -> Result<(), GridError> {
    init_logging(args.log_file.as_deref())?;

    let file = shellexpand::full(&args.file)
        .map_err(|e| GridError::LoadingFailed(e.to_string()))?
        .into_owned();

    let config = GridConfig::default()
        .page_size(args.page_size)
        .max_column_width(args.max_column_width);

    let source = FileSource::load(PathBuf::from(file), config.page_size, &args.hide)?;
    let controller = Controller::new(&config);
    let mut app = App::new(source);

    let mut terminal = ratatui::init();

    // The loading placeholder goes up before the first snapshot is shown.
    terminal.draw(|f| ui::draw(f, app.view(), app.cursor(), &config))?;
    app.refresh_view();

    while app.running() {
        terminal.draw(|f| ui::draw(f, app.view(), app.cursor(), &config))?;
        if let Some(message) = controller.handle_event()? {
            app.update(message);
        }
    }

    app.shutdown();
    Ok(())
}

fn init_logging(path: Option<&Path>) -> Result<(), GridError> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = std::fs::File::create(path)?;
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(file))
                .with_ansi(false),
        )
        .with(ErrorLayer::default())
        .init();
    Ok(())
}

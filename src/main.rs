mod config;
mod controller;
mod document_model;
mod view;

use clap::Parser;
use config::RcLoader;
use controller::EditorController;
use document_model::Document;
use std::path::PathBuf;

/// A WordStar-style terminal text editor
#[derive(Parser, Debug)]
#[command(name = "ws-rus", version)]
struct Args {
    /// File to open; created on first save if it does not exist
    file: Option<PathBuf>,
}

/// Log to the file named by WSRUS_LOG. The terminal belongs to the editor,
/// so without it nothing is logged at all.
fn setup_tracing() {
    use std::fs::OpenOptions;
    use std::sync::Mutex;
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let Some(log_path) = std::env::var_os("WSRUS_LOG").map(PathBuf::from) else {
        return;
    };
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) else {
        return;
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ws_rus=debug"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    tracing::info!(path = ?log_path, "tracing initialized");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_tracing();

    // Load RC configuration
    let config = RcLoader::load_config();

    let mut controller = match args.file {
        Some(path) => EditorController::open(path),
        None => EditorController::new(Document::new()),
    };

    // Apply RC configuration to the controller
    controller.apply_config(&config);

    controller.run()
}

//! Driver Monitor - Main Entry Point

use api::{init_logging, Settings};
use std::path::PathBuf;
use tracing::info;

/// `--config <path>` on the command line, else `DMS_CONFIG`
fn config_path() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    std::env::var_os("DMS_CONFIG").map(PathBuf::from)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load(config_path().as_deref())?;
    init_logging(&settings.logging);

    info!("=== Driver Monitor v{} ===", env!("CARGO_PKG_VERSION"));

    let summary = api::run(settings).await?;
    info!(
        "Shutdown complete ({} frames, {} alerts)",
        summary.frames_processed, summary.alerts_raised
    );

    Ok(())
}

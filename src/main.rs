use std::path::PathBuf;

use anyhow::Context;
use ks250::{AdapterConfig, JsonLinesSink, ScaleAdapter, ScaleScanner};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => AdapterConfig::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AdapterConfig::default(),
    };

    ks250::logging::init_logger(&config.log_level)?;
    info!("Listening for {} scales", config.local_name);

    let sink = JsonLinesSink::new(std::io::stdout());
    let mut scale_adapter = ScaleAdapter::new(&config, sink);

    let scanner = ScaleScanner::new().await?;
    scanner.run(&mut scale_adapter).await?;

    Ok(())
}

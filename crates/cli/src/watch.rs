use super::RegistryArgs;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub fn run(args: &RegistryArgs, debounce_ms: u64) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let cartographer = Arc::new(super::build(args, Some(Duration::from_millis(debounce_ms)))?);

    info!("Initializing: parsing manifests from {}...", args.config.display());
    // A failing manifest at startup is reported, the watcher picks up the fix
    for report in cartographer.rediscover() {
        if let Err(e) = report.result {
            warn!("Bundle {} not loaded yet: {}", report.bundle, e);
        }
    }
    let stats = cartographer.registry().stats();
    info!(
        "Registry ready: {} bundles, {} assets",
        stats.total_bundles, stats.total_assets
    );

    let handle = rt.block_on(Arc::clone(&cartographer).start_watch())?;
    info!("Watching {} manifests. Press Ctrl+C to stop.", handle.paths().len());

    rt.block_on(tokio::signal::ctrl_c())?;
    handle.stop();
    rt.block_on(handle.join());
    info!("Watcher stopped.");

    Ok(())
}

use super::RegistryArgs;
use serde_json::json;

pub fn run(args: &RegistryArgs, as_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let cartographer = super::build(args, None)?;
    cartographer.autodiscover()?;
    let registry = cartographer.registry();

    if as_json {
        let bundles: Vec<_> = registry
            .bundles()
            .iter()
            .map(|b| {
                json!({
                    "name": b.name(),
                    "origin": b.origin(),
                    "source": b.source(),
                    "assets": b.assets().collect::<Vec<_>>(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&bundles)?);
        return Ok(());
    }

    for bundle in registry.bundles() {
        println!(
            "{} [{}] {}",
            bundle.name(),
            bundle.origin(),
            bundle.source().display()
        );
        for asset in bundle.assets() {
            println!("  {} -> {}", asset.name, asset.url);
        }
    }

    let stats = registry.stats();
    println!(
        "{} bundles, {} assets",
        stats.total_bundles, stats.total_assets
    );
    Ok(())
}

use super::RegistryArgs;
use cartographer_core::split_kinds;

pub fn run(
    args: &RegistryArgs,
    bundle: &str,
    kind: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let cartographer = super::build(args, None)?;
    cartographer.autodiscover()?;

    let kinds = kind.map(split_kinds);
    let tags = cartographer.render_bundle(bundle, kinds.as_deref())?;
    if !tags.is_empty() {
        println!("{tags}");
    }
    Ok(())
}

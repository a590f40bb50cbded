use std::path::Path;

pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(path)?;
    let problems = config.check();

    if problems.is_empty() {
        let groups = config.sources()?;
        println!("{}: OK ({} bundle groups)", path.display(), groups.len());
        return Ok(());
    }

    for problem in &problems {
        println!("{}: {}", path.display(), problem);
    }
    Err(format!("{} problems found", problems.len()).into())
}

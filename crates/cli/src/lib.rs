mod check;
mod list;
mod render;
mod watch;

use cartographer_core::{Cartographer, CartographerConfig, MiniJinjaRenderer, PrefixUrlResolver};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "cartographer",
    version,
    about = "Live registry of bundler-emitted assets",
    long_about = "Cartographer reads the stats manifests written by asset bundlers such as webpack, \
                  keeps an in-memory registry of the bundles they describe and renders the HTML tags \
                  that include them. In watch mode the registry follows every rebuild."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by the commands that build a registry
#[derive(clap::Args, Debug, Clone)]
pub struct RegistryArgs {
    /// JSON settings file (origin -> bundle name -> overrides)
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Public prefix prepended to static paths
    #[arg(long, value_name = "URL", default_value = PrefixUrlResolver::DEFAULT_PREFIX)]
    pub static_url: String,

    /// Directory searched for tag templates before the built-in ones
    #[arg(long, value_name = "DIR")]
    pub templates: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a settings file without reading any manifest
    Check {
        #[arg(value_name = "CONFIG")]
        config: PathBuf,
    },
    /// Parse every manifest once and list the registered bundles
    List {
        #[command(flatten)]
        args: RegistryArgs,

        /// Print the registry as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render the tags of one bundle
    #[command(
        long_about = "Parses every configured manifest once and prints the tags of BUNDLE, \
                      one per line. --kind restricts the output to assets whose names end with \
                      one of the comma-separated suffixes."
    )]
    Render {
        #[command(flatten)]
        args: RegistryArgs,

        #[arg(value_name = "BUNDLE")]
        bundle: String,

        /// Comma-separated name suffixes, e.g. "js,css"
        #[arg(long, value_name = "KINDS")]
        kind: Option<String>,
    },
    /// Keep the registry in sync with manifest rewrites until interrupted
    Watch {
        #[command(flatten)]
        args: RegistryArgs,

        /// Quiet period after the last change before re-parsing, in milliseconds
        #[arg(long, value_name = "MS", default_value_t = 500)]
        debounce: u64,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Long-running commands log to the terminal as well as to file
    let (component, to_stderr) = match &cli.command {
        Commands::Watch { .. } => ("watch", true),
        _ => ("cli", false),
    };
    let _guard = cartographer_core::logging::init_logging(component, to_stderr);

    match cli.command {
        Commands::Check { config } => check::run(&config),
        Commands::List { args, json } => list::run(&args, json),
        Commands::Render { args, bundle, kind } => render::run(&args, &bundle, kind.as_deref()),
        Commands::Watch { args, debounce } => watch::run(&args, debounce),
    }
}

fn load_config(path: &Path) -> Result<CartographerConfig, Box<dyn std::error::Error>> {
    Ok(CartographerConfig::load(path)?)
}

/// Build a cartographer from the shared options, without parsing anything yet.
fn build(
    args: &RegistryArgs,
    debounce: Option<std::time::Duration>,
) -> Result<Cartographer, Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;
    let renderer = match &args.templates {
        Some(dir) => MiniJinjaRenderer::with_template_dir(dir),
        None => MiniJinjaRenderer::new(),
    };

    let mut builder = Cartographer::builder(config)
        .with_renderer(Arc::new(renderer))
        .with_url_resolver(Arc::new(PrefixUrlResolver::new(args.static_url.as_str())));
    if let Some(debounce) = debounce {
        builder = builder.with_debounce(debounce);
    }
    Ok(builder.build()?)
}

//! Platter - food model gallery with drag-to-rotate 3D detail view

mod app;
mod gallery;
mod ui;

use anyhow::{bail, Context, Result};
use bevy::app::AppExit;
use clap::Parser;
use platter_core::{Catalog, Settings};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "platter")]
#[command(about = "Browse food models and rotate them in 3D")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "platter.toml")]
    config: PathBuf,

    /// Asset root directory (overrides the config file)
    #[arg(short, long)]
    assets: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Print the resolved catalog as JSON and exit
    #[arg(long)]
    list: bool,

    /// Write a default configuration file to --config and exit
    #[arg(long)]
    write_default_config: bool,
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; RUST_LOG takes precedence over --log-level
    let builder = FmtSubscriber::builder().with_target(true);
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        let subscriber = builder.with_env_filter(EnvFilter::from_default_env()).finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = builder.with_max_level(parse_level(&args.log_level)).finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    info!("Platter v{}", env!("CARGO_PKG_VERSION"));

    if args.write_default_config {
        if args.config.exists() {
            bail!("Refusing to overwrite existing {}", args.config.display());
        }
        Settings::save_default(&args.config)
            .with_context(|| format!("writing {}", args.config.display()))?;
        println!("Wrote default configuration to {}", args.config.display());
        return Ok(());
    }

    // Load configuration
    let mut settings = Settings::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;

    // Override asset root if specified
    if let Some(assets) = args.assets {
        settings.assets.root = assets;
    }
    // The asset server resolves relative roots against the executable, so
    // pin the root to the working directory the catalog is resolved against
    settings.assets.root = std::path::absolute(&settings.assets.root)
        .with_context(|| format!("resolving {}", settings.assets.root.display()))?;

    let catalog = Catalog::load(&settings.assets.layout());
    info!(
        root = %settings.assets.root.display(),
        entries = catalog.len(),
        with_models = catalog.assets().count(),
        "Catalog loaded"
    );

    if args.list {
        println!("{}", catalog.to_json()?);
        return Ok(());
    }

    match app::run(settings, catalog) {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => bail!("viewer exited with code {}", code),
    }
}

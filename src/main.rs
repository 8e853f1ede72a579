mod analytics;
mod config;
mod db;
mod error;
mod icons;
mod logging;
mod models;
mod run;
mod ui;
mod validate;

use anyhow::{Context, Result};

use config::{Config, Paths};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let paths = Paths::resolve()?;
    let config = load_config(&paths);

    if let Err(e) = logging::init(&paths.log_file(), &config.log_level) {
        eprintln!("Warning: logging disabled: {e:#}");
    }
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting");

    let db_path = paths.database();
    let mut db = db::Database::open(&db_path)
        .with_context(|| format!("Failed to open database: {}", db_path.display()))?;

    match args.len() {
        1 => run::as_tui(&mut db, &config),
        2.. => run::as_cli(&args, &mut db, &config, &paths),
        _ => {
            eprintln!("Usage: expensetui [command]");
            Ok(())
        }
    }
}

/// Load the config, writing the defaults on first run. A broken file is
/// reported and the defaults are used for this session.
fn load_config(paths: &Paths) -> Config {
    if !paths.config_file.exists() {
        let config = Config::default();
        if let Err(e) = config.save(&paths.config_file) {
            eprintln!("Warning: {e:#}");
        }
        return config;
    }
    Config::load(&paths.config_file).unwrap_or_else(|e| {
        eprintln!("Warning: {e:#}; using defaults");
        Config::default()
    })
}

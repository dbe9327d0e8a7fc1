//! Init command implementation

use std::path::PathBuf;

use colored::Colorize;

use crate::cli::args::GlobalOptions;
use crate::config::Config;
use crate::error::Result;
use crate::store::SqliteStore;

/// Settings supplied to `formflow init`
#[derive(Debug, Default)]
pub struct InitSettings {
    pub bpm_url: String,
    pub database: Option<PathBuf>,
    pub cache_capacity: Option<usize>,
    pub timeout: Option<u64>,
}

/// Write the configuration file and create the database.
///
/// An existing config file is updated in place; options not given keep their
/// current values.
pub fn run(settings: InitSettings, opts: &GlobalOptions) -> Result<()> {
    let config_path = opts.config_path()?;

    let mut config = if config_path.exists() {
        Config::load_at(&config_path)?
    } else {
        Config::default()
    };

    config.apply_overrides(Some(settings.bpm_url), settings.database);
    if let Some(capacity) = settings.cache_capacity {
        config.auth_cache_capacity = capacity;
    }
    if let Some(timeout) = settings.timeout {
        config.request_timeout_secs = timeout;
    }
    config.validate()?;

    let database_path = config.database_path()?;
    SqliteStore::open(&database_path)?;
    config.save_at(&config_path)?;

    println!("{}", "✓ Configuration saved".green());
    println!("  Config:   {}", config_path.display().to_string().cyan());
    println!("  Database: {}", database_path.display().to_string().cyan());
    println!();
    println!("Next steps:");
    println!(
        "  {} to register a form",
        "formflow mapper add --form-id <ID> --form-name <NAME> --process-key <KEY>".cyan()
    );
    println!("  {} to check the setup", "formflow status".cyan());

    Ok(())
}

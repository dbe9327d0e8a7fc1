//! Status command implementation

use colored::Colorize;

use crate::cli::args::GlobalOptions;
use crate::config::Config;
use crate::error::Result;
use crate::store::{ApplicationRepository, ApplicationScope, SqliteStore};

/// Run the status command to display configuration and store status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "formflow Configuration Status".bold());

    let config_path = opts.config_path()?;

    let mut config = match Config::load_at(&config_path) {
        Ok(config) => config,
        Err(_) => {
            println!("{} Configuration not found", "✗".red());
            println!();
            println!(
                "Run {} to create a configuration file.",
                "formflow init --bpm-url <URL>".cyan()
            );
            println!();
            return Ok(());
        }
    };
    config.apply_env();

    println!("Config file: {}", config_path.display().to_string().cyan());
    println!();

    match config.bpm_url() {
        Ok(url) => println!("{} Workflow engine: {}", "✓".green(), url),
        Err(e) => {
            println!("{} Workflow engine not usable: {}", "✗".red(), e);
            println!("  → Run 'formflow init --bpm-url <URL>' to configure");
        }
    }

    println!(
        "{} Authorization cache: {} credentials",
        "○".dimmed(),
        config.auth_cache_capacity
    );
    println!(
        "{} Request timeout: {}s",
        "○".dimmed(),
        config.request_timeout_secs
    );

    let database_path = config.database_path()?;
    if !database_path.exists() {
        println!(
            "{} Database not created yet: {}",
            "○".dimmed(),
            database_path.display()
        );
    } else {
        match SqliteStore::open(&database_path)
            .and_then(|store| store.count_applications(&ApplicationScope::All))
        {
            Ok(count) => println!(
                "{} Database: {} ({} applications)",
                "✓".green(),
                database_path.display(),
                count
            ),
            Err(e) => println!(
                "{} Database {} unreadable: {}",
                "✗".red(),
                database_path.display(),
                e
            ),
        }
    }

    println!();
    Ok(())
}

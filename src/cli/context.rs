//! Command execution context
//!
//! Provides a unified context for command execution, eliminating boilerplate
//! for config loading, store opening and client initialization.

use std::sync::Arc;

use crate::cache::AuthorizationCache;
use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::client::BpmClient;
use crate::config::Config;
use crate::error::Result;
use crate::service::ApplicationService;
use crate::store::SqliteStore;

/// Context for command execution containing config, service, and runtime options.
pub struct CommandContext {
    /// Loaded and validated configuration
    pub config: Config,
    /// Service wired to the configured store and workflow engine
    pub service: ApplicationService,
    /// Authorization cache shared with the service
    pub auth_cache: Arc<AuthorizationCache<BpmClient>>,
    /// Output format preference
    pub format: OutputFormat,
}

impl CommandContext {
    /// Create a new command context with full initialization.
    ///
    /// This handles:
    /// - Loading config from path (or default location) and env overrides
    /// - Opening the SQLite store
    /// - Creating the engine client and wrapping it in the authorization cache
    ///
    /// # Errors
    /// Returns error if config cannot be loaded or is invalid, or the store
    /// cannot be opened.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config_path = opts.config_path()?;
        let mut config = Config::load_at(&config_path)?;
        config.apply_env();
        config.validate()?;

        let database_path = config.database_path()?;
        log::debug!("Opening store at {}", database_path.display());
        let store = Arc::new(SqliteStore::open(&database_path)?);

        let client = Arc::new(BpmClient::new(config.bpm_url()?, config.request_timeout())?);
        let auth_cache = Arc::new(AuthorizationCache::from_arc(
            Arc::clone(&client),
            config.auth_cache_capacity,
        ));

        let service = ApplicationService::new(store, client, auth_cache.clone());

        Ok(Self {
            config,
            service,
            auth_cache,
            format: opts.format,
        })
    }

    /// Page size used when a command gives a page but no limit.
    pub fn page_size(&self) -> u64 {
        self.config.preferences.page_size
    }
}

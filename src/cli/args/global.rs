//! Global CLI options shared across all commands
//!
//! This module provides a centralized struct for global CLI options, so
//! handlers take one parameter instead of every flag.

use std::path::PathBuf;

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::{ConfigError, Result};

/// Global CLI options passed to all command handlers.
///
/// # Precedence
///
/// CLI flag > environment variable > config file > default. This struct
/// captures the CLI/env layer; config file values are resolved later in
/// `CommandContext`.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Output format (table, json)
    pub format: OutputFormat,

    /// Custom config file path (defaults to ~/.formflow/config.yaml)
    pub config: Option<String>,

    /// Credential passed to the workflow engine and authorization provider
    pub token: Option<String>,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            token: cli.token.clone(),
        }
    }

    /// Get config path as `Option<&str>`.
    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    /// Config file path, falling back to the default location.
    pub fn config_path(&self) -> Result<PathBuf> {
        match self.config_ref() {
            Some(path) => Ok(PathBuf::from(path)),
            None => Config::default_path(),
        }
    }

    /// Credential, if one was given.
    pub fn token_ref(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    /// Credential, required by the command.
    pub fn require_token(&self) -> Result<&str> {
        self.token_ref().ok_or_else(|| ConfigError::MissingToken.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_options_accessors() {
        let opts = GlobalOptions {
            format: OutputFormat::Json,
            config: Some("/custom/path".to_string()),
            token: Some("secret".to_string()),
        };

        assert_eq!(opts.config_ref(), Some("/custom/path"));
        assert_eq!(opts.config_path().unwrap(), PathBuf::from("/custom/path"));
        assert_eq!(opts.require_token().unwrap(), "secret");
    }

    #[test]
    fn test_empty_token_is_missing() {
        let opts = GlobalOptions {
            format: OutputFormat::Table,
            config: None,
            token: Some(String::new()),
        };

        assert_eq!(opts.token_ref(), None);
        assert!(opts.require_token().is_err());
    }
}

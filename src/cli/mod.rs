//! CLI command definitions and handlers

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub mod app;
pub mod args;
pub mod cache;
pub mod context;
pub mod init;
pub mod mapper;
pub mod metrics;
pub mod status;

pub use args::{ApplicationFilterArgs, DateRangeArgs, OutputFormat, PaginationArgs, SortDir};
pub use context::CommandContext;

/// formflow - application tracking over a BPM workflow engine
#[derive(Parser, Debug)]
#[command(name = "formflow")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json)
    #[arg(
        long,
        global = true,
        env = "FORMFLOW_FORMAT",
        default_value = "table",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "FORMFLOW_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Credential for the workflow engine and authorization provider
    #[arg(
        long,
        global = true,
        env = "FORMFLOW_TOKEN",
        hide_env = true,
        hide_env_values = true
    )]
    pub token: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "FORMFLOW_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize formflow configuration
    Init {
        /// Workflow engine base URL
        #[arg(long)]
        bpm_url: String,

        /// SQLite database file
        #[arg(long)]
        database: Option<PathBuf>,

        /// Credentials retained by the authorization cache
        #[arg(long)]
        cache_capacity: Option<usize>,

        /// Workflow engine request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Show configuration and store status
    Status,

    /// Display version information
    Version,

    /// Manage form process mappers
    #[command(subcommand)]
    Mapper(MapperCommands),

    /// Create and query applications
    #[command(subcommand)]
    App(AppCommands),

    /// Dashboard counts over a date range
    #[command(subcommand)]
    Metrics(MetricsCommands),

    /// Inspect the authorization cache
    #[command(subcommand)]
    Cache(CacheCommands),
}

/// Form process mapper subcommands
#[derive(Subcommand, Debug)]
pub enum MapperCommands {
    /// Register a form with a workflow definition
    Add {
        /// Form identifier
        #[arg(long)]
        form_id: String,

        /// Form name (becomes the application name)
        #[arg(long)]
        form_name: String,

        /// Process definition key started for new applications
        #[arg(long)]
        process_key: Option<String>,

        /// Process definition display name
        #[arg(long)]
        process_name: Option<String>,

        /// Registering user
        #[arg(long)]
        created_by: Option<String>,
    },

    /// Show the active mapper for a form
    Get {
        /// Form identifier
        form_id: String,
    },
}

/// Attribute output options for application commands
#[derive(Args, Debug, Default, Clone)]
pub struct AttributeArgs {
    /// Add formId and submissionId (parsed from the form URL) to JSON output
    #[arg(long)]
    pub submission_ids: bool,
}

/// Application subcommands
#[derive(Subcommand, Debug)]
pub enum AppCommands {
    /// Create an application and start its workflow
    Create {
        /// Form the application is submitted against
        #[arg(long)]
        form_id: String,

        /// Form submission URL
        #[arg(long)]
        form_url: Option<String>,

        /// Attach an existing process instance instead of starting one
        #[arg(long)]
        process_instance_id: Option<String>,

        /// Submitting user
        #[arg(long)]
        created_by: Option<String>,
    },

    /// Show one application
    Get {
        /// Application ID
        id: i64,

        /// Only if created by this user
        #[arg(long, conflicts_with = "authorized")]
        user: Option<String>,

        /// Only if the credential is authorized for its form
        #[arg(long)]
        authorized: bool,

        #[command(flatten)]
        attributes: AttributeArgs,
    },

    /// List applications the credential is authorized for
    List {
        /// List every application, ignoring authorization
        #[arg(long)]
        all: bool,

        #[command(flatten)]
        filters: ApplicationFilterArgs,

        #[command(flatten)]
        pagination: PaginationArgs,

        #[command(flatten)]
        attributes: AttributeArgs,
    },

    /// List applications created by one user
    Mine {
        /// User whose applications to list
        #[arg(long)]
        user: String,

        #[command(flatten)]
        filters: ApplicationFilterArgs,

        #[command(flatten)]
        pagination: PaginationArgs,
    },

    /// List applications created by members of a group
    Group {
        /// Group member (repeat or comma-separate)
        #[arg(long = "member", short = 'm', value_delimiter = ',', required = true)]
        members: Vec<String>,

        #[command(flatten)]
        filters: ApplicationFilterArgs,

        #[command(flatten)]
        pagination: PaginationArgs,
    },

    /// List applications submitted against one form
    Form {
        /// Form identifier
        form_id: String,

        /// Only applications created by this user
        #[arg(long)]
        user: Option<String>,

        #[command(flatten)]
        filters: ApplicationFilterArgs,

        #[command(flatten)]
        pagination: PaginationArgs,
    },

    /// Show applications by ID
    Ids {
        /// Application IDs
        #[arg(required = true, value_delimiter = ',')]
        ids: Vec<i64>,
    },

    /// List application statuses in use
    Statuses,

    /// Update an application
    Update {
        /// Application ID
        id: i64,

        /// New status
        #[arg(long)]
        status: Option<String>,

        /// Process instance to attach
        #[arg(long)]
        process_instance_id: Option<String>,

        /// New form URL
        #[arg(long)]
        form_url: Option<String>,

        /// Modifying user
        #[arg(long)]
        modified_by: Option<String>,
    },

    /// Show the mapper an application was created under
    Mapper {
        /// Application ID
        id: i64,
    },

    /// Count applications
    ///
    /// Without --user or --form-id, counts applications the credential is
    /// authorized for.
    Count {
        /// Count applications created by this user
        #[arg(long)]
        user: Option<String>,

        /// Count applications submitted against this form
        #[arg(long)]
        form_id: Option<String>,
    },
}

/// Metrics subcommands
#[derive(Subcommand, Debug)]
pub enum MetricsCommands {
    /// Application counts per form mapper
    Applications {
        /// Bucket by last modification instead of creation
        #[arg(long)]
        current: bool,

        #[command(flatten)]
        range: DateRangeArgs,
    },

    /// Application counts per status for one mapper
    Status {
        /// Form process mapper ID
        mapper_id: i64,

        /// Bucket by last modification instead of creation
        #[arg(long)]
        current: bool,

        #[command(flatten)]
        range: DateRangeArgs,
    },
}

/// Authorization cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Resolve the credential's authorized forms and show cache statistics
    Stats,
}

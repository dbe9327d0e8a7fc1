//! formflow CLI

use clap::Parser;

use formflow::cli::args::GlobalOptions;
use formflow::cli::init::InitSettings;
use formflow::cli::{self, Cli, Commands};
use formflow::error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_module("formflow", log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Init {
            bpm_url,
            database,
            cache_capacity,
            timeout,
        } => cli::init::run(
            InitSettings {
                bpm_url,
                database,
                cache_capacity,
                timeout,
            },
            &opts,
        ),
        Commands::Status => cli::status::run(&opts),
        Commands::Version => {
            println!("formflow version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Mapper(command) => cli::mapper::run(command, &opts),
        Commands::App(command) => cli::app::run(command, &opts).await,
        Commands::Metrics(command) => cli::metrics::run(command, &opts),
        Commands::Cache(command) => cli::cache::run(command, &opts).await,
    }
}

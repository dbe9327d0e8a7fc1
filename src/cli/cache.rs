//! Authorization cache commands

use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use crate::cache::AuthCacheStats;
use crate::cli::args::GlobalOptions;
use crate::cli::{CacheCommands, CommandContext, OutputFormat};
use crate::client::AuthorizedForm;
use crate::error::Result;
use crate::models::common::or_dash;
use crate::output::{json, table};

#[derive(Tabled)]
struct AuthorizedFormRow {
    #[tabled(rename = "FORM NAME")]
    form_name: String,
    #[tabled(rename = "FORM ID")]
    form_id: String,
    #[tabled(rename = "RESOURCE")]
    resource_id: String,
}

impl From<&AuthorizedForm> for AuthorizedFormRow {
    fn from(form: &AuthorizedForm) -> Self {
        Self {
            form_name: form.form_name.clone(),
            form_id: or_dash(form.form_id.as_deref()),
            resource_id: or_dash(form.resource_id.as_deref()),
        }
    }
}

#[derive(Serialize)]
struct CacheReport<'a> {
    forms: &'a [AuthorizedForm],
    stats: AuthCacheStats,
}

pub async fn run(command: CacheCommands, opts: &GlobalOptions) -> Result<()> {
    match command {
        CacheCommands::Stats => stats(opts).await,
    }
}

/// Resolve the credential's forms through the cache and report its counters.
async fn stats(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let credential = opts.require_token()?;

    let forms = ctx.service.authorized_forms(credential).await?;
    let stats = ctx.auth_cache.stats();

    match ctx.format {
        OutputFormat::Table => {
            let rows: Vec<AuthorizedFormRow> = forms.iter().map(AuthorizedFormRow::from).collect();
            println!("{}", table::format_table(&rows));
            println!();
            println!("{}", "Authorization Cache".bold());
            println!("  Entries:  {}/{}", stats.entries, stats.capacity);
            println!("  Hits:     {}", stats.hits.to_string().green());
            println!("  Misses:   {}", stats.misses.to_string().yellow());
        }
        OutputFormat::Json => {
            let report = CacheReport {
                forms: &forms,
                stats,
            };
            println!("{}", json::format_json(&report)?);
        }
    }
    Ok(())
}

//! Form process mapper commands

use colored::Colorize;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, MapperCommands, OutputFormat};
use crate::error::Result;
use crate::models::MapperRow;
use crate::output;
use crate::store::NewFormProcessMapper;

pub fn run(command: MapperCommands, opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    match command {
        MapperCommands::Add {
            form_id,
            form_name,
            process_key,
            process_name,
            created_by,
        } => {
            let mapper = ctx.service.create_mapper(&NewFormProcessMapper {
                form_id,
                form_name,
                process_key,
                process_name,
                created_by,
            })?;

            if ctx.format == OutputFormat::Table {
                println!("{} Registered form {}", "✓".green(), mapper.form_id.bold());
                if mapper.process_key.is_none() {
                    println!(
                        "  {} No process key: applications for this form will not start a workflow",
                        "⚠".yellow()
                    );
                }
            }
            output::print_item::<_, MapperRow>(&mapper, ctx.format)
        }
        MapperCommands::Get { form_id } => {
            let mapper = ctx.service.get_mapper_by_form_id(&form_id)?;
            output::print_item::<_, MapperRow>(&mapper, ctx.format)
        }
    }
}

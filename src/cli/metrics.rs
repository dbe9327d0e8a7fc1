//! Dashboard metrics commands

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, MetricsCommands};
use crate::error::Result;
use crate::models::AggregatedRow;
use crate::output;

pub fn run(command: MetricsCommands, opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let groups = match command {
        MetricsCommands::Applications { current, range } => {
            let (from, to) = range.resolve()?;
            log::debug!("Aggregating applications from {} to {}", from, to);
            if current {
                ctx.service.get_current_aggregated_applications(from, to)?
            } else {
                ctx.service.get_aggregated_applications(from, to)?
            }
        }
        MetricsCommands::Status {
            mapper_id,
            current,
            range,
        } => {
            let (from, to) = range.resolve()?;
            if current {
                ctx.service
                    .get_current_aggregated_application_status(mapper_id, from, to)?
            } else {
                ctx.service
                    .get_aggregated_application_status(mapper_id, from, to)?
            }
        }
    };

    output::print_list::<_, AggregatedRow>(&groups, ctx.format)
}

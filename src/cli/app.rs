//! Application commands

use colored::Colorize;
use serde::Serialize;

use crate::cli::args::GlobalOptions;
use crate::cli::{AppCommands, ApplicationFilterArgs, AttributeArgs, CommandContext, OutputFormat, PaginationArgs};
use crate::error::Result;
use crate::models::{
    ApplicationRow, ApplicationView, MapperRow, StatusRow, apply_custom_attributes,
};
use crate::output::{self, json};
use crate::service::{CreateApplicationRequest, Page};
use crate::store::{ApplicationUpdate, QueryParams};

/// Run an application subcommand
pub async fn run(command: AppCommands, opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    match command {
        AppCommands::Create {
            form_id,
            form_url,
            process_instance_id,
            created_by,
        } => {
            // The engine is only called when no instance is supplied
            let credential = match process_instance_id {
                Some(_) => opts.token_ref().unwrap_or_default(),
                None => opts.require_token()?,
            };
            let request = CreateApplicationRequest {
                form_id: Some(form_id),
                form_url,
                process_instance_id,
                created_by,
            };
            let application = ctx.service.create_application(&request, credential).await?;
            let view = ApplicationView::from(application);

            if ctx.format == OutputFormat::Table {
                println!(
                    "{} Created application {} ({})",
                    "✓".green(),
                    view.id,
                    view.process_instance_id.as_deref().unwrap_or("no process")
                );
            }
            output::print_item::<_, ApplicationRow>(&view, ctx.format)
        }

        AppCommands::Get {
            id,
            user,
            authorized,
            attributes,
        } => {
            let view = if authorized {
                ctx.service
                    .get_auth_by_application_id(id, opts.require_token()?)
                    .await?
            } else if let Some(user) = user {
                Some(ctx.service.get_application_by_user(id, &user)?)
            } else {
                Some(ctx.service.get_application(id)?)
            };

            match view {
                Some(view) => print_with_attributes(&view, None, &attributes, ctx.format),
                None => {
                    println!("No results found.");
                    Ok(())
                }
            }
        }

        AppCommands::List {
            all,
            filters,
            pagination,
            attributes,
        } => {
            let params = list_params(&ctx, &filters, &pagination);
            let page = if all {
                ctx.service.get_all_applications(&params)?
            } else {
                ctx.service
                    .get_auth_applications_and_count(opts.require_token()?, &params)
                    .await?
            };
            print_page_with_attributes(&page, &attributes, ctx.format)
        }

        AppCommands::Mine {
            user,
            filters,
            pagination,
        } => {
            let params = list_params(&ctx, &filters, &pagination);
            let page = ctx.service.get_all_applications_by_user(&user, &params)?;
            output::print_page::<_, ApplicationRow>(&page, ctx.format)
        }

        AppCommands::Group {
            members,
            filters,
            pagination,
        } => {
            let params = list_params(&ctx, &filters, &pagination);
            let page = ctx
                .service
                .get_all_application_by_user_group(&members, &params)?;
            output::print_page::<_, ApplicationRow>(&page, ctx.format)
        }

        AppCommands::Form {
            form_id,
            user,
            filters,
            pagination,
        } => {
            let params = list_params(&ctx, &filters, &pagination);
            let page = match user {
                Some(user) => ctx
                    .service
                    .get_all_applications_form_id_user(&form_id, &user, &params)?,
                None => ctx.service.get_all_applications_form_id(&form_id, &params)?,
            };
            output::print_page::<_, ApplicationRow>(&page, ctx.format)
        }

        AppCommands::Ids { ids } => {
            let views = ctx.service.get_all_applications_ids(&ids)?;
            output::print_list::<_, ApplicationRow>(&views, ctx.format)
        }

        AppCommands::Statuses => {
            let statuses = ctx.service.get_all_application_status()?;
            match ctx.format {
                OutputFormat::Table => {
                    let rows: Vec<StatusRow> = statuses.rows();
                    println!("{}", output::table::format_table(&rows));
                }
                OutputFormat::Json => println!("{}", json::format_json(&statuses)?),
            }
            Ok(())
        }

        AppCommands::Update {
            id,
            status,
            process_instance_id,
            form_url,
            modified_by,
        } => {
            let update = ApplicationUpdate {
                application_status: status,
                process_instance_id,
                form_url,
                modified_by,
            };
            if update.is_empty() {
                println!("{} Nothing to update", "○".dimmed());
                return Ok(());
            }
            let view = ctx.service.update_application(id, &update)?;
            output::print_item::<_, ApplicationRow>(&view, ctx.format)
        }

        AppCommands::Mapper { id } => {
            let mapper = ctx.service.get_application_form_mapper_by_id(id)?;
            output::print_item::<_, MapperRow>(&mapper, ctx.format)
        }

        AppCommands::Count { user, form_id } => {
            let count = match (user, form_id) {
                (Some(user), Some(form_id)) => ctx
                    .service
                    .get_all_applications_form_id_user_count(&form_id, &user)?,
                (Some(user), None) => ctx.service.get_all_application_by_user_count(&user)?,
                (None, Some(form_id)) => ctx.service.get_all_applications_form_id_count(&form_id)?,
                (None, None) => {
                    ctx.service
                        .get_all_application_count(opts.require_token()?, &QueryParams::new())
                        .await?
                        .total
                }
            };
            print_count(count, ctx.format)
        }
    }
}

fn list_params(
    ctx: &CommandContext,
    filters: &ApplicationFilterArgs,
    pagination: &PaginationArgs,
) -> QueryParams {
    let mut params = pagination.to_params(ctx.page_size());
    filters.apply(&mut params);
    params
}

#[derive(Serialize)]
struct CountOutput {
    count: u64,
}

fn print_count(count: u64, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", count),
        OutputFormat::Json => println!("{}", json::format_json(&CountOutput { count })?),
    }
    Ok(())
}

/// JSON with formId/submissionId attached, when requested
fn attributed_json<T: Serialize + ?Sized>(data: &T, total: Option<u64>) -> Result<String> {
    let mut value = serde_json::to_value(data)?;
    apply_custom_attributes(&mut value)?;
    let output = match total {
        Some(total) => json::format_json_page(&value, total)?,
        None => json::format_json(&value)?,
    };
    Ok(output)
}

fn print_with_attributes(
    view: &ApplicationView,
    total: Option<u64>,
    attributes: &AttributeArgs,
    format: OutputFormat,
) -> Result<()> {
    if attributes.submission_ids && format == OutputFormat::Json {
        println!("{}", attributed_json(view, total)?);
        return Ok(());
    }
    output::print_item::<_, ApplicationRow>(view, format)
}

fn print_page_with_attributes(
    page: &Page<ApplicationView>,
    attributes: &AttributeArgs,
    format: OutputFormat,
) -> Result<()> {
    if attributes.submission_ids && format == OutputFormat::Json {
        println!("{}", attributed_json(&page.items, Some(page.total))?);
        return Ok(());
    }
    output::print_page::<_, ApplicationRow>(page, format)
}

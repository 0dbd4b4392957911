//! Bearing CLI - project tasks, risks, health reports and an assistant.

use bearing::api::DashboardApi;
use bearing::cli::{ChatCommands, Cli, Commands, ConfigCommands, RiskCommands, TaskCommands};
use bearing::commands::{self, Output};
use bearing::config::{OutputFormat, ResolvedConfig, resolve_config};
use bearing::logging;
use clap::Parser;
use std::process;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match resolve_config(&cli.overrides()) {
        Ok(config) => config,
        Err(e) => fail(&e, cli.human_readable),
    };
    let human = config.output_format() == OutputFormat::Human;

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => fail(&e.into(), human),
    };

    match runtime.block_on(run_command(cli.command, &config, human)) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => fail(&e, human),
    }
}

fn fail(error: &bearing::Error, human: bool) -> ! {
    if human {
        eprintln!("Error: {}", error);
    } else {
        eprintln!("{}", serde_json::json!({ "error": error.to_string() }));
    }
    process::exit(1);
}

/// Run a command; `Ok(false)` means the result was printed but reports a failure.
async fn run_command(
    command: Commands,
    config: &ResolvedConfig,
    human: bool,
) -> Result<bool, bearing::Error> {
    match command {
        Commands::Config { command } => match command {
            ConfigCommands::Show => Ok(output(&commands::config_show(config), human)),
            ConfigCommands::Path => Ok(output(&commands::config_path(config), human)),
        },

        Commands::Dashboard => {
            let api = DashboardApi::from_config(config)?;
            let result = commands::dashboard(&api).await?;
            Ok(output(&result, human))
        }

        Commands::Task { command } => {
            let api = DashboardApi::from_config(config)?;
            match command {
                TaskCommands::List {
                    status,
                    assignee,
                    search,
                } => {
                    let result = commands::task_list(
                        &api,
                        status.as_deref(),
                        assignee.as_deref(),
                        search.as_deref(),
                    )
                    .await?;
                    Ok(output(&result, human))
                }
                TaskCommands::Create {
                    title,
                    description,
                    priority,
                    assignee,
                    due,
                } => {
                    let result = commands::task_create(
                        &api,
                        title,
                        description,
                        priority.as_deref(),
                        assignee,
                        due.as_deref(),
                    )
                    .await?;
                    Ok(output(&result, human))
                }
                TaskCommands::Advance { id } => {
                    let result = commands::task_advance(&api, &id).await?;
                    Ok(output(&result, human))
                }
                TaskCommands::Update {
                    id,
                    status,
                    title,
                    description,
                    priority,
                    assignee,
                    due,
                } => {
                    let args = commands::tasks::UpdateArgs {
                        status: status.as_deref(),
                        title,
                        description,
                        priority: priority.as_deref(),
                        assignee,
                        due: due.as_deref(),
                    };
                    let result = commands::task_update(&api, &id, args).await?;
                    Ok(output(&result, human))
                }
                TaskCommands::Delete { id } => {
                    let result = commands::task_delete(&api, &id).await?;
                    Ok(output(&result, human))
                }
            }
        }

        Commands::Risk { command } => {
            let api = DashboardApi::from_config(config)?;
            match command {
                RiskCommands::List {
                    severity,
                    kind,
                    search,
                    all,
                } => {
                    let result = commands::risk_list(
                        &api,
                        severity.as_deref(),
                        kind.as_deref(),
                        search.as_deref(),
                        all,
                    )
                    .await?;
                    Ok(output(&result, human))
                }
                RiskCommands::Resolve { id } => {
                    let result = commands::risk_resolve(&api, &id).await?;
                    Ok(output(&result, human))
                }
                RiskCommands::Report { project } => {
                    let result = commands::risk_report(&api, &project).await?;
                    Ok(output(&result, human))
                }
            }
        }

        Commands::Report { range, query } => {
            let api = DashboardApi::from_config(config)?;
            let result = commands::report(&api, &range, query.as_deref()).await?;
            Ok(output(&result, human))
        }

        Commands::Chat { command } => {
            let api = DashboardApi::from_config(config)?;
            match command {
                ChatCommands::Ask {
                    message,
                    context,
                    conversation,
                } => {
                    let result =
                        commands::chat_ask(&api, &message, &context, conversation.as_deref())
                            .await?;
                    Ok(output(&result, human))
                }
            }
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, host } => {
            let api = DashboardApi::from_config(config)?;
            bearing::web::start_server(api, port, &host).await?;
            Ok(true)
        }
    }
}

/// Print a result; returns whether it reports success.
fn output<T: Output>(result: &T, human: bool) -> bool {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
    result.succeeded()
}

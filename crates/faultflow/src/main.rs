mod cli;
mod commands;

use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fault")]
#[command(about = "Inject cloud faults, and recover from them, with one command", long_about = None)]
struct Cli {
    /// Settings file (overrides FAULTFLOW_CONFIG_PATH)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List every action with its supported types
    List,
    /// Show version information
    Version,
}

fn command() -> clap::Command {
    let command = Cli::command()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(cli::provider_command(
            "aliyun",
            &faultflow_cloud_aliyun::specs(),
        ));

    #[cfg(feature = "aws")]
    let command = command.subcommand(cli::provider_command(
        "aws",
        &faultflow_cloud_aws::specs(),
    ));

    command
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout is reserved for the JSON response
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    init_tracing(cli.verbose);

    let success = match cli.command {
        Some(Commands::List) => {
            commands::list();
            true
        }
        Some(Commands::Version) => {
            println!("faultflow {}", env!("CARGO_PKG_VERSION"));
            true
        }
        // provider subcommands are generated, so clap leaves them to us
        None => match matches.subcommand() {
            Some((provider, provider_matches)) => {
                let Some((kind, action_matches)) = provider_matches.subcommand() else {
                    unreachable!("clap requires an action subcommand");
                };
                run(provider, kind, action_matches, cli.config.as_deref()).await?
            }
            None => true,
        },
    };

    if !success {
        std::process::exit(1);
    }
    Ok(())
}

async fn run(
    provider: &str,
    kind: &str,
    matches: &ArgMatches,
    config: Option<&Path>,
) -> anyhow::Result<bool> {
    let settings = faultflow_config::Settings::load(config)?;
    tracing::debug!(?settings, "settings loaded");

    let executors = commands::executors(provider, &settings);
    let Some(executor) = executors.iter().find(|e| e.name() == kind) else {
        anyhow::bail!("unknown action: {} {}", provider, kind);
    };

    let flags = cli::collect_flags(executor.spec(), matches);
    let response = executor.exec(&flags).await;
    println!("{}", serde_json::to_string(&response)?);
    Ok(response.success)
}

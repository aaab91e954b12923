//! Depot admin: command-line client for the logistics backend.

mod commands;
mod config;
mod logging;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use depot_utils::SecretString;
use resources::{RestResourceGateway, SessionContext};
use resources_sdk::Credentials;

use commands::{Commands, Context};
use config::{AppConfig, CliOverrides};
use output::{ConsoleNotifier, Output};

/// Depot admin - command-line client for the logistics backend
#[derive(Parser)]
#[command(name = "depot-admin")]
#[command(about = "Depot admin - command-line client for the logistics backend")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Bearer token of an existing session
    #[arg(long, env = "DEPOT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Sign in with this email before running the command
    #[arg(long, env = "DEPOT_EMAIL")]
    email: Option<String>,

    /// Password for --email
    #[arg(long, env = "DEPOT_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config
        && !path.is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    // Layered config:
    // 1) defaults -> 2) YAML (if provided) -> 3) env (DEPOT__*) -> 4) CLI overrides
    let overrides = CliOverrides {
        verbose: cli.verbose,
    };
    let config = AppConfig::load(cli.config.as_deref(), overrides)?;

    if cli.print_config {
        println!("Effective configuration:\n{}", config.to_yaml()?);
        return Ok(ExitCode::SUCCESS);
    }

    logging::init(&config.logging)?;

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Check => check_config(&config),
        Commands::Login { .. } if cli.email.is_none() => {
            anyhow::bail!("login needs --email and --password (or DEPOT_EMAIL/DEPOT_PASSWORD)")
        }
        command => {
            let session = Arc::new(match cli.token {
                Some(token) if cli.email.is_none() => {
                    SessionContext::with_token(SecretString::new(token))
                }
                _ => SessionContext::new(),
            });
            let gateway = Arc::new(RestResourceGateway::new(
                &config.resources,
                Arc::clone(&session),
            )?);
            tracing::debug!(base_url = %gateway.base_url(), "gateway ready");

            if let Some(email) = cli.email {
                let Some(password) = cli.password else {
                    anyhow::bail!("--password (or DEPOT_PASSWORD) is required with --email");
                };
                let credentials = Credentials::new(email, SecretString::new(password));
                session.login(&*gateway, &credentials).await?;
                tracing::info!("signed in");
            }

            let output = Output::new(cli.json);
            if let Commands::Login { print_token } = command {
                return print_session(&session, output, print_token);
            }

            let notifier = Arc::new(ConsoleNotifier::default());
            let ctx = Context {
                gateway,
                session,
                notifier: Arc::clone(&notifier) as _,
                output,
            };
            match ctx.dispatch(command).await {
                Ok(()) => Ok(ExitCode::SUCCESS),
                // Already shown as a notice.
                Err(_) if notifier.reported_error() => Ok(ExitCode::FAILURE),
                Err(err) => Err(err),
            }
        }
    }
}

fn check_config(config: &AppConfig) -> Result<ExitCode> {
    tracing::info!("Checking configuration...");
    config.resources.http_config()?;
    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(ExitCode::SUCCESS)
}

fn print_session(session: &SessionContext, output: Output, print_token: bool) -> Result<ExitCode> {
    match session.user() {
        Some(user) => output.item(&user)?,
        None => println!("Signed in"),
    }
    if print_token && let Some(token) = session.token() {
        println!("{}", token.expose());
    }
    Ok(ExitCode::SUCCESS)
}

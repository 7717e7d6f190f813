use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use sleuth_application::{ConfigUseCase, SleuthApp};
use sleuth_core::SleuthError;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "sleuth")]
#[command(about = "Truth Sleuth - check claims against retrieved evidence", long_about = None)]
#[command(version)]
struct Cli {
    /// Use this config.toml instead of the default one
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Keep history in memory for this run only
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with an email address
    Login { email: String },
    /// End the current session
    Logout,
    /// Show who is logged in
    Whoami,
    /// Update your profile
    Profile {
        /// New display name
        #[arg(long, conflicts_with = "clear_name")]
        name: Option<String>,
        /// Remove the display name
        #[arg(long)]
        clear_name: bool,
    },
    /// Suggest a claim worth checking
    Suggest,
    /// Check a claim (a suggested one when omitted)
    Check {
        #[arg(num_args = 0.., value_name = "CLAIM")]
        claim: Vec<String>,
    },
    /// Browse your past checks
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List your most recent checks
    List,
    /// Show one check in full
    Show { id: String },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the config and data locations
    Path,
    /// Write a config.toml with the default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), describe(&err));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let setup = ConfigUseCase::resolve(cli.config);
    let level = match &setup {
        Ok(setup) => setup.logging_level(),
        Err(_) => "warn".to_string(),
    };
    init_tracing(cli.verbose, &level);
    let setup = setup?;

    // These must work even when config.toml does not parse.
    match cli.command {
        Commands::Config {
            action: ConfigAction::Path,
        } => return commands::config::path(&setup),
        Commands::Config {
            action: ConfigAction::Init { force },
        } => return commands::config::init(&setup, force),
        _ => {}
    }

    let app = SleuthApp::with_config(setup, cli.ephemeral).await?;
    match cli.command {
        Commands::Login { email } => commands::account::login(&app, &email).await,
        Commands::Logout => commands::account::logout(&app).await,
        Commands::Whoami => commands::account::whoami(&app).await,
        Commands::Profile { name, clear_name } => {
            commands::account::profile(&app, name, clear_name).await
        }
        Commands::Suggest => commands::check::suggest(&app).await,
        Commands::Check { claim } => {
            let claim = (!claim.is_empty()).then(|| claim.join(" "));
            commands::check::check(&app, claim).await
        }
        Commands::History { action } => match action {
            HistoryAction::List => commands::history::list(&app).await,
            HistoryAction::Show { id } => commands::history::show(&app, &id).await,
        },
        Commands::Config { .. } => commands::config::show(&app),
    }
}

/// `RUST_LOG` wins, then `-v`, then `[logging] level`.
fn init_tracing(verbose: u8, configured: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match verbose {
            0 => configured,
            1 => "info",
            _ => "debug",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// User-facing text for an error, with the cause for domain errors.
fn describe(err: &anyhow::Error) -> String {
    match err.downcast_ref::<SleuthError>() {
        Some(SleuthError::Validation(message)) => message.clone(),
        Some(sleuth_err) => format!(
            "{} {}",
            sleuth_err.user_message(),
            format!("({})", sleuth_err).dimmed()
        ),
        None => format!("{:#}", err),
    }
}

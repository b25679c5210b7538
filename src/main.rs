//! A Mattermost client for the command line.
//!
//! Sends raw GET queries to the REST API v4, and posts messages to channels or,
//! via direct channels, to users.

use clap::Parser;
use cli::{Cli, Command, PostArgs};
use config::Options;
use dotenvy::dotenv;
use mattermost::{
    api::{Api, HttpApi},
    json::to_pretty_string,
    message::{notify, Level, Message},
    MattermostError,
};
use reqwest::StatusCode;
use std::{env, path::Path, process};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use version::{version_line, VersionInfo};

mod cli;
mod config;
mod de;
mod mattermost;
mod version;

/// Application entrypoint. Initialises tracing, loads any `.env`, and runs
/// the requested subcommand, exiting non-zero on failure.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    // Must happen before parsing, as clap reads `MATTERMOST_*` variables.
    let has_dotenv = dotenv().is_ok();
    if !has_dotenv {
        debug!("No .env found");
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        if e.status() == Some(StatusCode::UNAUTHORIZED) {
            eprintln!("Hint: check the Mattermost Access Token");
        }
        process::exit(1);
    }
}

/// Dispatch a parsed command line.
async fn run(cli: Cli) -> Result<(), MattermostError> {
    match cli.command {
        Command::Version => {
            println!("{}", version_line(&program_name(), &VersionInfo::current()));
            Ok(())
        }
        Command::Get { endpoint } => {
            let opts = config::resolve(&cli.global)?;
            debug!(?opts, "Resolved configuration");

            let res = HttpApi.get(&endpoint, &opts).await?;
            println!("{}", to_pretty_string(&res)?);
            Ok(())
        }
        Command::Post(args) => {
            let opts = config::resolve(&cli.global)?;
            debug!(?opts, "Resolved configuration");

            post(&HttpApi, &args, &opts, cli.global.quiet).await
        }
    }
}

async fn post<A: Api>(
    api: &A,
    args: &PostArgs,
    opts: &Options,
    quiet: bool,
) -> Result<(), MattermostError> {
    let msg = Message {
        author: args.author.clone(),
        title: args.title.clone(),
        text: args.message.clone(),
        level: Level::from_name(&args.level),
    };

    let res = notify(api, &args.channel, &msg, opts).await?;
    if !quiet {
        println!("{}", to_pretty_string(&res)?);
    }

    Ok(())
}

/// The name we were invoked as, for the version line.
fn program_name() -> String {
    env::current_exe()
        .ok()
        .as_deref()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_owned())
}

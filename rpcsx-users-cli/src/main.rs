//! Command line entry point for RPCSX user accounts
//!
//! Operates directly on the emulator's `dev_hdd0/home` tree and the front-end
//! settings file. Logs go to stderr; results go to stdout.

mod commands;
mod config;

use std::process::ExitCode;

use clap::Parser;
use rpcsx_users_app::AppStateBuilder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    // Library crates log through `log`; the subscriber bridges those records too
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Command failed: {e:?}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let paths = cli.paths();
    tracing::info!(
        "Using hdd0 {} and settings {}",
        paths.hdd0.display(),
        paths.settings.display()
    );

    let state = AppStateBuilder::filesystem(&paths.hdd0, &paths.settings).build()?;
    state.run_startup().await;

    let report = commands::execute(&state, cli.command).await?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }

    Ok(())
}

mod config;
mod error;
mod launcher;
mod plan;
mod platform;
mod readiness;
mod spawner;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::style::Stylize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LauncherConfig;
use crate::error::LaunchError;
use crate::launcher::LaunchReport;
use crate::platform::Platform;
use crate::readiness::PortProbe;
use crate::spawner::Strategy;

/// Exit status for a mode other than Test or Eval.
const INVALID_MODE: u8 = 2;

#[derive(Parser)]
#[command(name = "start-comp")]
#[command(about = "Starts the competition Server and Client", long_about = None)]
struct Cli {
    /// Mode of the competition: Test or Eval
    #[arg(short, long)]
    mode: String,
    /// Seconds to wait after starting the Server, at minimum
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u64).range(0..=3600))]
    delay: u64,
    /// Seconds to wait for the Server to listen before starting the Client anyway
    /// (0 disables the check)
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(0..=3600))]
    ready_timeout: u64,
    /// Run both processes in the background instead of in new windows
    #[arg(long)]
    background: bool,
}

impl Cli {
    fn config(&self) -> LauncherConfig {
        LauncherConfig {
            min_delay: Duration::from_secs(self.delay),
            ready_timeout: Duration::from_secs(self.ready_timeout),
            strategy: if self.background {
                Strategy::Background
            } else {
                Strategy::Window
            },
            ..LauncherConfig::default()
        }
    }
}

/// Maps the outcome of a launch to the process exit status.
fn exit_status(result: Result<LaunchReport, LaunchError>) -> anyhow::Result<u8> {
    match result {
        Ok(report) => {
            info!(
                mode = %report.mode,
                server = %report.plan.server.program.display(),
                waited = ?report.readiness.waited(),
                "server and client launched"
            );
            Ok(0)
        }
        Err(err @ LaunchError::InvalidMode(_)) => {
            eprintln!("{}", err.to_string().red());
            Ok(INVALID_MODE)
        }
        Err(err) => Err(err).context("failed to start the competition"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let platform = Platform::current();
    let config = cli.config();
    let spawner = config.strategy.select(platform);
    let probe = PortProbe { port: config.port };

    let result = launcher::run(&cli.mode, &config, platform, spawner.as_ref(), &probe).await;
    exit_status(result).map(ExitCode::from)
}

use crossterm::style::Stylize;
use tracing::info;

use crate::config::{LauncherConfig, Mode};
use crate::error::LaunchError;
use crate::plan::LaunchPlan;
use crate::platform::Platform;
use crate::readiness::{wait_for_server, Readiness, ReadinessProbe};
use crate::spawner::Spawner;

#[derive(Debug)]
pub struct LaunchReport {
    pub mode: Mode,
    pub plan: LaunchPlan,
    pub readiness: Readiness,
}

/// Launches the Server, waits for it to listen, then launches the Client.
///
/// An unknown mode fails before anything is spawned. Once the Server is
/// started it is left running whatever happens next.
pub async fn run(
    mode: &str,
    config: &LauncherConfig,
    platform: Platform,
    spawner: &dyn Spawner,
    probe: &dyn ReadinessProbe,
) -> Result<LaunchReport, LaunchError> {
    let mode: Mode = mode.parse()?;
    println!("{}", format!("Starting competition in {} mode", mode).bold());

    let plan = LaunchPlan::build(config, platform, mode);
    info!(%mode, server = %plan.server, client = %plan.client, "launch plan ready");

    spawner.spawn(&plan.server)?;
    let readiness = wait_for_server(probe, config.min_delay, config.ready_timeout).await;
    info!(?readiness, "starting client");
    spawner.spawn(&plan.client)?;

    Ok(LaunchReport {
        mode,
        plan,
        readiness,
    })
}

//! Shared helpers for command handlers.

use std::io::IsTerminal;

use zhome_core::{Console, Device, Feed, HomeClient, SensorKind};

use crate::cli::{GlobalOpts, KindArg};
use crate::error::CliError;

/// Load the device list once and select `identifier` (hardware id or
/// display name).
pub async fn resolve_device(
    console: &Console<HomeClient>,
    identifier: &str,
) -> Result<Device, CliError> {
    console.refresh_once(Feed::Devices).await?;
    Ok(console.select_device(identifier)?)
}

pub fn sensor_kind(arg: KindArg) -> SensorKind {
    match arg {
        KindArg::Motion => SensorKind::Motion,
        KindArg::Weather => SensorKind::Weather,
        KindArg::Led => SensorKind::Led,
        KindArg::Fan => SensorKind::Fan,
        KindArg::Button => SensorKind::Button,
    }
}

/// Prompts are shown only on a terminal and without `--yes`.
pub fn interactive(global: &GlobalOpts) -> bool {
    !global.yes && std::io::stdin().is_terminal() && std::io::stderr().is_terminal()
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)?;
    Ok(confirmed)
}

pub fn prompt_err(e: dialoguer::Error) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: e.to_string(),
    }
}

/// Wait for Ctrl-C; watch loops select on this.
pub async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

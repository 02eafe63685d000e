//! Command dispatch: bridges CLI args -> console operations -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod logs;
pub mod mqtt;
pub mod sensors;
pub mod topics;
pub mod util;

use zhome_core::{Console, HomeClient};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    console: &Console<HomeClient>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Devices(args) => devices::handle(console, args, global).await,
        Command::Logs(args) => logs::handle(console, args, global).await,
        Command::Sensors(args) => sensors::handle(console, args, global).await,
        Command::Mqtt => mqtt::handle(console, global).await,
        // Offline commands are handled before dispatch
        Command::Topics(_) | Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

//! Command dispatch: bridges CLI args -> client operations -> output formatting.

pub mod config_cmd;
pub mod device;
pub mod health;
pub mod sensor;
pub mod status;
pub mod watch;

use hermie_core::Client;

use crate::cli::{Command, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &Client,
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<(), CliError> {
    match cmd {
        Command::Device(args) => device::handle(client, args, global).await,
        Command::Sensor => sensor::handle(client, global, cfg).await,
        Command::Health => health::handle(client, global).await,
        Command::Status => status::handle(client, global, cfg).await,
        Command::Watch(args) => watch::handle(client, args, global, cfg).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

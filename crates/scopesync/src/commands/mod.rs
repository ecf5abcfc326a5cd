//! Command dispatch: bridges CLI args -> core engine -> output formatting.

pub mod clone;
pub mod config_cmd;
pub mod scopes;
pub mod sites;

use scopesync_api::ApiClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &ApiClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Clone(args) => clone::handle(client, args, global).await,
        Command::Sites(args) => sites::handle(client, args, global).await,
        Command::Scopes(args) => scopes::handle(client, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

//! Command dispatch: bridges CLI args -> sync controller -> output formatting.

pub mod check;
pub mod config_cmd;
pub mod records;
pub mod util;

use clientela_core::{ClientesClient, SyncController};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a service-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &SyncController<ClientesClient>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::List(args) => records::list(controller, args.browse, global).await,
        Command::Search(args) => records::search(controller, args, global).await,
        Command::Create(args) => records::create(controller, args, global).await,
        Command::Update(args) => records::update(controller, args, global).await,
        Command::Delete(args) => records::delete(controller, args, global).await,
        // Handled before a controller exists
        Command::Check(_) | Command::Config(_) | Command::Completions(_) => {
            Err(CliError::Internal("command does not use the service".into()))
        }
    }
}

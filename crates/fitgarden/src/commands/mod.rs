//! Command handler modules and top-level dispatch.

pub mod agenda;
pub mod config_cmd;
pub mod customers;
pub mod menu;
pub mod util;

use fitgarden_core::AgendaService;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a parsed command to its handler.
pub async fn dispatch(
    command: Command,
    service: &AgendaService,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match command {
        Command::Agenda(args) => agenda::handle(service, args, global).await,
        Command::Customers(args) => customers::handle(service, args, global).await,
        Command::Menu(args) => menu::handle(service, args, global).await,
        // Handled before a backend connection exists.
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}

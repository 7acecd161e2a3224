//! CLI command definitions and argument parsing.
//!
//! This module defines all the CLI commands and their arguments using the
//! clap builder API. Each command group lives in its own file.

use clap::Command;

pub mod cleanup_policy;
pub mod file;
pub mod login;
pub mod params;
pub mod repository;
pub mod script;
pub mod security;

use params::{config_parameter, verbose_parameter};

/// Create the complete `nexus3` command tree.
pub fn create_cli_commands() -> Command {
    Command::new("nexus3")
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .propagate_version(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .after_help(
            "Commands may be abbreviated to any unambiguous prefix (e.g. 'repo del' for 'repository delete').",
        )
        .arg(verbose_parameter())
        .arg(config_parameter())
        .subcommand(login::login_command())
        .subcommands(file::file_commands())
        .subcommand(repository::repository_command())
        .subcommand(cleanup_policy::cleanup_policy_command())
        .subcommand(script::script_command())
        .subcommand(security::security_command())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_tree_is_consistent() {
        create_cli_commands().debug_assert();
    }
}

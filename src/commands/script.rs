//! Script command definitions.

use crate::commands::params::{
    format_parameter, format_pretty_parameter, format_with_headers_parameter, name_parameter,
    ALIAS_DELETE, ALIAS_LIST, COMMAND_CREATE, COMMAND_DELETE, COMMAND_LIST, COMMAND_RUN,
    COMMAND_SCRIPT, PARAMETER_FILE, PARAMETER_SCRIPT_ARGUMENTS, PARAMETER_SCRIPT_TYPE,
};
use crate::model::DEFAULT_SCRIPT_TYPE;
use clap::{Arg, Command};
use std::path::PathBuf;

pub fn script_command() -> Command {
    Command::new(COMMAND_SCRIPT)
        .about("Manage scripts (requires groovy_enabled)")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_CREATE)
                .about("Create a script called NAME from the contents of FILE")
                .arg(name_parameter().help("Name of the script"))
                .arg(
                    Arg::new(PARAMETER_FILE)
                        .num_args(1)
                        .required(true)
                        .value_name("FILE")
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("File with the script source"),
                )
                .arg(
                    Arg::new(PARAMETER_SCRIPT_TYPE)
                        .short('t')
                        .long(PARAMETER_SCRIPT_TYPE)
                        .num_args(1)
                        .default_value(DEFAULT_SCRIPT_TYPE)
                        .help("Script language"),
                ),
        )
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List all scripts")
                .visible_alias(ALIAS_LIST)
                .arg(format_parameter())
                .arg(format_pretty_parameter())
                .arg(format_with_headers_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_DELETE)
                .about("Delete a script")
                .visible_alias(ALIAS_DELETE)
                .arg(name_parameter().help("Name of the script")),
        )
        .subcommand(
            Command::new(COMMAND_RUN)
                .about("Run a script and print its result")
                .arg(name_parameter().help("Name of the script"))
                .arg(
                    Arg::new(PARAMETER_SCRIPT_ARGUMENTS)
                        .short('a')
                        .long(PARAMETER_SCRIPT_ARGUMENTS)
                        .num_args(1)
                        .default_value("")
                        .help("Arguments passed to the script as its request body"),
                ),
        )
}

//! Security command definitions.

use crate::commands::params::{
    format_parameter, format_pretty_parameter, format_with_headers_parameter, ALIAS_DELETE,
    ALIAS_LIST, COMMAND_CREATE, COMMAND_DELETE, COMMAND_LIST, COMMAND_ROLE, COMMAND_SECURITY,
    COMMAND_SHOW, COMMAND_UPDATE, PARAMETER_DESCRIPTION, PARAMETER_ID, PARAMETER_NAME,
    PARAMETER_PRIVILEGE, PARAMETER_ROLE,
};
use clap::{Arg, ArgAction, Command};

fn id_parameter() -> Arg {
    Arg::new(PARAMETER_ID)
        .num_args(1)
        .required(true)
        .value_name("ID")
        .help("Role identifier")
}

fn role_attribute_parameters() -> Vec<Arg> {
    vec![
        Arg::new(PARAMETER_NAME)
            .short('n')
            .long(PARAMETER_NAME)
            .num_args(1)
            .help("Role name [default: the role ID]"),
        Arg::new(PARAMETER_DESCRIPTION)
            .short('d')
            .long(PARAMETER_DESCRIPTION)
            .num_args(1)
            .help("Role description"),
        Arg::new(PARAMETER_PRIVILEGE)
            .short('p')
            .long(PARAMETER_PRIVILEGE)
            .action(ArgAction::Append)
            .help("Privilege granted by the role; may be repeated"),
        Arg::new(PARAMETER_ROLE)
            .short('r')
            .long(PARAMETER_ROLE)
            .action(ArgAction::Append)
            .help("Role contained in this role; may be repeated"),
    ]
}

fn role_command() -> Command {
    Command::new(COMMAND_ROLE)
        .about("Manage roles (Nexus 3.68.1 or later)")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List all roles")
                .visible_alias(ALIAS_LIST)
                .arg(format_parameter())
                .arg(format_pretty_parameter())
                .arg(format_with_headers_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_SHOW)
                .about("Show the details of a role")
                .arg(id_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_CREATE)
                .about("Create a role")
                .arg(id_parameter())
                .args(role_attribute_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_UPDATE)
                .about("Update a role; options given replace the current values")
                .arg(id_parameter())
                .args(role_attribute_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_DELETE)
                .about("Delete a role")
                .visible_alias(ALIAS_DELETE)
                .arg(id_parameter()),
        )
}

pub fn security_command() -> Command {
    Command::new(COMMAND_SECURITY)
        .about("Manage security configuration")
        .subcommand_required(true)
        .subcommand(role_command())
}

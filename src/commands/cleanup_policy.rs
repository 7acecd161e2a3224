//! Cleanup policy command definitions.

use crate::commands::params::{
    format_parameter, format_pretty_parameter, format_with_headers_parameter, name_parameter,
    ALIAS_DELETE, ALIAS_LIST, COMMAND_CLEANUP_POLICY, COMMAND_CREATE, COMMAND_DELETE,
    COMMAND_LIST, COMMAND_SHOW, PARAMETER_DOWNLOADED, PARAMETER_NOTES, PARAMETER_POLICY_FORMAT,
    PARAMETER_REGEX, PARAMETER_UPDATED,
};
use clap::{Arg, Command};

fn days_parameter(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .num_args(1)
        .value_name("DAYS")
        .value_parser(clap::value_parser!(u64).range(1..))
        .help(help)
}

pub fn cleanup_policy_command() -> Command {
    Command::new(COMMAND_CLEANUP_POLICY)
        .about("Manage clean-up policies")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_CREATE)
                .about("Create or update a cleanup policy called NAME")
                .arg(name_parameter().help("Name of the cleanup policy"))
                .arg(
                    Arg::new(PARAMETER_POLICY_FORMAT)
                        .long(PARAMETER_POLICY_FORMAT)
                        .num_args(1)
                        .default_value("all")
                        .help("Repository format the policy applies to"),
                )
                .arg(days_parameter(
                    PARAMETER_DOWNLOADED,
                    "Delete assets last downloaded more than this many days ago",
                ))
                .arg(days_parameter(
                    PARAMETER_UPDATED,
                    "Delete assets last updated more than this many days ago",
                ))
                .arg(
                    Arg::new(PARAMETER_REGEX)
                        .long(PARAMETER_REGEX)
                        .num_args(1)
                        .help("Delete only assets whose path matches this regular expression"),
                )
                .arg(
                    Arg::new(PARAMETER_NOTES)
                        .long(PARAMETER_NOTES)
                        .num_args(1)
                        .help("Free-form notes kept with the policy"),
                ),
        )
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List all cleanup policies")
                .visible_alias(ALIAS_LIST)
                .arg(format_parameter())
                .arg(format_pretty_parameter())
                .arg(format_with_headers_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_SHOW)
                .about("Show the details of a cleanup policy")
                .arg(name_parameter().help("Name of the cleanup policy")),
        )
        .subcommand(
            Command::new(COMMAND_DELETE)
                .about("Delete a cleanup policy")
                .visible_alias(ALIAS_DELETE)
                .arg(name_parameter().help("Name of the cleanup policy")),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_defaults() {
        let matches = cleanup_policy_command().get_matches_from([
            "cleanup-policy",
            "create",
            "weekly",
            "--downloaded",
            "7",
        ]);
        let (_, create) = matches.subcommand().unwrap();
        assert_eq!(create.get_one::<String>(PARAMETER_POLICY_FORMAT).unwrap(), "all");
        assert_eq!(create.get_one::<u64>(PARAMETER_DOWNLOADED), Some(&7));
        assert!(create.get_one::<u64>(PARAMETER_UPDATED).is_none());
    }
}

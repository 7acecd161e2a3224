//! Command-line front end.
//!
//! Arguments go through two passes. [`normalize_args`] expands abbreviated
//! command names and maps repository recipes onto their format subcommands,
//! so that clap only ever sees canonical names. After parsing, [`execute`]
//! looks up the handler registered for the path of subcommands that matched.

use crate::{
    actions::{
        cleanup_policies, files, login, repositories, roles, scripts, Context, Handler,
    },
    commands::{params::*, repository::format_commands},
    dispatch::{CommandTable, DispatchError, MappedCommands},
    error::CliError,
};
use clap::{Arg, ArgMatches, Command};
use tracing::{debug, trace};

const HELP: &str = "help";

/// Names and aliases of the direct subcommands of `command`.
fn subcommand_table(command: &Command) -> CommandTable<()> {
    let mut table = CommandTable::new();
    for subcommand in command.get_subcommands() {
        table.register(subcommand.get_name(), ());
        for alias in subcommand.get_all_aliases() {
            table.alias(alias, subcommand.get_name());
        }
    }
    table
}

/// Recipes accepted below `repository create <repository_type>`.
fn recipe_map(repository_type: &str) -> MappedCommands<()> {
    let mut mapped = MappedCommands::new();
    for (format, recipes) in format_commands(repository_type) {
        mapped.register(format, recipes, ());
    }
    mapped.fallback(COMMAND_RECIPE);
    mapped
}

/// True when `token` is an option whose value is the next argument.
fn option_takes_value(command: &Command, globals: &[&Arg], token: &str) -> bool {
    let arg = if let Some(long) = token.strip_prefix("--") {
        if long.contains('=') {
            return false;
        }
        command
            .get_arguments()
            .chain(globals.iter().copied())
            .find(|arg| arg.get_long() == Some(long))
    } else {
        let mut chars = token.chars().skip(1);
        match (chars.next(), chars.next()) {
            (Some(short), None) => command
                .get_arguments()
                .chain(globals.iter().copied())
                .find(|arg| arg.get_short() == Some(short)),
            // a value attached to the short option, or a cluster of flags
            _ => None,
        }
    };

    arg.map(|arg| arg.get_action().takes_values())
        .unwrap_or(false)
}

/// Rewrite `args` so that every command token is the full subcommand name.
///
/// Command tokens may be any unambiguous prefix of a name or alias. Below
/// `repository create <type>` the token is a recipe; it is replaced by the
/// format subcommand handling it and passed on as `--recipe`.
pub fn normalize_args(command: &Command, args: Vec<String>) -> Result<Vec<String>, DispatchError> {
    let globals: Vec<&Arg> = command
        .get_arguments()
        .filter(|arg| arg.is_global_set())
        .collect();

    let mut args = args.into_iter();
    let mut normalized: Vec<String> = args.next().into_iter().collect();
    let mut current = command;
    let mut path: Vec<String> = Vec::new();

    while let Some(token) = args.next() {
        if token == "--" || !current.has_subcommands() || token == HELP {
            normalized.push(token);
            normalized.extend(args.by_ref());
            break;
        }

        if token.starts_with('-') && token.len() > 1 {
            let takes_value = option_takes_value(current, &globals, &token);
            normalized.push(token);
            if takes_value {
                normalized.extend(args.next());
            }
            continue;
        }

        let name = match path.as_slice() {
            [repository, create, repository_type]
                if repository == COMMAND_REPOSITORY && create == COMMAND_CREATE =>
            {
                let name = recipe_map(repository_type).resolve_key(&token)?.to_string();
                normalized.push(name.clone());
                if name != token {
                    trace!("Recipe '{}' is handled by '{}'", token, name);
                    normalized.push(format!("--{}={}", PARAMETER_RECIPE, token));
                }
                name
            }
            _ => {
                let name = subcommand_table(current).resolve_name(&token)?.to_string();
                normalized.push(name.clone());
                name
            }
        };

        current = match current.find_subcommand(&name) {
            Some(subcommand) => subcommand,
            None => return Err(DispatchError::UnknownCommand { token }),
        };
        path.push(name);
    }

    debug!("Normalized arguments: {:?}", normalized);
    Ok(normalized)
}

/// Handlers keyed by the space-separated path of subcommand names.
pub fn handlers() -> CommandTable<Handler> {
    let mut table: CommandTable<Handler> = CommandTable::new();

    table
        .register(COMMAND_LOGIN, login::login)
        .register(COMMAND_LIST, files::list_files)
        .register(COMMAND_DELETE, files::delete_files)
        .register(COMMAND_UPLOAD, files::upload)
        .register(COMMAND_DOWNLOAD, files::download);

    table
        .register("repository list", repositories::list_repositories)
        .register("repository show", repositories::show_repository)
        .register("repository delete", repositories::delete_repository);

    let create_handlers: [(&str, Handler); 3] = [
        (COMMAND_GROUP, repositories::create_group_repository),
        (COMMAND_HOSTED, repositories::create_hosted_repository),
        (COMMAND_PROXY, repositories::create_proxy_repository),
    ];
    for (repository_type, handler) in create_handlers {
        for (format, _) in format_commands(repository_type) {
            table.register(
                &format!("repository create {} {}", repository_type, format),
                handler,
            );
        }
    }

    table
        .register("cleanup-policy create", cleanup_policies::create_cleanup_policy)
        .register("cleanup-policy list", cleanup_policies::list_cleanup_policies)
        .register("cleanup-policy show", cleanup_policies::show_cleanup_policy)
        .register("cleanup-policy delete", cleanup_policies::delete_cleanup_policy);

    table
        .register("script create", scripts::create_script)
        .register("script list", scripts::list_scripts)
        .register("script delete", scripts::delete_script)
        .register("script run", scripts::run_script);

    table
        .register("security role list", roles::list_roles)
        .register("security role show", roles::show_role)
        .register("security role create", roles::create_role)
        .register("security role update", roles::update_role)
        .register("security role delete", roles::delete_role);

    table
}

/// Names of the matched subcommands and the matches of the innermost one.
fn leaf_command(matches: &ArgMatches) -> (Vec<&str>, &ArgMatches) {
    let mut path = Vec::new();
    let mut current = matches;
    while let Some((name, sub_matches)) = current.subcommand() {
        path.push(name);
        current = sub_matches;
    }
    (path, current)
}

/// Run the handler of the command in `matches`.
pub fn execute(context: &Context, matches: &ArgMatches) -> Result<(), CliError> {
    let (path, sub_matches) = leaf_command(matches);
    let key = path.join(" ");

    let handlers = handlers();
    if !handlers.contains(&key) {
        return Err(CliError::UnsupportedSubcommand(key));
    }
    let handler = handlers.resolve(&key)?;

    trace!("Executing '{}'", key);
    handler(context, sub_matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create_cli_commands;

    fn normalize(args: &[&str]) -> Result<Vec<String>, DispatchError> {
        let mut full = vec!["nexus3".to_string()];
        full.extend(args.iter().map(|arg| arg.to_string()));
        normalize_args(&create_cli_commands(), full)
    }

    #[test]
    fn test_abbreviations_expand() {
        assert_eq!(
            normalize(&["repo", "del", "--yes", "maven-releases"]).unwrap(),
            vec!["nexus3", "repository", "delete", "--yes", "maven-releases"]
        );
        assert_eq!(
            normalize(&["cl", "cr", "weekly", "--format", "maven2"]).unwrap(),
            vec!["nexus3", "cleanup-policy", "create", "weekly", "--format", "maven2"]
        );
    }

    #[test]
    fn test_ambiguous_and_unknown_commands() {
        assert!(matches!(
            normalize(&["d", "src", "dst"]),
            Err(DispatchError::AmbiguousCommand { .. })
        ));
        assert!(matches!(
            normalize(&["frobnicate"]),
            Err(DispatchError::UnknownCommand { .. })
        ));
    }

    #[test]
    fn test_option_values_are_not_commands() {
        assert_eq!(
            normalize(&["--config", "/tmp/sc", "scr", "ls"]).unwrap(),
            vec!["nexus3", "--config", "/tmp/sc", "script", "list"]
        );
    }

    #[test]
    fn test_recipe_maps_to_format_command() {
        assert_eq!(
            normalize(&["repo", "create", "hosted", "npm", "npm-internal"]).unwrap(),
            vec![
                "nexus3",
                "repository",
                "create",
                "hosted",
                "recipe",
                "--recipe=npm",
                "npm-internal"
            ]
        );
        assert_eq!(
            normalize(&["repo", "create", "proxy", "maven2", "central", "https://repo1.maven.org/maven2/"]).unwrap()[4..6],
            ["maven".to_string(), "--recipe=maven2".to_string()]
        );
        assert_eq!(
            normalize(&["repository", "create", "group", "docker", "docker-all"]).unwrap()[4..],
            ["docker".to_string(), "docker-all".to_string()]
        );
    }

    #[test]
    fn test_every_leaf_command_has_a_handler() {
        fn visit(command: &Command, path: &mut Vec<String>, handlers: &CommandTable<Handler>) {
            if !command.has_subcommands() {
                let key = path.join(" ");
                assert!(handlers.contains(&key), "no handler for '{}'", key);
                return;
            }
            for subcommand in command.get_subcommands() {
                path.push(subcommand.get_name().to_string());
                visit(subcommand, path, handlers);
                path.pop();
            }
        }

        visit(&create_cli_commands(), &mut Vec::new(), &handlers());
    }

    #[test]
    fn test_parsed_command_reaches_handler_path() {
        let args = normalize(&["sec", "ro", "sh", "nx-admin"]).unwrap();
        let matches = create_cli_commands().try_get_matches_from(args).unwrap();
        let (path, sub_matches) = leaf_command(&matches);
        assert_eq!(path, vec!["security", "role", "show"]);
        assert_eq!(sub_matches.get_one::<String>(PARAMETER_ID).unwrap(), "nx-admin");
    }
}

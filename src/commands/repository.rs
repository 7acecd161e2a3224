//! Repository command definitions.
//!
//! `repository create` has one subcommand per repository type, and below it
//! one subcommand per format with its own options. Recipes without specific
//! options share the `recipe` subcommand; the command line accepts the recipe
//! name itself (`repository create hosted npm NAME`) and the dispatcher maps
//! it onto the right subcommand.

use crate::api::repositories::{
    DOCKER_INDEX_TYPES, GROUP_RECIPES, HOSTED_RECIPES, LAYOUT_POLICIES, PROXY_RECIPES,
    REMOTE_AUTH_TYPES, VERSION_POLICIES, WRITE_POLICIES,
};
use crate::commands::params::*;
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

const APT_RECIPES: &[&str] = &["apt"];
const DOCKER_RECIPES: &[&str] = &["docker"];
const MAVEN_RECIPES: &[&str] = &["maven", "maven2"];
const YUM_RECIPES: &[&str] = &["yum"];

/// Format subcommands of each repository type, with the recipes each one handles.
pub fn format_commands(repository_type: &str) -> Vec<(&'static str, &'static [&'static str])> {
    let mut formats = Vec::new();
    if repository_type != COMMAND_GROUP {
        formats.push((COMMAND_APT, APT_RECIPES));
    }
    formats.push((COMMAND_DOCKER, DOCKER_RECIPES));
    formats.push((COMMAND_MAVEN, MAVEN_RECIPES));
    formats.push((COMMAND_YUM, YUM_RECIPES));

    let generic = match repository_type {
        COMMAND_GROUP => GROUP_RECIPES,
        COMMAND_HOSTED => HOSTED_RECIPES,
        COMMAND_PROXY => PROXY_RECIPES,
        _ => return Vec::new(),
    };
    formats.push((COMMAND_RECIPE, generic));
    formats
}

fn recipe_parameter(recipes: &'static [&'static str]) -> Arg {
    let recipe = Arg::new(PARAMETER_RECIPE)
        .long(PARAMETER_RECIPE)
        .num_args(1)
        .hide(true)
        .value_parser(recipes.to_vec());
    match recipes {
        [only] => recipe.default_value(*only),
        ["maven", "maven2"] => recipe.default_value("maven2"),
        _ => recipe.required(true),
    }
}

fn common_parameters() -> Vec<Arg> {
    let mut args = vec![
        name_parameter().help("Name of the repository"),
        Arg::new(PARAMETER_BLOB_STORE_NAME)
            .long(PARAMETER_BLOB_STORE_NAME)
            .num_args(1)
            .default_value("default")
            .help("Blob store name"),
    ];
    args.extend(flag_pair(
        PARAMETER_STRICT_CONTENT,
        PARAMETER_NO_STRICT_CONTENT,
        "Validate that all content uploaded matches the format [default: strict-content]",
    ));
    args
}

fn cleanup_policy_parameter() -> Arg {
    Arg::new(PARAMETER_CLEANUP_POLICY)
        .short('c')
        .long(PARAMETER_CLEANUP_POLICY)
        .action(ArgAction::Append)
        .help("Cleanup policy applied to the repository; may be repeated")
}

fn group_parameters() -> Vec<Arg> {
    vec![Arg::new(PARAMETER_MEMBER_NAMES)
        .short('m')
        .long(PARAMETER_MEMBER_NAMES)
        .action(ArgAction::Append)
        .required(true)
        .help("Repository that is a member of this group; may be repeated")]
}

fn hosted_parameters() -> Vec<Arg> {
    vec![
        cleanup_policy_parameter(),
        Arg::new(PARAMETER_WRITE_POLICY)
            .long(PARAMETER_WRITE_POLICY)
            .num_args(1)
            .ignore_case(true)
            .default_value("allow_once")
            .value_parser(WRITE_POLICIES.to_vec())
            .help("Controls if deployments of and updates to artifacts are allowed"),
    ]
}

fn proxy_parameters() -> Vec<Arg> {
    let age = |name: &'static str, help: &'static str| {
        Arg::new(name)
            .long(name)
            .num_args(1)
            .default_value("1440")
            .value_parser(clap::value_parser!(u64))
            .help(help)
    };

    let mut args = vec![
        Arg::new(PARAMETER_REMOTE_URL)
            .num_args(1)
            .required(true)
            .value_name("REMOTE_URL")
            .help("Location of the remote repository being proxied"),
        cleanup_policy_parameter(),
        age(PARAMETER_CONTENT_MAX_AGE, "Maximum age of cached artifacts, in minutes"),
        age(PARAMETER_METADATA_MAX_AGE, "Maximum age of cached metadata, in minutes"),
        age(PARAMETER_NEGATIVE_CACHE_TTL, "How long to cache missing items, in minutes"),
        Arg::new(PARAMETER_REMOTE_AUTH_TYPE)
            .long(PARAMETER_REMOTE_AUTH_TYPE)
            .num_args(1)
            .value_parser(REMOTE_AUTH_TYPES.to_vec())
            .requires(PARAMETER_REMOTE_USERNAME)
            .help("Authentication type used with the remote"),
        Arg::new(PARAMETER_REMOTE_USERNAME)
            .long(PARAMETER_REMOTE_USERNAME)
            .num_args(1)
            .help("Username for the remote"),
        Arg::new(PARAMETER_REMOTE_PASSWORD)
            .long(PARAMETER_REMOTE_PASSWORD)
            .num_args(1)
            .help("Password for the remote"),
    ];
    args.extend(flag_pair(
        PARAMETER_AUTO_BLOCK,
        PARAMETER_NO_AUTO_BLOCK,
        "Block outbound connections when the remote is unreachable [default: auto-block]",
    ));
    args.extend(flag_pair(
        PARAMETER_NEGATIVE_CACHE,
        PARAMETER_NO_NEGATIVE_CACHE,
        "Cache responses for content missing on the remote [default: negative-cache]",
    ));
    args
}

fn apt_parameters(repository_type: &str) -> Vec<Arg> {
    let mut args = vec![Arg::new(PARAMETER_DISTRIBUTION)
        .long(PARAMETER_DISTRIBUTION)
        .num_args(1)
        .required(true)
        .help("Distribution to fetch (e.g., bionic)")];

    match repository_type {
        COMMAND_HOSTED => {
            args.push(
                Arg::new(PARAMETER_GPG_KEYPAIR)
                    .long(PARAMETER_GPG_KEYPAIR)
                    .num_args(1)
                    .required(true)
                    .value_parser(clap::value_parser!(PathBuf))
                    .help("File with the PGP signing key pair"),
            );
            args.push(
                Arg::new(PARAMETER_PASSPHRASE)
                    .long(PARAMETER_PASSPHRASE)
                    .num_args(1)
                    .help("Passphrase for the PGP signing key"),
            );
        }
        COMMAND_PROXY => args.extend(flag_pair(
            PARAMETER_FLAT,
            PARAMETER_NO_FLAT,
            "The remote is a flat Debian repository [default: no-flat]",
        )),
        _ => {}
    }
    args
}

fn docker_parameters(repository_type: &str) -> Vec<Arg> {
    let port = |name: &'static str, help: &'static str| {
        Arg::new(name)
            .long(name)
            .num_args(1)
            .value_parser(clap::value_parser!(u64).range(1..=65535))
            .help(help)
    };

    let mut args = vec![
        port(PARAMETER_HTTP_PORT, "Create an HTTP connector at this port"),
        port(PARAMETER_HTTPS_PORT, "Create an HTTPS connector at this port"),
    ];
    args.extend(flag_pair(
        PARAMETER_V1_ENABLED,
        PARAMETER_NO_V1_ENABLED,
        "Allow clients to use the V1 API [default: no-v1-enabled]",
    ));
    args.extend(flag_pair(
        PARAMETER_FORCE_BASIC_AUTH,
        PARAMETER_NO_FORCE_BASIC_AUTH,
        "Allow anonymous docker pull only when disabled [default: force-basic-auth]",
    ));

    if repository_type == COMMAND_PROXY {
        args.push(
            Arg::new(PARAMETER_INDEX_TYPE)
                .long(PARAMETER_INDEX_TYPE)
                .num_args(1)
                .ignore_case(true)
                .default_value("registry")
                .value_parser(DOCKER_INDEX_TYPES.to_vec())
                .help("Docker index to use"),
        );
        args.push(
            Arg::new(PARAMETER_INDEX_URL)
                .long(PARAMETER_INDEX_URL)
                .num_args(1)
                .help("Index URL, used with --index-type=custom"),
        );
        args.extend(flag_pair(
            PARAMETER_TRUST_STORE,
            PARAMETER_NO_TRUST_STORE,
            "Use the Nexus truststore for index access [default: no-trust-store]",
        ));
    }
    args
}

fn maven_parameters() -> Vec<Arg> {
    vec![
        Arg::new(PARAMETER_VERSION_POLICY)
            .long(PARAMETER_VERSION_POLICY)
            .num_args(1)
            .ignore_case(true)
            .default_value("release")
            .value_parser(VERSION_POLICIES.to_vec())
            .help("Version policy"),
        Arg::new(PARAMETER_LAYOUT_POLICY)
            .long(PARAMETER_LAYOUT_POLICY)
            .num_args(1)
            .ignore_case(true)
            .default_value("strict")
            .value_parser(LAYOUT_POLICIES.to_vec())
            .help("Validate that all paths are maven artifact or metadata paths"),
    ]
}

fn yum_parameters(repository_type: &str) -> Vec<Arg> {
    if repository_type != COMMAND_HOSTED {
        return Vec::new();
    }
    vec![
        Arg::new(PARAMETER_DEPTH)
            .long(PARAMETER_DEPTH)
            .num_args(1)
            .default_value("0")
            .value_parser(clap::value_parser!(u64).range(0..=5))
            .help("Depth where repodata folder(s) are created"),
        Arg::new(PARAMETER_DEPLOY_POLICY)
            .long(PARAMETER_DEPLOY_POLICY)
            .num_args(1)
            .ignore_case(true)
            .default_value("strict")
            .value_parser(LAYOUT_POLICIES.to_vec())
            .help("Validate that all paths are RPMs or yum metadata"),
    ]
}

fn type_parameters(repository_type: &str) -> Vec<Arg> {
    match repository_type {
        COMMAND_GROUP => group_parameters(),
        COMMAND_HOSTED => hosted_parameters(),
        COMMAND_PROXY => proxy_parameters(),
        _ => Vec::new(),
    }
}

fn format_specific_parameters(repository_type: &str, format: &str) -> Vec<Arg> {
    match format {
        COMMAND_APT => apt_parameters(repository_type),
        COMMAND_DOCKER => docker_parameters(repository_type),
        COMMAND_MAVEN => maven_parameters(),
        COMMAND_YUM => yum_parameters(repository_type),
        _ => Vec::new(),
    }
}

fn repository_type_command(repository_type: &'static str, about: &'static str) -> Command {
    let mut command = Command::new(repository_type)
        .about(about)
        .subcommand_required(true);

    for (format, recipes) in format_commands(repository_type) {
        let mut leaf = Command::new(format)
            .arg(recipe_parameter(recipes))
            .args(common_parameters())
            .args(type_parameters(repository_type))
            .args(format_specific_parameters(repository_type, format));

        leaf = if format == COMMAND_RECIPE {
            leaf.about(format!(
                "Create a {} repository of a recipe without specific options: {}",
                repository_type,
                recipes.join(", ")
            ))
        } else {
            leaf.about(format!("Create a {} {} repository", repository_type, format))
        };
        command = command.subcommand(leaf);
    }

    command
}

/// Create the repository command with all its subcommands.
pub fn repository_command() -> Command {
    Command::new(COMMAND_REPOSITORY)
        .about("Manage repositories")
        .visible_alias(ALIAS_REPOSITORY)
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List all repositories")
                .visible_alias(ALIAS_LIST)
                .arg(format_parameter())
                .arg(format_pretty_parameter())
                .arg(format_with_headers_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_SHOW)
                .about("Show the configuration of a repository")
                .arg(name_parameter().help("Name of the repository")),
        )
        .subcommand(
            Command::new(COMMAND_DELETE)
                .about("Delete a repository")
                .visible_alias(ALIAS_DELETE)
                .arg(name_parameter().help("Name of the repository"))
                .arg(yes_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_CREATE)
                .about("Create a repository")
                .subcommand_required(true)
                .subcommand(repository_type_command(
                    COMMAND_GROUP,
                    "Create a group repository",
                ))
                .subcommand(repository_type_command(
                    COMMAND_HOSTED,
                    "Create a hosted repository",
                ))
                .subcommand(repository_type_command(
                    COMMAND_PROXY,
                    "Create a proxy repository",
                )),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_command_is_consistent() {
        repository_command().debug_assert();
    }

    #[test]
    fn test_hosted_maven_defaults() {
        let matches = repository_command().get_matches_from([
            "repository",
            "create",
            "hosted",
            "maven",
            "maven-releases",
        ]);
        let (_, create) = matches.subcommand().unwrap();
        let (_, hosted) = create.subcommand().unwrap();
        let (format, leaf) = hosted.subcommand().unwrap();

        assert_eq!(format, COMMAND_MAVEN);
        assert_eq!(leaf.get_one::<String>(PARAMETER_RECIPE).unwrap(), "maven2");
        assert_eq!(leaf.get_one::<String>(PARAMETER_WRITE_POLICY).unwrap(), "allow_once");
        assert_eq!(leaf.get_one::<String>(PARAMETER_VERSION_POLICY).unwrap(), "release");
    }

    #[test]
    fn test_generic_recipe_is_required() {
        let result = repository_command().try_get_matches_from([
            "repository",
            "create",
            "hosted",
            "recipe",
            "npm-internal",
        ]);
        assert!(result.is_err());

        let result = repository_command().try_get_matches_from([
            "repository",
            "create",
            "hosted",
            "recipe",
            "--recipe=npm",
            "npm-internal",
        ]);
        assert!(result.is_ok());
    }
}

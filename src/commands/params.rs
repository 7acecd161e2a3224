//! Shared command parameters for all CLI commands.
//!
//! This module defines the command and parameter names used across the
//! command modules, together with constructors for arguments that appear in
//! more than one command.

use crate::format::OutputFormat;
use clap::{Arg, ArgAction, ArgMatches};
use std::path::PathBuf;

// CRUD operations
pub const COMMAND_CREATE: &str = "create";
pub const COMMAND_SHOW: &str = "show";
pub const COMMAND_LIST: &str = "list";
pub const COMMAND_UPDATE: &str = "update";
pub const COMMAND_DELETE: &str = "delete";

pub const ALIAS_LIST: &str = "ls";
pub const ALIAS_DELETE: &str = "rm";

// File commands
pub const COMMAND_UPLOAD: &str = "upload";
pub const COMMAND_DOWNLOAD: &str = "download";

pub const COMMAND_LOGIN: &str = "login";

// Repository commands
pub const COMMAND_REPOSITORY: &str = "repository";
pub const ALIAS_REPOSITORY: &str = "repo";
pub const COMMAND_GROUP: &str = "group";
pub const COMMAND_HOSTED: &str = "hosted";
pub const COMMAND_PROXY: &str = "proxy";

// Format-specific repository commands
pub const COMMAND_RECIPE: &str = "recipe";
pub const COMMAND_APT: &str = "apt";
pub const COMMAND_DOCKER: &str = "docker";
pub const COMMAND_MAVEN: &str = "maven";
pub const COMMAND_YUM: &str = "yum";

pub const COMMAND_CLEANUP_POLICY: &str = "cleanup-policy";

pub const COMMAND_SCRIPT: &str = "script";
pub const COMMAND_RUN: &str = "run";

pub const COMMAND_SECURITY: &str = "security";
pub const COMMAND_ROLE: &str = "role";

// Global parameters
pub const PARAMETER_VERBOSE: &str = "verbose";
pub const PARAMETER_CONFIG: &str = "config";

// Output parameters
pub const PARAMETER_FORMAT: &str = "format";
pub const PARAMETER_PRETTY: &str = "pretty";
pub const PARAMETER_HEADERS: &str = "headers";

// Login parameters
pub const PARAMETER_URL: &str = "url";
pub const PARAMETER_USERNAME: &str = "username";
pub const PARAMETER_PASSWORD: &str = "password";
pub const PARAMETER_X509_VERIFY: &str = "x509-verify";
pub const PARAMETER_NO_X509_VERIFY: &str = "no-x509-verify";

// File parameters
pub const PARAMETER_REPOSITORY_PATH: &str = "repository-path";
pub const PARAMETER_SRC: &str = "src";
pub const PARAMETER_DST: &str = "dst";
pub const PARAMETER_FLATTEN: &str = "flatten";
pub const PARAMETER_NO_FLATTEN: &str = "no-flatten";
pub const PARAMETER_RECURSE: &str = "recurse";
pub const PARAMETER_NO_RECURSE: &str = "no-recurse";
pub const PARAMETER_CACHE: &str = "cache";
pub const PARAMETER_NO_CACHE: &str = "no-cache";

// Resource parameters
pub const PARAMETER_NAME: &str = "name";
pub const PARAMETER_ID: &str = "id";
pub const PARAMETER_YES: &str = "yes";
pub const PARAMETER_FILE: &str = "file";
pub const PARAMETER_DESCRIPTION: &str = "description";

// Script parameters
pub const PARAMETER_SCRIPT_TYPE: &str = "script-type";
pub const PARAMETER_SCRIPT_ARGUMENTS: &str = "script-arguments";

// Role parameters
pub const PARAMETER_PRIVILEGE: &str = "privilege";
pub const PARAMETER_ROLE: &str = "role";

// Cleanup policy parameters; `format` here is the repository format
pub const PARAMETER_POLICY_FORMAT: &str = "format";
pub const PARAMETER_DOWNLOADED: &str = "downloaded";
pub const PARAMETER_UPDATED: &str = "updated";
pub const PARAMETER_REGEX: &str = "regex";
pub const PARAMETER_NOTES: &str = "notes";

// Repository parameters
pub const PARAMETER_RECIPE: &str = "recipe";
pub const PARAMETER_BLOB_STORE_NAME: &str = "blob-store-name";
pub const PARAMETER_STRICT_CONTENT: &str = "strict-content";
pub const PARAMETER_NO_STRICT_CONTENT: &str = "no-strict-content";
pub const PARAMETER_CLEANUP_POLICY: &str = "cleanup-policy";
pub const PARAMETER_WRITE_POLICY: &str = "write-policy";
pub const PARAMETER_MEMBER_NAMES: &str = "member-names";
pub const PARAMETER_REMOTE_URL: &str = "remote-url";
pub const PARAMETER_AUTO_BLOCK: &str = "auto-block";
pub const PARAMETER_NO_AUTO_BLOCK: &str = "no-auto-block";
pub const PARAMETER_CONTENT_MAX_AGE: &str = "content-max-age";
pub const PARAMETER_METADATA_MAX_AGE: &str = "metadata-max-age";
pub const PARAMETER_NEGATIVE_CACHE: &str = "negative-cache";
pub const PARAMETER_NO_NEGATIVE_CACHE: &str = "no-negative-cache";
pub const PARAMETER_NEGATIVE_CACHE_TTL: &str = "negative-cache-ttl";
pub const PARAMETER_REMOTE_AUTH_TYPE: &str = "remote-auth-type";
pub const PARAMETER_REMOTE_USERNAME: &str = "remote-username";
pub const PARAMETER_REMOTE_PASSWORD: &str = "remote-password";
pub const PARAMETER_DISTRIBUTION: &str = "distribution";
pub const PARAMETER_GPG_KEYPAIR: &str = "gpg-keypair";
pub const PARAMETER_PASSPHRASE: &str = "passphrase";
pub const PARAMETER_FLAT: &str = "flat";
pub const PARAMETER_NO_FLAT: &str = "no-flat";
pub const PARAMETER_V1_ENABLED: &str = "v1-enabled";
pub const PARAMETER_NO_V1_ENABLED: &str = "no-v1-enabled";
pub const PARAMETER_FORCE_BASIC_AUTH: &str = "force-basic-auth";
pub const PARAMETER_NO_FORCE_BASIC_AUTH: &str = "no-force-basic-auth";
pub const PARAMETER_HTTP_PORT: &str = "http-port";
pub const PARAMETER_HTTPS_PORT: &str = "https-port";
pub const PARAMETER_INDEX_TYPE: &str = "index-type";
pub const PARAMETER_INDEX_URL: &str = "index-url";
pub const PARAMETER_TRUST_STORE: &str = "trust-store";
pub const PARAMETER_NO_TRUST_STORE: &str = "no-trust-store";
pub const PARAMETER_VERSION_POLICY: &str = "version-policy";
pub const PARAMETER_LAYOUT_POLICY: &str = "layout-policy";
pub const PARAMETER_DEPTH: &str = "depth";
pub const PARAMETER_DEPLOY_POLICY: &str = "deploy-policy";

/// Create the output format parameter of listing commands.
pub fn format_parameter() -> Arg {
    Arg::new(PARAMETER_FORMAT)
        .short('f')
        .long(PARAMETER_FORMAT)
        .num_args(1)
        .required(false)
        .env("NEXUS3_FORMAT")
        .default_value("json")
        .help("Output data format")
        .value_parser(OutputFormat::names())
}

pub fn format_pretty_parameter() -> Arg {
    Arg::new(PARAMETER_PRETTY)
        .long(PARAMETER_PRETTY)
        .action(ArgAction::SetTrue)
        .required(false)
        .help("Format the output pretty")
}

pub fn format_with_headers_parameter() -> Arg {
    Arg::new(PARAMETER_HEADERS)
        .long(PARAMETER_HEADERS)
        .action(ArgAction::SetTrue)
        .required(false)
        .env("NEXUS3_HEADERS")
        .help("Format the output with headers")
}

/// Create the global configuration file parameter.
pub fn config_parameter() -> Arg {
    Arg::new(PARAMETER_CONFIG)
        .long(PARAMETER_CONFIG)
        .num_args(1)
        .required(false)
        .global(true)
        .env(crate::configuration::CONFIG_PATH_ENV_VAR)
        .value_parser(clap::value_parser!(PathBuf))
        .help("Configuration file [default: ~/.nexus-cli]")
}

pub fn verbose_parameter() -> Arg {
    Arg::new(PARAMETER_VERBOSE)
        .short('v')
        .long(PARAMETER_VERBOSE)
        .action(ArgAction::SetTrue)
        .global(true)
        .help("Enable verbose output for debugging")
}

/// A `--name`/`--no-name` pair of flags; the last one given wins.
pub fn flag_pair(name: &'static str, negated: &'static str, help: &'static str) -> [Arg; 2] {
    [
        Arg::new(name)
            .long(name)
            .action(ArgAction::SetTrue)
            .overrides_with(negated)
            .help(help),
        Arg::new(negated)
            .long(negated)
            .action(ArgAction::SetTrue)
            .overrides_with(name)
            .hide_short_help(true),
    ]
}

/// Value of a flag pair created by [`flag_pair`], or `default` when neither was given.
pub fn flag_value(matches: &ArgMatches, name: &str, negated: &str, default: bool) -> bool {
    let given = |id: &str| matches!(matches.try_get_one::<bool>(id), Ok(Some(true)));
    if given(name) {
        true
    } else if given(negated) {
        false
    } else {
        default
    }
}

/// Create the positional resource name parameter.
pub fn name_parameter() -> Arg {
    Arg::new(PARAMETER_NAME)
        .num_args(1)
        .required(true)
        .value_name("NAME")
        .help("Resource name")
}

/// Create the positional `repository/path` parameter.
pub fn repository_path_parameter() -> Arg {
    Arg::new(PARAMETER_REPOSITORY_PATH)
        .num_args(1)
        .required(true)
        .value_name("REPOSITORY_PATH")
        .help("Repository name, optionally followed by a path (e.g., raw-hosted/dir/)")
}

pub fn yes_parameter() -> Arg {
    Arg::new(PARAMETER_YES)
        .short('y')
        .long(PARAMETER_YES)
        .action(ArgAction::SetTrue)
        .help("Confirm the action without prompting")
}

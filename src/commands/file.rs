//! Top-level commands working on files stored in repositories.

use crate::commands::params::{
    flag_pair, format_parameter, format_pretty_parameter, format_with_headers_parameter,
    repository_path_parameter, ALIAS_DELETE, ALIAS_LIST, COMMAND_DELETE, COMMAND_DOWNLOAD,
    COMMAND_LIST, COMMAND_UPLOAD, PARAMETER_CACHE, PARAMETER_DST, PARAMETER_FLATTEN,
    PARAMETER_NO_CACHE, PARAMETER_NO_FLATTEN, PARAMETER_NO_RECURSE, PARAMETER_RECURSE,
    PARAMETER_SRC,
};
use clap::{Arg, Command};

fn src_parameter(help: &'static str) -> Arg {
    Arg::new(PARAMETER_SRC)
        .num_args(1)
        .required(true)
        .value_name("SRC")
        .help(help)
}

fn dst_parameter(help: &'static str) -> Arg {
    Arg::new(PARAMETER_DST)
        .num_args(1)
        .required(true)
        .value_name("DST")
        .help(help)
}

fn transfer_flags() -> Vec<Arg> {
    let mut flags = Vec::new();
    flags.extend(flag_pair(
        PARAMETER_FLATTEN,
        PARAMETER_NO_FLATTEN,
        "Flatten the directory structure at the destination [default: no-flatten]",
    ));
    flags.extend(flag_pair(
        PARAMETER_RECURSE,
        PARAMETER_NO_RECURSE,
        "Descend into nested directories [default: recurse]",
    ));
    flags
}

pub fn file_commands() -> Vec<Command> {
    vec![
        Command::new(COMMAND_LIST)
            .about("List all files within a path in the repository")
            .visible_alias(ALIAS_LIST)
            .arg(repository_path_parameter())
            .arg(format_parameter())
            .arg(format_pretty_parameter())
            .arg(format_with_headers_parameter()),
        Command::new(COMMAND_DELETE)
            .about("Recursively delete all files under a repository path")
            .visible_alias(ALIAS_DELETE)
            .arg(repository_path_parameter()),
        Command::new(COMMAND_UPLOAD)
            .about("Upload a local file or directory to a repository path")
            .long_about(
                "Upload a local file or directory to a repository path.\n\n\
                 End DST with '/' to upload a single file into a directory under its own name.",
            )
            .arg(src_parameter("Local file or directory"))
            .arg(dst_parameter("Destination as repository/path"))
            .args(transfer_flags()),
        Command::new(COMMAND_DOWNLOAD)
            .about("Download a repository path to a local file or directory")
            .arg(src_parameter("Source as repository/path; end with '/' for a directory"))
            .arg(dst_parameter("Local file or directory; end with '/' for a directory"))
            .args(transfer_flags())
            .args(flag_pair(
                PARAMETER_CACHE,
                PARAMETER_NO_CACHE,
                "Skip files whose local copy matches the server checksum [default: cache]",
            )),
    ]
}

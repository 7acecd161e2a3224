use clap::error::ErrorKind;
use nexus3_cli::{
    actions::Context,
    cli::{execute, normalize_args},
    commands::{
        create_cli_commands,
        params::{PARAMETER_CONFIG, PARAMETER_VERBOSE},
    },
    configuration::SettingsOverrides,
    error::CliError,
    error_utils,
    exit_codes::NexusExitCode,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Initialize the logging subsystem. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn exit_with_error(error: CliError) -> ! {
    error_utils::report_error(&error);
    std::process::exit(error.exit_code().code());
}

/// Main entry point for the program
fn main() {
    let command = create_cli_commands();
    let args: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    let args = match normalize_args(&command, args) {
        Ok(args) => args,
        Err(e) => exit_with_error(e.into()),
    };

    let matches = match command.try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                std::process::exit(NexusExitCode::UsageError.code());
            }
        },
    };

    init_logging(matches.get_flag(PARAMETER_VERBOSE));

    let result = SettingsOverrides::from_process_env()
        .map_err(CliError::from)
        .and_then(|environment| {
            Context::new(matches.get_one::<PathBuf>(PARAMETER_CONFIG).cloned(), environment)
        })
        .and_then(|context| execute(&context, &matches));

    if let Err(e) = result {
        exit_with_error(e);
    }
}

//! Command handlers.
//!
//! Every handler has the [`Handler`] signature: it receives the invocation
//! [`Context`] and the matches of its own subcommand, and returns a
//! [`CliError`] that `main` turns into an exit code.

use crate::{
    client::NexusClient,
    commands::params::{PARAMETER_FORMAT, PARAMETER_HEADERS, PARAMETER_PRETTY},
    configuration::{Settings, SettingsOverrides},
    error::CliError,
    format::{Formattable, FormattingError, OutputFormat, OutputFormatOptions},
};
use clap::ArgMatches;
use serde::Serialize;
use std::io::IsTerminal;
use std::path::PathBuf;

pub mod cleanup_policies;
pub mod files;
pub mod login;
pub mod repositories;
pub mod roles;
pub mod scripts;

pub type Handler = fn(&Context, &ArgMatches) -> Result<(), CliError>;

/// State shared by all handlers of one invocation.
#[derive(Debug, Clone)]
pub struct Context {
    config_path: PathBuf,
    environment: SettingsOverrides,
}

impl Context {
    /// `config_path` is the `--config` value, if any; the environment is
    /// captured once here so that every handler sees the same snapshot.
    pub fn new(
        config_path: Option<PathBuf>,
        environment: SettingsOverrides,
    ) -> Result<Context, CliError> {
        let config_path = match config_path {
            Some(path) => path,
            None => Settings::default_configuration_file_path()?,
        };
        Ok(Context {
            config_path,
            environment,
        })
    }

    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Settings with `explicit` values taking precedence over everything else.
    pub fn settings(&self, explicit: &SettingsOverrides) -> Result<Settings, CliError> {
        Ok(Settings::resolve(
            self.config_path.clone(),
            &self.environment,
            explicit,
        )?)
    }

    pub fn client(&self) -> Result<NexusClient, CliError> {
        let settings = self.settings(&SettingsOverrides::default())?;
        Ok(NexusClient::new(settings)?)
    }
}

/// True when both the user's input and our diagnostics are attached to a terminal.
pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stderr().is_terminal()
}

/// Output format selected by the `--format`, `--pretty` and `--headers` arguments.
pub fn output_format(sub_matches: &ArgMatches) -> Result<OutputFormat, CliError> {
    let format = sub_matches
        .get_one::<String>(PARAMETER_FORMAT)
        .map(String::as_str)
        .unwrap_or(crate::format::JSON);
    let options = OutputFormatOptions {
        with_headers: sub_matches.get_flag(PARAMETER_HEADERS),
        pretty: sub_matches.get_flag(PARAMETER_PRETTY),
    };
    Ok(OutputFormat::from_string_with_options(format, options)?)
}

/// Print a listing in the format requested on the command line.
pub fn print_listing<T: Formattable>(items: &T, sub_matches: &ArgMatches) -> Result<(), CliError> {
    let format = output_format(sub_matches)?;
    let output = items.format(&format)?;
    // CSV output already ends with a newline
    match format {
        OutputFormat::Csv(_) => print!("{}", output),
        OutputFormat::Json(_) => println!("{}", output),
    }
    Ok(())
}

/// Print a single record as pretty JSON.
pub fn print_record<T: Serialize>(record: &T) -> Result<(), CliError> {
    let output = serde_json::to_string_pretty(record).map_err(FormattingError::from)?;
    println!("{}", output);
    Ok(())
}

/// Value of a required argument. Clap enforces presence, so a miss is a usage error
/// in the command definitions.
pub fn required<'a, T>(sub_matches: &'a ArgMatches, id: &str) -> Result<&'a T, CliError>
where
    T: std::any::Any + Clone + Send + Sync + 'static,
{
    sub_matches
        .get_one::<T>(id)
        .ok_or_else(|| CliError::MissingRequiredArgument(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::params::{
        format_parameter, format_pretty_parameter, format_with_headers_parameter,
    };
    use clap::Command;

    fn list_command() -> Command {
        Command::new("list")
            .arg(format_parameter())
            .arg(format_pretty_parameter())
            .arg(format_with_headers_parameter())
    }

    #[test]
    fn test_output_format_from_arguments() {
        let matches = list_command().get_matches_from(["list", "-f", "csv", "--headers"]);
        assert_eq!(
            output_format(&matches).unwrap(),
            OutputFormat::Csv(OutputFormatOptions {
                with_headers: true,
                pretty: false
            })
        );
    }

    #[test]
    fn test_context_uses_explicit_config_path() {
        let context = Context::new(
            Some(PathBuf::from("/tmp/nexus-cli-test")),
            SettingsOverrides::default(),
        )
        .unwrap();
        assert_eq!(context.config_path(), &PathBuf::from("/tmp/nexus-cli-test"));
    }
}

use crate::{
    actions::{is_interactive, Context},
    client::NexusClient,
    commands::params::{
        flag_value, PARAMETER_NO_X509_VERIFY, PARAMETER_PASSWORD, PARAMETER_URL,
        PARAMETER_USERNAME, PARAMETER_X509_VERIFY,
    },
    configuration::{SettingsOverrides, DEFAULT_URL},
    error::CliError,
};
use clap::ArgMatches;
use inquire::{Password, PasswordDisplayMode, Text};
use tracing::{debug, trace};

/// Value given on the command line, or asked for when a terminal is available.
fn argument_or_prompt(
    sub_matches: &ArgMatches,
    id: &str,
    prompt: impl FnOnce() -> Result<String, inquire::InquireError>,
) -> Result<Option<String>, CliError> {
    if let Some(value) = sub_matches.get_one::<String>(id) {
        return Ok(Some(value.clone()));
    }
    if !is_interactive() {
        return Ok(None);
    }
    Ok(Some(prompt()?))
}

pub fn login(context: &Context, sub_matches: &ArgMatches) -> Result<(), CliError> {
    trace!("Executing login command...");

    let url = argument_or_prompt(sub_matches, PARAMETER_URL, || {
        Text::new("Nexus OSS URL:").with_default(DEFAULT_URL).prompt()
    })?;
    let username = argument_or_prompt(sub_matches, PARAMETER_USERNAME, || {
        Text::new("Nexus admin username:").with_default("admin").prompt()
    })?;
    let password = argument_or_prompt(sub_matches, PARAMETER_PASSWORD, || {
        Password::new("Nexus admin password:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()
    })?;

    let x509_given = sub_matches.get_flag(PARAMETER_X509_VERIFY)
        || sub_matches.get_flag(PARAMETER_NO_X509_VERIFY);
    let x509_verify = x509_given.then(|| {
        flag_value(
            sub_matches,
            PARAMETER_X509_VERIFY,
            PARAMETER_NO_X509_VERIFY,
            true,
        )
    });

    let explicit = SettingsOverrides {
        url,
        username,
        password,
        x509_verify,
        ..Default::default()
    };
    let settings = context.settings(&explicit)?;
    debug!("Validating credentials against {}", settings.url());

    let client = NexusClient::new(settings.clone())?;
    client.repositories().raw_list()?;

    let config_path = settings.dump()?;
    let env_path = settings.dump_env()?;
    println!("Configuration saved to {}, {}", config_path.display(), env_path.display());

    Ok(())
}

use crate::{
    actions::{print_listing, print_record, required, Context},
    commands::params::{PARAMETER_FILE, PARAMETER_NAME, PARAMETER_SCRIPT_ARGUMENTS, PARAMETER_SCRIPT_TYPE},
    error::CliError,
    model::{Script, DEFAULT_SCRIPT_TYPE},
};
use clap::ArgMatches;
use std::path::PathBuf;
use tracing::trace;

pub fn create_script(context: &Context, sub_matches: &ArgMatches) -> Result<(), CliError> {
    trace!("Executing script create command...");
    let name = required::<String>(sub_matches, PARAMETER_NAME)?;
    let path = required::<PathBuf>(sub_matches, PARAMETER_FILE)?;
    let script_type = sub_matches
        .get_one::<String>(PARAMETER_SCRIPT_TYPE)
        .map(String::as_str)
        .unwrap_or(DEFAULT_SCRIPT_TYPE);

    let client = context.client()?;
    // fail on a disabled server before touching the file
    client.require_groovy("script create")?;

    let content = std::fs::read_to_string(path).map_err(|cause| CliError::InputError {
        path: path.clone(),
        cause,
    })?;
    let script = Script {
        name: name.clone(),
        content,
        script_type: script_type.to_string(),
    };
    let script = client.scripts().create(&script)?;
    print_record(&script)
}

pub fn list_scripts(context: &Context, sub_matches: &ArgMatches) -> Result<(), CliError> {
    let client = context.client()?;
    let scripts = client.scripts().list()?;
    print_listing(&scripts, sub_matches)
}

pub fn delete_script(context: &Context, sub_matches: &ArgMatches) -> Result<(), CliError> {
    let name = required::<String>(sub_matches, PARAMETER_NAME)?;
    let client = context.client()?;
    client.scripts().delete(name)?;
    Ok(())
}

pub fn run_script(context: &Context, sub_matches: &ArgMatches) -> Result<(), CliError> {
    let name = required::<String>(sub_matches, PARAMETER_NAME)?;
    let arguments = sub_matches
        .get_one::<String>(PARAMETER_SCRIPT_ARGUMENTS)
        .map(String::as_str)
        .unwrap_or_default();

    let client = context.client()?;
    let result = client.scripts().run(name, arguments)?;
    print_record(&result)
}

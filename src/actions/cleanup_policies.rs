use crate::{
    actions::{print_listing, print_record, required, Context},
    api::cleanup_policies::policy_from_parameters,
    commands::params::{
        PARAMETER_DOWNLOADED, PARAMETER_NAME, PARAMETER_NOTES, PARAMETER_POLICY_FORMAT,
        PARAMETER_REGEX, PARAMETER_UPDATED,
    },
    error::CliError,
    payload::{drop_nulls, Parameters},
};
use clap::ArgMatches;
use serde_json::json;
use tracing::trace;

fn collect_parameters(sub_matches: &ArgMatches) -> Result<Parameters, CliError> {
    let mut parameters = Parameters::new();
    parameters.insert(
        PARAMETER_NAME.to_string(),
        json!(required::<String>(sub_matches, PARAMETER_NAME)?),
    );
    parameters.insert(
        PARAMETER_POLICY_FORMAT.to_string(),
        json!(sub_matches.get_one::<String>(PARAMETER_POLICY_FORMAT)),
    );
    parameters.insert(
        PARAMETER_NOTES.to_string(),
        json!(sub_matches.get_one::<String>(PARAMETER_NOTES)),
    );
    parameters.insert(
        PARAMETER_DOWNLOADED.to_string(),
        json!(sub_matches.get_one::<u64>(PARAMETER_DOWNLOADED)),
    );
    parameters.insert(
        PARAMETER_UPDATED.to_string(),
        json!(sub_matches.get_one::<u64>(PARAMETER_UPDATED)),
    );
    parameters.insert(
        PARAMETER_REGEX.to_string(),
        json!(sub_matches.get_one::<String>(PARAMETER_REGEX)),
    );
    drop_nulls(&mut parameters);
    Ok(parameters)
}

pub fn create_cleanup_policy(context: &Context, sub_matches: &ArgMatches) -> Result<(), CliError> {
    trace!("Executing cleanup-policy create command...");
    let policy = policy_from_parameters(collect_parameters(sub_matches)?)?;

    let client = context.client()?;
    let policy = client.cleanup_policies().create_or_update(&policy)?;
    print_record(&policy)
}

pub fn list_cleanup_policies(context: &Context, sub_matches: &ArgMatches) -> Result<(), CliError> {
    let client = context.client()?;
    let policies = client.cleanup_policies().list()?;
    print_listing(&policies, sub_matches)
}

pub fn show_cleanup_policy(context: &Context, sub_matches: &ArgMatches) -> Result<(), CliError> {
    let name = required::<String>(sub_matches, PARAMETER_NAME)?;
    let client = context.client()?;
    let policy = client.cleanup_policies().show(name)?;
    print_record(&policy)
}

pub fn delete_cleanup_policy(context: &Context, sub_matches: &ArgMatches) -> Result<(), CliError> {
    let name = required::<String>(sub_matches, PARAMETER_NAME)?;
    let client = context.client()?;
    client.cleanup_policies().delete(name)?;
    Ok(())
}

use crate::{
    actions::{print_listing, print_record, required, Context},
    commands::params::{
        PARAMETER_DESCRIPTION, PARAMETER_ID, PARAMETER_NAME, PARAMETER_PRIVILEGE, PARAMETER_ROLE,
    },
    error::CliError,
    model::RoleRequest,
};
use clap::ArgMatches;
use tracing::trace;

fn many(sub_matches: &ArgMatches, id: &str) -> Option<Vec<String>> {
    sub_matches
        .get_many::<String>(id)
        .map(|values| values.cloned().collect())
}

/// Replace the attributes of `role` given on the command line.
fn apply_arguments(role: &mut RoleRequest, sub_matches: &ArgMatches) {
    if let Some(name) = sub_matches.get_one::<String>(PARAMETER_NAME) {
        role.name = name.clone();
    }
    if let Some(description) = sub_matches.get_one::<String>(PARAMETER_DESCRIPTION) {
        role.description = description.clone();
    }
    if let Some(privileges) = many(sub_matches, PARAMETER_PRIVILEGE) {
        role.privileges = privileges;
    }
    if let Some(roles) = many(sub_matches, PARAMETER_ROLE) {
        role.roles = roles;
    }
}

fn new_role(sub_matches: &ArgMatches) -> Result<RoleRequest, CliError> {
    let id = required::<String>(sub_matches, PARAMETER_ID)?;
    let mut role = RoleRequest {
        id: id.clone(),
        name: id.clone(),
        description: String::new(),
        privileges: Vec::new(),
        roles: Vec::new(),
    };
    apply_arguments(&mut role, sub_matches);
    Ok(role)
}

pub fn list_roles(context: &Context, sub_matches: &ArgMatches) -> Result<(), CliError> {
    trace!("Executing security role list command...");
    let client = context.client()?;
    let roles = client.roles().list()?;
    print_listing(&roles, sub_matches)
}

pub fn show_role(context: &Context, sub_matches: &ArgMatches) -> Result<(), CliError> {
    let id = required::<String>(sub_matches, PARAMETER_ID)?;
    let client = context.client()?;
    let role = client.roles().show(id)?;
    print_record(&role)
}

pub fn create_role(context: &Context, sub_matches: &ArgMatches) -> Result<(), CliError> {
    let role = new_role(sub_matches)?;
    let client = context.client()?;
    let role = client.roles().create(&role)?;
    print_record(&role)
}

pub fn update_role(context: &Context, sub_matches: &ArgMatches) -> Result<(), CliError> {
    let id = required::<String>(sub_matches, PARAMETER_ID)?;
    let client = context.client()?;
    let roles = client.roles();

    let mut role = RoleRequest::from(&roles.show(id)?);
    apply_arguments(&mut role, sub_matches);
    let role = roles.update(id, &role)?;
    print_record(&role)
}

pub fn delete_role(context: &Context, sub_matches: &ArgMatches) -> Result<(), CliError> {
    let id = required::<String>(sub_matches, PARAMETER_ID)?;
    let client = context.client()?;
    client.roles().delete(id)?;
    Ok(())
}

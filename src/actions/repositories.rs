use crate::{
    actions::{is_interactive, print_listing, print_record, required, Context},
    api::repositories::{build_payload, RepositoryType, PARAMETER_RENAMES, UPPER_CASE_PARAMETERS},
    commands::params::*,
    error::CliError,
    payload::{rename_keys, upcase_values, Parameters},
};
use clap::ArgMatches;
use inquire::Confirm;
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::{debug, trace};

const STRING_PARAMETERS: &[&str] = &[
    PARAMETER_NAME,
    PARAMETER_BLOB_STORE_NAME,
    PARAMETER_WRITE_POLICY,
    PARAMETER_REMOTE_URL,
    PARAMETER_REMOTE_AUTH_TYPE,
    PARAMETER_REMOTE_USERNAME,
    PARAMETER_REMOTE_PASSWORD,
    PARAMETER_DISTRIBUTION,
    PARAMETER_PASSPHRASE,
    PARAMETER_INDEX_TYPE,
    PARAMETER_INDEX_URL,
    PARAMETER_VERSION_POLICY,
    PARAMETER_LAYOUT_POLICY,
    PARAMETER_DEPLOY_POLICY,
];

const NUMBER_PARAMETERS: &[&str] = &[
    PARAMETER_CONTENT_MAX_AGE,
    PARAMETER_METADATA_MAX_AGE,
    PARAMETER_NEGATIVE_CACHE_TTL,
    PARAMETER_HTTP_PORT,
    PARAMETER_HTTPS_PORT,
    PARAMETER_DEPTH,
];

const LIST_PARAMETERS: &[&str] = &[PARAMETER_CLEANUP_POLICY, PARAMETER_MEMBER_NAMES];

/// Flag pairs and the value used when neither flag is given
const FLAG_PARAMETERS: &[(&str, &str, bool)] = &[
    (PARAMETER_STRICT_CONTENT, PARAMETER_NO_STRICT_CONTENT, true),
    (PARAMETER_AUTO_BLOCK, PARAMETER_NO_AUTO_BLOCK, true),
    (PARAMETER_NEGATIVE_CACHE, PARAMETER_NO_NEGATIVE_CACHE, true),
    (PARAMETER_FLAT, PARAMETER_NO_FLAT, false),
    (PARAMETER_V1_ENABLED, PARAMETER_NO_V1_ENABLED, false),
    (PARAMETER_FORCE_BASIC_AUTH, PARAMETER_NO_FORCE_BASIC_AUTH, true),
    (PARAMETER_TRUST_STORE, PARAMETER_NO_TRUST_STORE, false),
];

fn parameter_key(id: &str) -> String {
    id.replace('-', "_")
}

fn is_defined(sub_matches: &ArgMatches, id: &str) -> bool {
    sub_matches.ids().any(|defined| defined.as_str() == id)
}

/// Flat parameter set of a `repository create` leaf command, keyed by snake_case names.
fn collect_parameters(sub_matches: &ArgMatches) -> Result<Parameters, CliError> {
    let mut parameters = Parameters::new();

    for id in STRING_PARAMETERS {
        if let Ok(Some(value)) = sub_matches.try_get_one::<String>(id) {
            parameters.insert(parameter_key(id), json!(value));
        }
    }
    for id in NUMBER_PARAMETERS {
        if let Ok(Some(value)) = sub_matches.try_get_one::<u64>(id) {
            parameters.insert(parameter_key(id), json!(value));
        }
    }
    for id in LIST_PARAMETERS {
        if let Ok(Some(values)) = sub_matches.try_get_many::<String>(id) {
            let values: Vec<&String> = values.collect();
            parameters.insert(parameter_key(id), json!(values));
        }
    }
    for (name, negated, default) in FLAG_PARAMETERS {
        if is_defined(sub_matches, name) {
            parameters.insert(
                parameter_key(name),
                json!(flag_value(sub_matches, name, negated, *default)),
            );
        }
    }

    // the signing key is sent as the content of the file
    if let Ok(Some(path)) = sub_matches.try_get_one::<PathBuf>(PARAMETER_GPG_KEYPAIR) {
        let keypair = std::fs::read_to_string(path).map_err(|cause| CliError::InputError {
            path: path.clone(),
            cause,
        })?;
        parameters.insert(parameter_key(PARAMETER_GPG_KEYPAIR), Value::String(keypair));
    }

    rename_keys(&mut parameters, PARAMETER_RENAMES);
    upcase_values(&mut parameters, UPPER_CASE_PARAMETERS);
    Ok(parameters)
}

fn create_repository(
    context: &Context,
    sub_matches: &ArgMatches,
    repository_type: RepositoryType,
) -> Result<(), CliError> {
    let recipe = required::<String>(sub_matches, PARAMETER_RECIPE)?;
    trace!("Creating {} {} repository", recipe, repository_type);

    let parameters = collect_parameters(sub_matches)?;
    let payload = build_payload(repository_type, recipe, &parameters)?;

    let client = context.client()?;
    let repository = client.repositories().create(repository_type, recipe, &payload)?;
    print_record(&repository)
}

pub fn create_group_repository(context: &Context, sub_matches: &ArgMatches) -> Result<(), CliError> {
    create_repository(context, sub_matches, RepositoryType::Group)
}

pub fn create_hosted_repository(context: &Context, sub_matches: &ArgMatches) -> Result<(), CliError> {
    create_repository(context, sub_matches, RepositoryType::Hosted)
}

pub fn create_proxy_repository(context: &Context, sub_matches: &ArgMatches) -> Result<(), CliError> {
    create_repository(context, sub_matches, RepositoryType::Proxy)
}

pub fn list_repositories(context: &Context, sub_matches: &ArgMatches) -> Result<(), CliError> {
    trace!("Executing repository list command...");
    let client = context.client()?;
    let repositories = client.repositories().list()?;
    print_listing(&repositories, sub_matches)
}

pub fn show_repository(context: &Context, sub_matches: &ArgMatches) -> Result<(), CliError> {
    let name = required::<String>(sub_matches, PARAMETER_NAME)?;
    let client = context.client()?;
    let repository = client.repositories().show(name)?;
    print_record(&repository)
}

pub fn delete_repository(context: &Context, sub_matches: &ArgMatches) -> Result<(), CliError> {
    let name = required::<String>(sub_matches, PARAMETER_NAME)?;

    if !sub_matches.get_flag(PARAMETER_YES) {
        if !is_interactive() {
            return Err(CliError::MissingRequiredArgument(format!(
                "--{} is required to delete repository {} without a terminal",
                PARAMETER_YES, name
            )));
        }
        let confirmed = Confirm::new(&format!(
            "Delete repository {} and all of its content?",
            name
        ))
        .with_default(false)
        .prompt()?;
        if !confirmed {
            return Err(CliError::Cancelled);
        }
    }

    debug!("Deleting repository {}", name);
    let client = context.client()?;
    client.repositories().delete(name)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::repository::repository_command;

    fn leaf_matches(args: &[&str]) -> ArgMatches {
        let mut full = vec!["repository", "create"];
        full.extend_from_slice(args);
        let matches = repository_command().get_matches_from(full);
        let (_, create) = matches.subcommand().unwrap();
        let (_, repository_type) = create.subcommand().unwrap();
        let (_, leaf) = repository_type.subcommand().unwrap();
        leaf.clone()
    }

    #[test]
    fn test_collect_hosted_maven_parameters() {
        let matches = leaf_matches(&[
            "hosted",
            "maven",
            "maven-releases",
            "--no-strict-content",
            "--write-policy",
            "ALLOW",
            "-c",
            "weekly",
        ]);
        let parameters = collect_parameters(&matches).unwrap();

        assert_eq!(parameters["name"], "maven-releases");
        assert_eq!(parameters["strict_content_type_validation"], false);
        assert_eq!(parameters["write_policy"], "ALLOW");
        assert_eq!(parameters["version_policy"], "RELEASE");
        assert_eq!(parameters["cleanup_policy"], json!(["weekly"]));
        assert!(!parameters.contains_key("strict_content"));
        assert!(!parameters.contains_key("auto_block"));
    }

    #[test]
    fn test_collect_docker_proxy_parameters() {
        let matches = leaf_matches(&[
            "proxy",
            "docker",
            "docker-hub",
            "https://registry-1.docker.io",
            "--index-type",
            "hub",
            "--trust-store",
            "--https-port",
            "8443",
        ]);
        let parameters = collect_parameters(&matches).unwrap();
        let payload = build_payload(RepositoryType::Proxy, "docker", &parameters).unwrap();

        assert_eq!(payload["proxy"]["remoteUrl"], "https://registry-1.docker.io");
        assert_eq!(payload["docker"]["httpsPort"], 8443);
        assert_eq!(payload["docker"]["forceBasicAuth"], true);
        assert_eq!(payload["dockerProxy"]["indexType"], "HUB");
        assert_eq!(payload["dockerProxy"]["useTrustStoreForIndexAccess"], true);
    }

    #[test]
    fn test_missing_keypair_file() {
        let matches = leaf_matches(&[
            "hosted",
            "apt",
            "apt-hosted",
            "--distribution",
            "bionic",
            "--gpg-keypair",
            "/nonexistent/keypair.asc",
        ]);
        assert!(matches!(
            collect_parameters(&matches),
            Err(CliError::InputError { .. })
        ));
    }
}

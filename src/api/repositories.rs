//! Repository management.
//!
//! Create requests are built from the flat parameter set collected by the
//! CLI: [`build_payload`] maps it onto the nested document the
//! `repositories/{format}/{type}` endpoints expect.

use crate::{
    api::Listing,
    client::{parse_json, validate_response, ApiError, NexusClient},
    model::{Repository, RepositorySummary},
    payload::{get_bool, get_str, get_str_list, get_u64, Parameters},
};
use serde_json::{json, Map, Value};
use tracing::{debug, trace};

pub const REPOSITORIES_ENDPOINT: &str = "repositories";

/// Recipes handled by the generic `recipe` command of each repository type
pub const GROUP_RECIPES: &[&str] = &["bower", "go", "npm", "nuget", "pypi", "r", "raw", "rubygems"];
pub const HOSTED_RECIPES: &[&str] = &[
    "bower", "gitlfs", "helm", "npm", "nuget", "pypi", "r", "raw", "rubygems",
];
pub const PROXY_RECIPES: &[&str] = &[
    "bower", "cocoapods", "conan", "conda", "go", "helm", "npm", "nuget", "p2", "pypi", "r",
    "raw", "rubygems",
];

pub const REMOTE_AUTH_TYPES: &[&str] = &["username"];
pub const WRITE_POLICIES: &[&str] = &["allow", "allow_once", "deny"];
pub const VERSION_POLICIES: &[&str] = &["release", "snapshot", "mixed"];
pub const LAYOUT_POLICIES: &[&str] = &["strict", "permissive"];
pub const DOCKER_INDEX_TYPES: &[&str] = &["registry", "hub", "custom"];

/// Shorthand flag names and the canonical field each one stands for
pub const PARAMETER_RENAMES: &[(&str, &str)] = &[
    ("negative_cache", "negative_cache_enabled"),
    ("strict_content", "strict_content_type_validation"),
    ("trust_store", "use_trust_store_for_index_access"),
];

/// Parameters whose values the server expects in upper case
pub const UPPER_CASE_PARAMETERS: &[&str] = &[
    "index_type",
    "layout_policy",
    "version_policy",
    "write_policy",
    "deploy_policy",
];

/// Repository type, the middle segment of the create command
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum RepositoryType {
    Group,
    Hosted,
    Proxy,
}

/// REST path segment for a recipe. Maven repositories report `maven2` but
/// the endpoints are keyed by `maven`.
pub fn rest_format(recipe: &str) -> &str {
    match recipe {
        "maven2" => "maven",
        other => other,
    }
}

/// Build the create/update body for a repository.
///
/// `parameters` must already carry canonical names and upper-cased enum
/// values; see [`PARAMETER_RENAMES`] and [`UPPER_CASE_PARAMETERS`].
pub fn build_payload(
    repository_type: RepositoryType,
    recipe: &str,
    parameters: &Parameters,
) -> Result<Value, ApiError> {
    let name = get_str(parameters, "name").ok_or_else(|| ApiError::InvalidParameter {
        name: "name".to_string(),
        reason: "a repository name is required".to_string(),
    })?;

    let mut body = Map::new();
    body.insert("name".to_string(), json!(name));
    body.insert("online".to_string(), json!(get_bool(parameters, "online", true)));

    let mut storage = Map::new();
    storage.insert(
        "blobStoreName".to_string(),
        json!(get_str(parameters, "blob_store_name").unwrap_or("default")),
    );
    storage.insert(
        "strictContentTypeValidation".to_string(),
        json!(get_bool(parameters, "strict_content_type_validation", true)),
    );
    if repository_type == RepositoryType::Hosted {
        storage.insert(
            "writePolicy".to_string(),
            json!(get_str(parameters, "write_policy").unwrap_or("ALLOW_ONCE")),
        );
    }
    body.insert("storage".to_string(), Value::Object(storage));

    let cleanup_policies = get_str_list(parameters, "cleanup_policy");
    if repository_type != RepositoryType::Group && !cleanup_policies.is_empty() {
        body.insert("cleanup".to_string(), json!({ "policyNames": cleanup_policies }));
    }

    match repository_type {
        RepositoryType::Group => {
            body.insert(
                "group".to_string(),
                json!({ "memberNames": get_str_list(parameters, "member_names") }),
            );
        }
        RepositoryType::Proxy => insert_proxy_sections(&mut body, parameters),
        RepositoryType::Hosted => {}
    }

    insert_format_sections(&mut body, repository_type, rest_format(recipe), parameters);

    trace!("Repository payload: {:?}", body);
    Ok(Value::Object(body))
}

fn insert_proxy_sections(body: &mut Map<String, Value>, parameters: &Parameters) {
    body.insert(
        "proxy".to_string(),
        json!({
            "remoteUrl": get_str(parameters, "remote_url"),
            "contentMaxAge": get_u64(parameters, "content_max_age").unwrap_or(1440),
            "metadataMaxAge": get_u64(parameters, "metadata_max_age").unwrap_or(1440),
        }),
    );
    body.insert(
        "negativeCache".to_string(),
        json!({
            "enabled": get_bool(parameters, "negative_cache_enabled", true),
            "timeToLive": get_u64(parameters, "negative_cache_ttl").unwrap_or(1440),
        }),
    );

    let mut http_client = Map::new();
    http_client.insert("blocked".to_string(), json!(false));
    http_client.insert(
        "autoBlock".to_string(),
        json!(get_bool(parameters, "auto_block", true)),
    );
    if let Some(auth_type) = get_str(parameters, "remote_auth_type") {
        http_client.insert(
            "authentication".to_string(),
            json!({
                "type": auth_type,
                "username": get_str(parameters, "remote_username").unwrap_or_default(),
                "password": get_str(parameters, "remote_password").unwrap_or_default(),
            }),
        );
    }
    body.insert("httpClient".to_string(), Value::Object(http_client));
}

fn insert_format_sections(
    body: &mut Map<String, Value>,
    repository_type: RepositoryType,
    format: &str,
    parameters: &Parameters,
) {
    match format {
        "maven" => {
            body.insert(
                "maven".to_string(),
                json!({
                    "versionPolicy": get_str(parameters, "version_policy").unwrap_or("RELEASE"),
                    "layoutPolicy": get_str(parameters, "layout_policy").unwrap_or("STRICT"),
                }),
            );
        }
        "docker" => {
            let mut docker = Map::new();
            docker.insert(
                "v1Enabled".to_string(),
                json!(get_bool(parameters, "v1_enabled", false)),
            );
            docker.insert(
                "forceBasicAuth".to_string(),
                json!(get_bool(parameters, "force_basic_auth", true)),
            );
            if let Some(port) = get_u64(parameters, "http_port") {
                docker.insert("httpPort".to_string(), json!(port));
            }
            if let Some(port) = get_u64(parameters, "https_port") {
                docker.insert("httpsPort".to_string(), json!(port));
            }
            body.insert("docker".to_string(), Value::Object(docker));

            if repository_type == RepositoryType::Proxy {
                let mut docker_proxy = Map::new();
                docker_proxy.insert(
                    "indexType".to_string(),
                    json!(get_str(parameters, "index_type").unwrap_or("REGISTRY")),
                );
                if let Some(index_url) = get_str(parameters, "index_url") {
                    docker_proxy.insert("indexUrl".to_string(), json!(index_url));
                }
                docker_proxy.insert(
                    "useTrustStoreForIndexAccess".to_string(),
                    json!(get_bool(parameters, "use_trust_store_for_index_access", false)),
                );
                body.insert("dockerProxy".to_string(), Value::Object(docker_proxy));
            }
        }
        "apt" => {
            let mut apt = Map::new();
            apt.insert(
                "distribution".to_string(),
                json!(get_str(parameters, "distribution")),
            );
            if repository_type == RepositoryType::Proxy {
                apt.insert("flat".to_string(), json!(get_bool(parameters, "flat", false)));
            }
            body.insert("apt".to_string(), Value::Object(apt));

            if repository_type == RepositoryType::Hosted {
                body.insert(
                    "aptSigning".to_string(),
                    json!({
                        "keypair": get_str(parameters, "gpg_keypair"),
                        "passphrase": get_str(parameters, "passphrase"),
                    }),
                );
            }
        }
        "yum" if repository_type == RepositoryType::Hosted => {
            body.insert(
                "yum".to_string(),
                json!({
                    "repodataDepth": get_u64(parameters, "depth").unwrap_or(0),
                    "deployPolicy": get_str(parameters, "deploy_policy").unwrap_or("STRICT"),
                }),
            );
        }
        _ => {}
    }
}

pub struct RepositoryCollection<'a> {
    client: &'a NexusClient,
    listing: Listing<RepositorySummary>,
}

impl<'a> RepositoryCollection<'a> {
    pub fn new(client: &'a NexusClient) -> RepositoryCollection<'a> {
        RepositoryCollection {
            client,
            listing: Listing::new(),
        }
    }

    /// Fetch the listing from the server, bypassing the cached one.
    pub fn raw_list(&self) -> Result<Vec<RepositorySummary>, ApiError> {
        let response = self.client.get(REPOSITORIES_ENDPOINT)?;
        parse_json(response, "list repositories", REPOSITORIES_ENDPOINT)
    }

    pub fn list(&self) -> Result<Vec<RepositorySummary>, ApiError> {
        self.listing.get_or_fetch(|| self.raw_list())
    }

    pub fn get_by_name(&self, name: &str) -> Result<RepositorySummary, ApiError> {
        self.list()?
            .into_iter()
            .find(|repository| repository.name == name)
            .ok_or_else(|| ApiError::NotFound {
                resource: format!("repository {}", name),
            })
    }

    fn endpoint_for(summary: &RepositorySummary) -> String {
        format!(
            "{}/{}/{}/{}",
            REPOSITORIES_ENDPOINT,
            rest_format(&summary.format),
            summary.repository_type,
            summary.name
        )
    }

    /// Full settings of the repository called `name`.
    pub fn show(&self, name: &str) -> Result<Repository, ApiError> {
        let summary = self.get_by_name(name)?;
        let response = self.client.get(&Self::endpoint_for(&summary))?;
        parse_json(
            response,
            "show repository",
            &format!("repository {}", name),
        )
    }

    /// Create a repository from a body made by [`build_payload`].
    pub fn create(
        &self,
        repository_type: RepositoryType,
        recipe: &str,
        payload: &Value,
    ) -> Result<Repository, ApiError> {
        let name = payload
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let endpoint = format!(
            "{}/{}/{}",
            REPOSITORIES_ENDPOINT,
            rest_format(recipe),
            repository_type
        );

        debug!("Creating {} {} repository {}", recipe, repository_type, name);
        let response = self.client.post_json(&endpoint, payload)?;
        validate_response(
            response,
            "create repository",
            &format!("repository format {}", recipe),
            &[200, 201, 204],
        )?;

        self.listing.reset();
        self.show(&name)
    }

    /// Replace the settings of an existing repository.
    pub fn update(&self, name: &str, payload: &Value) -> Result<Repository, ApiError> {
        let summary = self.get_by_name(name)?;
        let response = self.client.put_json(&Self::endpoint_for(&summary), payload)?;
        validate_response(
            response,
            "update repository",
            &format!("repository {}", name),
            &[200, 204],
        )?;

        self.listing.reset();
        self.show(name)
    }

    pub fn delete(&self, name: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(&format!("{}/{}", REPOSITORIES_ENDPOINT, name))?;
        let result = validate_response(
            response,
            "delete repository",
            &format!("repository {}", name),
            &[204],
        );
        self.listing.reset();
        result.map(|_| ())
    }
}

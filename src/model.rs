//! Records exchanged with the Nexus REST API.
//!
//! Field names follow the server's camelCase representation. Documents whose
//! shape depends on the repository recipe keep unknown fields so that `show`
//! prints everything the server sent.

use crate::format::CsvRecordProducer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A security role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    #[serde(default)]
    pub source: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub privileges: Vec<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Body of a role create or update request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRequest {
    pub id: String,
    pub name: String,
    pub description: String,
    pub privileges: Vec<String>,
    pub roles: Vec<String>,
}

impl From<&Role> for RoleRequest {
    fn from(role: &Role) -> Self {
        RoleRequest {
            id: role.id.clone(),
            name: role.name.clone(),
            description: role.description.clone(),
            privileges: role.privileges.clone(),
            roles: role.roles.clone(),
        }
    }
}

impl CsvRecordProducer for Role {
    fn csv_header() -> Vec<String> {
        vec![
            "ID".to_string(),
            "SOURCE".to_string(),
            "NAME".to_string(),
            "DESCRIPTION".to_string(),
            "READ_ONLY".to_string(),
        ]
    }

    fn as_csv_records(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.id.clone(),
            self.source.clone(),
            self.name.clone(),
            self.description.clone(),
            self.read_only.to_string(),
        ]]
    }
}

/// One entry of the repository listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySummary {
    pub name: String,
    pub format: String,
    #[serde(rename = "type")]
    pub repository_type: String,
    #[serde(default)]
    pub url: String,
}

impl CsvRecordProducer for RepositorySummary {
    fn csv_header() -> Vec<String> {
        vec![
            "NAME".to_string(),
            "FORMAT".to_string(),
            "TYPE".to_string(),
            "URL".to_string(),
        ]
    }

    fn as_csv_records(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.name.clone(),
            self.format.clone(),
            self.repository_type.clone(),
            self.url.clone(),
        ]]
    }
}

/// Full settings document of a repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub name: String,
    #[serde(default)]
    pub format: String,
    #[serde(default, rename = "type")]
    pub repository_type: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub online: bool,
    /// Recipe-specific sections such as `storage`, `proxy` or `docker`
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// A cleanup policy in the flat REST representation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupPolicy {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Days since the last download
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria_last_downloaded: Option<u64>,
    /// Days since the blob was last updated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria_last_blob_updated: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria_release_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria_asset_regex: Option<String>,
}

impl CsvRecordProducer for CleanupPolicy {
    fn csv_header() -> Vec<String> {
        vec![
            "NAME".to_string(),
            "FORMAT".to_string(),
            "DOWNLOADED".to_string(),
            "UPDATED".to_string(),
            "REGEX".to_string(),
            "NOTES".to_string(),
        ]
    }

    fn as_csv_records(&self) -> Vec<Vec<String>> {
        let days = |value: Option<u64>| value.map(|v| v.to_string()).unwrap_or_default();
        vec![vec![
            self.name.clone(),
            self.format.clone().unwrap_or_default(),
            days(self.criteria_last_downloaded),
            days(self.criteria_last_blob_updated),
            self.criteria_asset_regex.clone().unwrap_or_default(),
            self.notes.clone().unwrap_or_default(),
        ]]
    }
}

/// A stored Groovy script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type", default = "default_script_type")]
    pub script_type: String,
}

pub const DEFAULT_SCRIPT_TYPE: &str = "groovy";

fn default_script_type() -> String {
    DEFAULT_SCRIPT_TYPE.to_string()
}

impl CsvRecordProducer for Script {
    fn csv_header() -> Vec<String> {
        vec!["NAME".to_string(), "TYPE".to_string()]
    }

    fn as_csv_records(&self) -> Vec<Vec<String>> {
        vec![vec![self.name.clone(), self.script_type.clone()]]
    }
}

/// Output of a script run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptResult {
    pub name: String,
    #[serde(default)]
    pub result: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Checksum {
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub md5: Option<String>,
}

/// A file stored in a repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub repository: String,
    /// Path below the repository, without a leading slash
    pub path: String,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub checksum: Checksum,
    #[serde(default)]
    pub file_size: Option<u64>,
}

impl Asset {
    /// `repository/path`, as accepted by the file commands.
    pub fn repository_path(&self) -> String {
        format!("{}/{}", self.repository, self.path.trim_start_matches('/'))
    }
}

impl CsvRecordProducer for Asset {
    fn csv_header() -> Vec<String> {
        vec!["PATH".to_string(), "SIZE".to_string(), "SHA1".to_string()]
    }

    fn as_csv_records(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.repository_path(),
            self.file_size.map(|size| size.to_string()).unwrap_or_default(),
            self.checksum.sha1.clone().unwrap_or_default(),
        ]]
    }
}

/// One page of the asset listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPage {
    #[serde(default)]
    pub items: Vec<Asset>,
    #[serde(default)]
    pub continuation_token: Option<String>,
}

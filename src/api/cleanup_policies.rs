//! Cleanup policies.

use crate::{
    api::Listing,
    client::{parse_json, validate_response, ApiError, NexusClient},
    model::CleanupPolicy,
    payload::{get_str, get_u64, move_to_key, rename_keys, Parameters},
};
use serde_json::Value;
use tracing::debug;

pub const CLEANUP_POLICIES_ENDPOINT: &str = "cleanup-policies";

/// Parameters grouped under `criteria` before a policy is built
pub const CRITERIA_PARAMETERS: &[&str] = &["downloaded", "updated", "regex"];

pub const CRITERIA_RENAMES: &[(&str, &str)] = &[
    ("downloaded", "lastDownloaded"),
    ("updated", "lastBlobUpdated"),
    ("regex", "regex"),
];

/// Build a policy from the flat parameters collected by the CLI.
///
/// `downloaded`, `updated` and `regex` are grouped under `criteria` with
/// their canonical names, then spread onto the REST fields. Ages are days.
pub fn policy_from_parameters(mut parameters: Parameters) -> Result<CleanupPolicy, ApiError> {
    move_to_key(&mut parameters, "criteria", CRITERIA_PARAMETERS);

    let mut criteria = match parameters.remove("criteria") {
        Some(Value::Object(criteria)) => criteria,
        _ => Parameters::new(),
    };
    rename_keys(&mut criteria, CRITERIA_RENAMES);

    let name = get_str(&parameters, "name")
        .ok_or_else(|| ApiError::InvalidParameter {
            name: "name".to_string(),
            reason: "a cleanup policy name is required".to_string(),
        })?
        .to_string();

    Ok(CleanupPolicy {
        name,
        notes: get_str(&parameters, "notes").map(str::to_string),
        format: get_str(&parameters, "format").map(str::to_string),
        criteria_last_downloaded: get_u64(&criteria, "lastDownloaded"),
        criteria_last_blob_updated: get_u64(&criteria, "lastBlobUpdated"),
        criteria_release_type: None,
        criteria_asset_regex: get_str(&criteria, "regex").map(str::to_string),
    })
}

pub struct CleanupPolicyCollection<'a> {
    client: &'a NexusClient,
    listing: Listing<CleanupPolicy>,
}

impl<'a> CleanupPolicyCollection<'a> {
    pub fn new(client: &'a NexusClient) -> CleanupPolicyCollection<'a> {
        CleanupPolicyCollection {
            client,
            listing: Listing::new(),
        }
    }

    fn endpoint_for(name: &str) -> String {
        format!("{}/{}", CLEANUP_POLICIES_ENDPOINT, name)
    }

    pub fn raw_list(&self) -> Result<Vec<CleanupPolicy>, ApiError> {
        let response = self.client.get(CLEANUP_POLICIES_ENDPOINT)?;
        parse_json(response, "list cleanup policies", CLEANUP_POLICIES_ENDPOINT)
    }

    pub fn list(&self) -> Result<Vec<CleanupPolicy>, ApiError> {
        self.listing.get_or_fetch(|| self.raw_list())
    }

    pub fn show(&self, name: &str) -> Result<CleanupPolicy, ApiError> {
        let response = self.client.get(&Self::endpoint_for(name))?;
        parse_json(
            response,
            "show cleanup policy",
            &format!("cleanup policy {}", name),
        )
    }

    /// Create the policy, or replace it when one with the same name exists.
    pub fn create_or_update(&self, policy: &CleanupPolicy) -> Result<CleanupPolicy, ApiError> {
        let exists = self.list()?.iter().any(|p| p.name == policy.name);
        let resource = format!("cleanup policy {}", policy.name);

        let response = if exists {
            debug!("Updating cleanup policy {}", policy.name);
            self.client.put_json(&Self::endpoint_for(&policy.name), policy)?
        } else {
            debug!("Creating cleanup policy {}", policy.name);
            self.client.post_json(CLEANUP_POLICIES_ENDPOINT, policy)?
        };
        validate_response(
            response,
            "create cleanup policy",
            &resource,
            &[200, 201, 204],
        )?;

        self.listing.reset();
        self.show(&policy.name)
    }

    pub fn delete(&self, name: &str) -> Result<(), ApiError> {
        let response = self.client.delete(&Self::endpoint_for(name))?;
        let result = validate_response(
            response,
            "delete cleanup policy",
            &format!("cleanup policy {}", name),
            &[200, 204],
        );
        self.listing.reset();
        result.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::settings_for;
    use httpmock::prelude::*;
    use serde_json::json;

    fn parameters(value: Value) -> Parameters {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_policy_from_parameters() {
        let policy = policy_from_parameters(parameters(json!({
            "name": "stale",
            "format": "npm",
            "downloaded": 30,
            "updated": 90,
            "regex": ".*-SNAPSHOT.*",
            "notes": "weekly"
        })))
        .unwrap();

        assert_eq!(
            serde_json::to_value(&policy).unwrap(),
            json!({
                "name": "stale",
                "notes": "weekly",
                "format": "npm",
                "criteriaLastDownloaded": 30,
                "criteriaLastBlobUpdated": 90,
                "criteriaAssetRegex": ".*-SNAPSHOT.*"
            })
        );
    }

    #[test]
    fn test_create_posts_new_policy() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/service/rest/v1/cleanup-policies");
            then.status(200).json_body(json!([]));
        });
        let create = server.mock(|when, then| {
            when.method(POST)
                .path("/service/rest/v1/cleanup-policies")
                .json_body(json!({"name": "stale", "criteriaLastDownloaded": 7}));
            then.status(201);
        });
        server.mock(|when, then| {
            when.method(GET).path("/service/rest/v1/cleanup-policies/stale");
            then.status(200)
                .json_body(json!({"name": "stale", "format": "ALL_FORMATS", "criteriaLastDownloaded": 7}));
        });

        let client = NexusClient::new(settings_for(&server.base_url())).unwrap();
        let policy = CleanupPolicy {
            name: "stale".to_string(),
            criteria_last_downloaded: Some(7),
            ..Default::default()
        };

        let created = client.cleanup_policies().create_or_update(&policy).unwrap();
        assert_eq!(created.format.as_deref(), Some("ALL_FORMATS"));
        create.assert();
    }

    #[test]
    fn test_create_updates_existing_policy() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/service/rest/v1/cleanup-policies");
            then.status(200).json_body(json!([{"name": "stale"}]));
        });
        let update = server.mock(|when, then| {
            when.method(PUT).path("/service/rest/v1/cleanup-policies/stale");
            then.status(204);
        });
        server.mock(|when, then| {
            when.method(GET).path("/service/rest/v1/cleanup-policies/stale");
            then.status(200).json_body(json!({"name": "stale"}));
        });

        let client = NexusClient::new(settings_for(&server.base_url())).unwrap();
        let policy = CleanupPolicy {
            name: "stale".to_string(),
            ..Default::default()
        };

        client.cleanup_policies().create_or_update(&policy).unwrap();
        update.assert();
    }

    #[test]
    fn test_delete_surfaces_server_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(DELETE).path("/service/rest/v1/cleanup-policies/busy");
            then.status(400).body("policy is in use");
        });

        let client = NexusClient::new(settings_for(&server.base_url())).unwrap();
        match client.cleanup_policies().delete("busy") {
            Err(ApiError::Action { status, body, .. }) => {
                assert_eq!(status, 400);
                assert_eq!(body, "policy is in use");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}

//! Assets, the files stored in a repository.

use crate::{
    client::{parse_json, validate_response, ApiError, NexusClient},
    model::{Asset, AssetPage},
};
use tracing::{debug, trace};

pub const ASSETS_ENDPOINT: &str = "assets";

/// True when `asset_path` is `path` itself or lies under the directory `path`.
fn is_at_or_below(asset_path: &str, path: &str) -> bool {
    let asset_path = asset_path.trim_start_matches('/');
    if path.is_empty() || asset_path == path {
        return true;
    }
    asset_path
        .strip_prefix(path)
        .is_some_and(|rest| rest.starts_with('/'))
}

pub struct AssetCollection<'a> {
    client: &'a NexusClient,
}

impl<'a> AssetCollection<'a> {
    pub fn new(client: &'a NexusClient) -> AssetCollection<'a> {
        AssetCollection { client }
    }

    /// Every asset of `repository`, following continuation tokens.
    pub fn list(&self, repository: &str) -> Result<Vec<Asset>, ApiError> {
        let mut assets = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut query = vec![("repository", repository)];
            if let Some(token) = continuation_token.as_deref() {
                query.push(("continuationToken", token));
            }

            let response = self.client.get_with_query(ASSETS_ENDPOINT, &query)?;
            let page: AssetPage = parse_json(
                response,
                "list assets",
                &format!("repository {}", repository),
            )?;
            trace!("Fetched {} assets from {}", page.items.len(), repository);
            assets.extend(page.items);

            match page.continuation_token {
                Some(token) if !token.is_empty() => continuation_token = Some(token),
                _ => break,
            }
        }

        debug!("Repository {} holds {} assets", repository, assets.len());
        Ok(assets)
    }

    /// Assets of `repository` at `path` or below the directory `path`.
    /// An empty `path` selects the whole repository.
    pub fn list_prefix(&self, repository: &str, path: &str) -> Result<Vec<Asset>, ApiError> {
        let path = path.trim_matches('/');
        Ok(self
            .list(repository)?
            .into_iter()
            .filter(|asset| is_at_or_below(&asset.path, path))
            .collect())
    }

    pub fn delete(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(&format!("{}/{}", ASSETS_ENDPOINT, id))?;
        validate_response(response, "delete asset", &format!("asset {}", id), &[204])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::settings_for;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn test_list_follows_continuation_tokens() {
        let server = MockServer::start();
        let first = server.mock(|when, then| {
            when.method(GET)
                .path("/service/rest/v1/assets")
                .query_param("repository", "raw-hosted")
                .query_param_missing("continuationToken");
            then.status(200).json_body(json!({
                "items": [{"id": "1", "repository": "raw-hosted", "path": "a/b/file1"}],
                "continuationToken": "next"
            }));
        });
        let second = server.mock(|when, then| {
            when.method(GET)
                .path("/service/rest/v1/assets")
                .query_param("repository", "raw-hosted")
                .query_param("continuationToken", "next");
            then.status(200).json_body(json!({
                "items": [{"id": "2", "repository": "raw-hosted", "path": "c/file2"}],
                "continuationToken": null
            }));
        });

        let client = NexusClient::new(settings_for(&server.base_url())).unwrap();
        let assets = client.assets().list("raw-hosted").unwrap();
        assert_eq!(assets.len(), 2);
        first.assert();
        second.assert();

        let assets = client.assets().list_prefix("raw-hosted", "/a/").unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].path, "a/b/file1");
    }

    #[test]
    fn test_is_at_or_below() {
        assert!(is_at_or_below("docs/one.txt", "docs"));
        assert!(is_at_or_below("/docs/sub/two.txt", "docs"));
        assert!(is_at_or_below("docs/one.txt", "docs/one.txt"));
        assert!(is_at_or_below("anything/at/all", ""));
        assert!(!is_at_or_below("docs-archive/secret.txt", "docs"));
        assert!(!is_at_or_below("docs", "docs/one.txt"));
    }

    #[test]
    fn test_list_prefix_stops_at_directory_boundary() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/service/rest/v1/assets")
                .query_param("repository", "raw");
            then.status(200).json_body(json!({
                "items": [
                    {"id": "1", "repository": "raw", "path": "docs/one.txt"},
                    {"id": "2", "repository": "raw", "path": "docs-archive/secret.txt"},
                    {"id": "3", "repository": "raw", "path": "docs/sub/two.txt"}
                ],
                "continuationToken": null
            }));
        });

        let client = NexusClient::new(settings_for(&server.base_url())).unwrap();
        let paths = |prefix: &str| -> Vec<String> {
            client
                .assets()
                .list_prefix("raw", prefix)
                .unwrap()
                .into_iter()
                .map(|asset| asset.path)
                .collect()
        };

        assert_eq!(paths("docs"), vec!["docs/one.txt", "docs/sub/two.txt"]);
        assert_eq!(paths("docs/"), vec!["docs/one.txt", "docs/sub/two.txt"]);
        assert_eq!(paths("docs/one.txt"), vec!["docs/one.txt"]);
        assert_eq!(paths("").len(), 3);
    }

    #[test]
    fn test_list_unknown_repository() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/service/rest/v1/assets");
            then.status(404).body("Repository not found");
        });

        let client = NexusClient::new(settings_for(&server.base_url())).unwrap();
        assert!(matches!(
            client.assets().list("ghost"),
            Err(ApiError::NotFound { .. })
        ));
    }
}

//! HTTP client for the Nexus REST API.
//!
//! [`NexusClient`] wraps a blocking `reqwest` client configured from
//! [`Settings`]: basic-auth credentials on every request, certificate
//! verification per `x509_verify`, and URLs rooted at
//! `<url>service/rest/<api_version>/` for the REST API and
//! `<url>repository/` for repository content.

use crate::configuration::Settings;
use reqwest::{
    blocking::{Body, Client, RequestBuilder, Response},
    header::{CONTENT_TYPE, SERVER},
    StatusCode,
};
use semver::Version;
use serde::{de::DeserializeOwned, Serialize};
use std::{cell::OnceCell, time::Duration};
use tracing::{debug, error, trace};
use url::Url;

pub const SERVICE_PATH: &str = "service/rest";
pub const CONTENT_PATH: &str = "repository";
pub const STATUS_ENDPOINT: &str = "status";
pub const USER_AGENT: &str = concat!("nexus3-cli/", env!("CARGO_PKG_VERSION"));

/// Transfers of large artifacts share the request timeout, so keep it generous.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 1800;

/// Error emitted by the Nexus API layer
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("{resource} not found")]
    NotFound { resource: String },
    #[error("{operation} failed with status {status}: {body}")]
    Action {
        operation: String,
        status: u16,
        body: String,
    },
    #[error("{operation} requires Nexus {required} or newer; the server is {actual}")]
    UnsupportedVersion {
        operation: String,
        required: Version,
        actual: Version,
    },
    #[error("could not determine the Nexus version from the Server header {0:?}")]
    UnknownServerVersion(Option<String>),
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },
    #[error("{operation} is unavailable: groovy_enabled is false")]
    GroovyDisabled { operation: String },
}

/// Extract `3.67.0` from a `Server: Nexus/3.67.0-03 (OSS)` header value.
pub fn parse_server_version(header: &str) -> Option<Version> {
    let product = header.split_whitespace().find(|p| p.starts_with("Nexus/"))?;
    let version = product.trim_start_matches("Nexus/");
    let release = version.split('-').next()?;
    Version::parse(release).ok()
}

/// Fail with [`ApiError::UnsupportedVersion`] when `actual` is older than `required`.
pub fn check_min_version(operation: &str, required: &str, actual: &Version) -> Result<(), ApiError> {
    // `required` is always a literal from the collections
    let required = Version::parse(required).unwrap_or_else(|_| Version::new(u64::MAX, 0, 0));
    if *actual < required {
        return Err(ApiError::UnsupportedVersion {
            operation: operation.to_string(),
            required,
            actual: actual.clone(),
        });
    }
    Ok(())
}

/// Turn an unexpected response into an error, keeping the server's body verbatim.
pub fn error_for_response(response: Response, operation: &str, resource: &str) -> ApiError {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return ApiError::NotFound {
            resource: resource.to_string(),
        };
    }

    let body = response.text().unwrap_or_default();
    error!("{} failed with status {}: {}", operation, status, body);
    ApiError::Action {
        operation: operation.to_string(),
        status: status.as_u16(),
        body,
    }
}

/// Accept the response only when its status is one of `accepted`.
pub fn validate_response(
    response: Response,
    operation: &str,
    resource: &str,
    accepted: &[u16],
) -> Result<Response, ApiError> {
    if accepted.contains(&response.status().as_u16()) {
        Ok(response)
    } else {
        Err(error_for_response(response, operation, resource))
    }
}

/// Deserialize a successful JSON response.
pub fn parse_json<T>(response: Response, operation: &str, resource: &str) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    if !response.status().is_success() {
        return Err(error_for_response(response, operation, resource));
    }

    let response_text = response.text()?;
    trace!("Raw response text for deserialization: {}", response_text);

    match serde_json::from_str::<T>(&response_text) {
        Ok(result) => Ok(result),
        Err(e) => {
            error!(
                "Failed to deserialize response: {}. Raw response: {}",
                e, response_text
            );
            Err(ApiError::JsonError(e))
        }
    }
}

/// Blocking client bound to one Nexus server
pub struct NexusClient {
    http: Client,
    settings: Settings,
    base_url: Url,
    server_version: OnceCell<Version>,
}

impl NexusClient {
    pub fn new(settings: Settings) -> Result<NexusClient, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS))
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(!settings.x509_verify())
            .build()?;
        let base_url = Url::parse(settings.url())?;

        Ok(NexusClient {
            http,
            settings,
            base_url,
            server_version: OnceCell::new(),
        })
    }

    /// Use `version` instead of asking the server.
    pub fn with_server_version(self, version: Version) -> NexusClient {
        let server_version = OnceCell::new();
        let _ = server_version.set(version);
        NexusClient {
            server_version,
            ..self
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// `<url>` followed by `segments`, each one percent-encoded on its own so
    /// that `#`, `?` and `%` in names stay part of the path.
    fn url_with_segments<'s>(
        &self,
        segments: impl IntoIterator<Item = &'s str>,
    ) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;
            path.pop_if_empty();
            path.extend(segments.into_iter().filter(|segment| !segment.is_empty()));
        }
        Ok(url)
    }

    /// `<url>service/rest/<api_version>/<endpoint>`
    pub fn rest_url(&self, endpoint: &str) -> Result<Url, ApiError> {
        let api_version = self.settings.api_version().to_string();
        self.url_with_segments(
            SERVICE_PATH
                .split('/')
                .chain(std::iter::once(api_version.as_str()))
                .chain(endpoint.split('/')),
        )
    }

    /// `<url>repository/<repository>/<path>`
    pub fn content_url(&self, repository_path: &str) -> Result<Url, ApiError> {
        self.url_with_segments(std::iter::once(CONTENT_PATH).chain(repository_path.split('/')))
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let (username, password) = self.settings.auth();
        let request = request.basic_auth(username, Some(password)).build()?;
        let method = request.method().clone();
        let url = request.url().clone();

        let response = self.http.execute(request)?;
        debug!("{} {} -> {}", method, url, response.status());
        Ok(response)
    }

    pub fn get(&self, endpoint: &str) -> Result<Response, ApiError> {
        self.send(self.http.get(self.rest_url(endpoint)?))
    }

    pub fn get_with_query(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<Response, ApiError> {
        self.send(self.http.get(self.rest_url(endpoint)?).query(query))
    }

    pub fn post_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<Response, ApiError> {
        self.send(self.http.post(self.rest_url(endpoint)?).json(body))
    }

    pub fn post_text(&self, endpoint: &str, body: String) -> Result<Response, ApiError> {
        self.send(
            self.http
                .post(self.rest_url(endpoint)?)
                .header(CONTENT_TYPE, "text/plain")
                .body(body),
        )
    }

    pub fn put_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<Response, ApiError> {
        self.send(self.http.put(self.rest_url(endpoint)?).json(body))
    }

    pub fn delete(&self, endpoint: &str) -> Result<Response, ApiError> {
        self.send(self.http.delete(self.rest_url(endpoint)?))
    }

    /// Upload raw content to `repository/path`.
    pub fn put_content<B: Into<Body>>(
        &self,
        repository_path: &str,
        body: B,
    ) -> Result<Response, ApiError> {
        self.send(self.http.put(self.content_url(repository_path)?).body(body))
    }

    /// Fetch raw content from `repository/path`.
    pub fn get_content(&self, repository_path: &str) -> Result<Response, ApiError> {
        self.send(self.http.get(self.content_url(repository_path)?))
    }

    /// Nexus version, read once from the `Server` header of the status endpoint.
    pub fn server_version(&self) -> Result<&Version, ApiError> {
        if let Some(version) = self.server_version.get() {
            return Ok(version);
        }

        let response = self.get(STATUS_ENDPOINT)?;
        let header = response
            .headers()
            .get(SERVER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let version = header
            .as_deref()
            .and_then(parse_server_version)
            .ok_or(ApiError::UnknownServerVersion(header.clone()))?;

        debug!("Detected Nexus version {}", version);
        Ok(self.server_version.get_or_init(|| version))
    }

    /// Guard run before an operation that needs at least `required`.
    pub fn require_version(&self, operation: &str, required: &str) -> Result<(), ApiError> {
        check_min_version(operation, required, self.server_version()?)
    }

    /// Guard run before any script operation.
    pub fn require_groovy(&self, operation: &str) -> Result<(), ApiError> {
        if self.settings.groovy_enabled() {
            Ok(())
        } else {
            Err(ApiError::GroovyDisabled {
                operation: operation.to_string(),
            })
        }
    }
}

//! Groovy scripts stored on the server.
//!
//! Scripting is disabled by default on recent Nexus releases, so every call
//! is refused up front when `groovy_enabled` is off.

use crate::{
    api::Listing,
    client::{parse_json, validate_response, ApiError, NexusClient},
    model::{Script, ScriptResult},
};
use tracing::debug;

pub const SCRIPTS_ENDPOINT: &str = "script";

pub struct ScriptCollection<'a> {
    client: &'a NexusClient,
    listing: Listing<Script>,
}

impl<'a> ScriptCollection<'a> {
    pub fn new(client: &'a NexusClient) -> ScriptCollection<'a> {
        ScriptCollection {
            client,
            listing: Listing::new(),
        }
    }

    fn endpoint_for(name: &str) -> String {
        format!("{}/{}", SCRIPTS_ENDPOINT, name)
    }

    pub fn raw_list(&self) -> Result<Vec<Script>, ApiError> {
        self.client.require_groovy("script list")?;
        let response = self.client.get(SCRIPTS_ENDPOINT)?;
        parse_json(response, "list scripts", SCRIPTS_ENDPOINT)
    }

    pub fn list(&self) -> Result<Vec<Script>, ApiError> {
        self.listing.get_or_fetch(|| self.raw_list())
    }

    pub fn show(&self, name: &str) -> Result<Script, ApiError> {
        self.client.require_groovy("script show")?;
        let response = self.client.get(&Self::endpoint_for(name))?;
        parse_json(response, "show script", &format!("script {}", name))
    }

    /// Store a new script. The server answers with an empty body, so the
    /// stored script is read back.
    pub fn create(&self, script: &Script) -> Result<Script, ApiError> {
        self.client.require_groovy("script create")?;
        debug!("Creating script {}", script.name);
        let response = self.client.post_json(SCRIPTS_ENDPOINT, script)?;
        validate_response(
            response,
            "create script",
            &format!("script {}", script.name),
            &[200, 204],
        )?;
        self.listing.reset();
        self.show(&script.name)
    }

    pub fn update(&self, script: &Script) -> Result<Script, ApiError> {
        self.client.require_groovy("script update")?;
        let response = self
            .client
            .put_json(&Self::endpoint_for(&script.name), script)?;
        validate_response(
            response,
            "update script",
            &format!("script {}", script.name),
            &[200, 204],
        )?;
        self.listing.reset();
        self.show(&script.name)
    }

    pub fn delete(&self, name: &str) -> Result<(), ApiError> {
        self.client.require_groovy("script delete")?;
        let response = self.client.delete(&Self::endpoint_for(name))?;
        let result = validate_response(
            response,
            "delete script",
            &format!("script {}", name),
            &[204],
        );
        self.listing.reset();
        result.map(|_| ())
    }

    /// Run the stored script `name`, passing `arguments` as the request body.
    pub fn run(&self, name: &str, arguments: &str) -> Result<ScriptResult, ApiError> {
        self.client.require_groovy("script run")?;
        debug!("Running script {}", name);
        let response = self
            .client
            .post_text(&format!("{}/run", Self::endpoint_for(name)), arguments.to_string())?;
        parse_json(response, "run script", &format!("script {}", name))
    }
}

//! Security roles. The roles endpoints exist from Nexus 3.68.1 on; every
//! operation checks the server version before it sends its request.

use crate::{
    api::Listing,
    client::{parse_json, validate_response, ApiError, NexusClient},
    model::{Role, RoleRequest},
};
use tracing::debug;

pub const ROLES_ENDPOINT: &str = "security/roles";
pub const ROLES_MIN_VERSION: &str = "3.68.1";

pub struct RoleCollection<'a> {
    client: &'a NexusClient,
    listing: Listing<Role>,
}

impl<'a> RoleCollection<'a> {
    pub fn new(client: &'a NexusClient) -> RoleCollection<'a> {
        RoleCollection {
            client,
            listing: Listing::new(),
        }
    }

    fn require_version(&self, operation: &str) -> Result<(), ApiError> {
        self.client.require_version(operation, ROLES_MIN_VERSION)
    }

    fn endpoint_for(id: &str) -> String {
        format!("{}/{}", ROLES_ENDPOINT, id)
    }

    pub fn raw_list(&self) -> Result<Vec<Role>, ApiError> {
        self.require_version("list roles")?;
        let response = self.client.get(ROLES_ENDPOINT)?;
        parse_json(response, "list roles", ROLES_ENDPOINT)
    }

    pub fn list(&self) -> Result<Vec<Role>, ApiError> {
        self.listing.get_or_fetch(|| self.raw_list())
    }

    pub fn show(&self, id: &str) -> Result<Role, ApiError> {
        self.require_version("show role")?;
        let response = self.client.get(&Self::endpoint_for(id))?;
        parse_json(response, "show role", &format!("role {}", id))
    }

    pub fn create(&self, role: &RoleRequest) -> Result<Role, ApiError> {
        self.require_version("create role")?;
        debug!("Creating role {}", role.id);
        let response = self.client.post_json(ROLES_ENDPOINT, role)?;
        self.listing.reset();
        parse_json(response, "create role", &format!("role {}", role.id))
    }

    /// Replace the role `id`. The server answers with an empty body, so the
    /// stored role is read back.
    pub fn update(&self, id: &str, role: &RoleRequest) -> Result<Role, ApiError> {
        self.require_version("update role")?;
        let response = self.client.put_json(&Self::endpoint_for(id), role)?;
        validate_response(response, "update role", &format!("role {}", id), &[200, 204])?;
        self.listing.reset();
        self.show(id)
    }

    pub fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.require_version("delete role")?;
        let response = self.client.delete(&Self::endpoint_for(id))?;
        let result = validate_response(response, "delete role", &format!("role {}", id), &[201, 204]);
        self.listing.reset();
        result.map(|_| ())
    }
}

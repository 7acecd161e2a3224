//! Resource collections of the Nexus REST API.
//!
//! Each collection borrows a [`NexusClient`] and maps list/show/create/
//! update/delete onto one REST call with a fixed path. A collection keeps the
//! last listing it fetched until a mutating call resets it.

use crate::client::{ApiError, NexusClient};
use std::cell::RefCell;

pub mod assets;
pub mod cleanup_policies;
pub mod repositories;
pub mod roles;
pub mod scripts;

pub use assets::AssetCollection;
pub use cleanup_policies::CleanupPolicyCollection;
pub use repositories::RepositoryCollection;
pub use roles::RoleCollection;
pub use scripts::ScriptCollection;

/// Listing cached for the lifetime of one collection value.
#[derive(Debug)]
pub(crate) struct Listing<T> {
    items: RefCell<Option<Vec<T>>>,
}

impl<T: Clone> Listing<T> {
    pub(crate) fn new() -> Listing<T> {
        Listing {
            items: RefCell::new(None),
        }
    }

    pub(crate) fn get_or_fetch<F>(&self, fetch: F) -> Result<Vec<T>, ApiError>
    where
        F: FnOnce() -> Result<Vec<T>, ApiError>,
    {
        if let Some(items) = self.items.borrow().as_ref() {
            return Ok(items.clone());
        }

        let items = fetch()?;
        *self.items.borrow_mut() = Some(items.clone());
        Ok(items)
    }

    pub(crate) fn reset(&self) {
        self.items.borrow_mut().take();
    }
}

impl NexusClient {
    pub fn repositories(&self) -> RepositoryCollection<'_> {
        RepositoryCollection::new(self)
    }

    pub fn roles(&self) -> RoleCollection<'_> {
        RoleCollection::new(self)
    }

    pub fn cleanup_policies(&self) -> CleanupPolicyCollection<'_> {
        CleanupPolicyCollection::new(self)
    }

    pub fn scripts(&self) -> ScriptCollection<'_> {
        ScriptCollection::new(self)
    }

    pub fn assets(&self) -> AssetCollection<'_> {
        AssetCollection::new(self)
    }
}

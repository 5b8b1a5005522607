//! Pluggable inventory ingestion.
//!
//! Each source normalizes its payload into an [`InventoryStore`] so the
//! engine stays source agnostic. The interface is deliberately narrow to
//! keep test doubles trivial.

mod file;
mod git;
mod netbox;

pub use file::StaticInventorySource;
pub use git::GitInventorySource;
pub use netbox::NetBoxInventorySource;

use crate::error::Result;
use crate::store::InventoryStore;
use async_trait::async_trait;

/// Inventory source interface.
#[async_trait]
pub trait InventorySource: Send + Sync {
    /// Load a fully populated store.
    async fn load(&self) -> Result<InventoryStore>;
}

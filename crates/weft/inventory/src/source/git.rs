//! Git working-tree inventory source.
//!
//! Reads an inventory file from a local checkout. Git operations themselves
//! (pull, fetch) stay outside this process, which keeps the source
//! predictable and network free.

use crate::error::Result;
use crate::source::{InventorySource, StaticInventorySource};
use crate::store::InventoryStore;
use async_trait::async_trait;
use std::path::PathBuf;

/// Load inventory from a JSON file inside a local git working directory.
///
/// Defaults to `inventory.json` at the repository root; the file format is
/// identical to [`StaticInventorySource`].
#[derive(Debug, Clone)]
pub struct GitInventorySource {
    repo_dir: PathBuf,
    inventory_relpath: PathBuf,
}

impl GitInventorySource {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            inventory_relpath: PathBuf::from("inventory.json"),
        }
    }

    pub fn with_relpath(mut self, relpath: impl Into<PathBuf>) -> Self {
        self.inventory_relpath = relpath.into();
        self
    }
}

#[async_trait]
impl InventorySource for GitInventorySource {
    async fn load(&self) -> Result<InventoryStore> {
        let path = self.repo_dir.join(&self.inventory_relpath);
        StaticInventorySource::new(path).load().await
    }
}

//! NetBox-shaped HTTP inventory source.
//!
//! NetBox schemas vary per deployment, so this source expects a simplified
//! endpoint that returns the same JSON payload as the static file source.
//! Normalization stays identical across sources; adapting the parse to a
//! real `dcim/devices` endpoint is a local change here.

use crate::error::Result;
use crate::source::file::parse_inventory_json;
use crate::source::InventorySource;
use crate::store::InventoryStore;
use async_trait::async_trait;
use std::time::Duration;

/// Load inventory from an HTTP endpoint returning the static-file schema.
///
/// When a token is configured it is sent as `Authorization: Token <t>`,
/// NetBox style. The token is never logged.
#[derive(Debug, Clone)]
pub struct NetBoxInventorySource {
    inventory_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl NetBoxInventorySource {
    pub fn new(inventory_url: impl Into<String>) -> Self {
        Self {
            inventory_url: inventory_url.into(),
            token: None,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

#[async_trait]
impl InventorySource for NetBoxInventorySource {
    async fn load(&self) -> Result<InventoryStore> {
        let mut request = self
            .client
            .get(&self.inventory_url)
            .header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Token {token}"));
        }

        let response = request.send().await?.error_for_status()?;
        let payload = response.bytes().await?;
        let store = parse_inventory_json(&payload)?;
        tracing::debug!(
            url = %self.inventory_url,
            devices = store.len(),
            "loaded netbox inventory"
        );
        Ok(store)
    }
}

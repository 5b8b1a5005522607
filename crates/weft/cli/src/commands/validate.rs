//! `weft validate` - fabric validation against an inventory file.

use anyhow::Context;
use std::path::Path;
use weft_fabric::{build_fabric_graph, validate_clos_topology, validate_external_connectivity};
use weft_inventory::{InventorySource, StaticInventorySource};

pub async fn run(inventory_path: &Path) -> anyhow::Result<()> {
    let inventory = StaticInventorySource::new(inventory_path)
        .load()
        .await
        .with_context(|| format!("loading inventory from {}", inventory_path.display()))?;

    let graph = build_fabric_graph(&inventory);
    let topology = validate_clos_topology(&graph);
    let external = validate_external_connectivity(&graph);

    let report = serde_json::json!({
        "devices": inventory.len(),
        "topology": topology,
        "external_connectivity": external,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !topology.ok || !external.ok {
        anyhow::bail!("fabric validation failed");
    }
    Ok(())
}

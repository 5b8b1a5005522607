//! `weft plan` - plan intents and print the result without applying.

use anyhow::Context;
use std::path::Path;
use weft_engine::{IntentSource, StaticIntentSource};
use weft_inventory::{InventorySource, StaticInventorySource};
use weft_planner::{assess_plan_risk, Planner};

pub async fn run(inventory_path: &Path, intents_path: &Path) -> anyhow::Result<()> {
    let inventory = StaticInventorySource::new(inventory_path)
        .load()
        .await
        .with_context(|| format!("loading inventory from {}", inventory_path.display()))?;
    let intents = StaticIntentSource::new(intents_path)
        .fetch()
        .await
        .with_context(|| format!("loading intents from {}", intents_path.display()))?;

    let planner = Planner::default();
    let mut had_errors = false;

    for intent in &intents {
        match planner.plan_change(intent, &inventory) {
            Ok(plan) => {
                let risk = assess_plan_risk(&plan, &inventory);
                let report = serde_json::json!({
                    "change_id": intent.change_id,
                    "plan": plan,
                    "risk": risk,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            Err(error) => {
                had_errors = true;
                let report = serde_json::json!({
                    "change_id": intent.change_id,
                    "error": error.to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
    }

    if had_errors {
        anyhow::bail!("one or more intents failed planning");
    }
    Ok(())
}

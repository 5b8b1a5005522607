//! Pluggable intent ingestion.
//!
//! Sources return normalized [`IntentChange`] records; the planner owns
//! validating what is inside them. A source may return an empty list when
//! nothing is pending.

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;
use weft_types::IntentChange;

/// Errors raised while reading intents.
#[derive(Debug, Error)]
pub enum IntentSourceError {
    #[error("intent I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("intent parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Intent source interface.
#[async_trait]
pub trait IntentSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<IntentChange>, IntentSourceError>;
}

fn intent_from_value(value: &Value) -> IntentChange {
    let get_str = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    IntentChange {
        change_id: get_str("change_id"),
        scope: get_str("scope"),
        desired: value.get("desired").cloned().unwrap_or(Value::Null),
        current: value.get("current").cloned().unwrap_or(Value::Null),
        diff_summary: get_str("diff_summary"),
    }
}

fn intents_from_payload(payload: &Value) -> Vec<IntentChange> {
    if let Some(list) = payload.get("intents").and_then(Value::as_array) {
        return list
            .iter()
            .filter(|entry| entry.is_object())
            .map(intent_from_value)
            .collect();
    }
    if payload.is_object() {
        return vec![intent_from_value(payload)];
    }
    Vec::new()
}

/// Load intents from a local JSON file.
///
/// The file holds either a single intent object or a list under
/// `"intents"`.
#[derive(Debug, Clone)]
pub struct StaticIntentSource {
    path: PathBuf,
}

impl StaticIntentSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl IntentSource for StaticIntentSource {
    async fn fetch(&self) -> Result<Vec<IntentChange>, IntentSourceError> {
        let payload = tokio::fs::read(&self.path).await?;
        let value: Value = serde_json::from_slice(&payload)?;
        Ok(intents_from_payload(&value))
    }
}

/// Load intents from `*.json` files inside a local git working directory.
///
/// A GitOps-style workflow: users commit intent files, the runner picks
/// them up in sorted filename order. Git state is never modified here.
#[derive(Debug, Clone)]
pub struct GitIntentSource {
    repo_dir: PathBuf,
    intents_rel_dir: PathBuf,
}

impl GitIntentSource {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            intents_rel_dir: PathBuf::from("intents"),
        }
    }

    pub fn with_rel_dir(mut self, rel_dir: impl Into<PathBuf>) -> Self {
        self.intents_rel_dir = rel_dir.into();
        self
    }
}

#[async_trait]
impl IntentSource for GitIntentSource {
    async fn fetch(&self) -> Result<Vec<IntentChange>, IntentSourceError> {
        let intents_dir = self.repo_dir.join(&self.intents_rel_dir);
        if !intents_dir.exists() {
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = Vec::new();
        let mut entries = tokio::fs::read_dir(&intents_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut intents = Vec::new();
        for path in paths {
            intents.extend(StaticIntentSource::new(path).fetch().await?);
        }
        Ok(intents)
    }
}

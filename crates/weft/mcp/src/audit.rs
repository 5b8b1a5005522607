//! Append-only JSONL audit trail.

use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

/// One audited protocol exchange.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub request_id: String,
    pub method: String,
    pub http_status: u16,
    /// `ok`, `reject`, or `error`.
    pub outcome: String,
    pub error_code: String,
    pub error_message: String,
    pub duration_ms: u64,
    pub path: String,
}

/// JSON-lines audit logger.
///
/// Each event appends exactly one complete line (sorted keys, with a
/// `ts_unix` stamp) in a single buffered write, so concurrent writers never
/// interleave partial lines.
#[derive(Debug, Clone)]
pub struct AuditLogger {
    path: PathBuf,
}

impl AuditLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append one event. The file write runs on the blocking pool so the
    /// request path never stalls a runtime worker on disk I/O.
    pub async fn log(&self, event: &AuditEvent) {
        let logger = self.clone();
        let event = event.clone();
        match tokio::task::spawn_blocking(move || logger.append(&event)).await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => {
                tracing::warn!(%error, path = %self.path.display(), "audit write failed");
            }
            Err(error) => {
                tracing::warn!(%error, path = %self.path.display(), "audit task failed");
            }
        }
    }

    fn append(&self, event: &AuditEvent) -> std::io::Result<()> {
        let value = serde_json::to_value(event)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        // Sorted keys keep the log diff-friendly and grep-stable.
        let mut sorted: BTreeMap<String, serde_json::Value> = value
            .as_object()
            .map(|map| map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        sorted.insert(
            "ts_unix".to_string(),
            serde_json::json!(chrono::Utc::now().timestamp()),
        );

        let mut line = serde_json::to_string(&sorted)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        line.push('\n');

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }
}

//! `weft run` - the periodic ingest-and-execute loop.

use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use weft_engine::{OrchestrationEngine, Runner, RunnerConfig, StaticIntentSource};
use weft_executor::InMemoryExecutor;
use weft_inventory::StaticInventorySource;
use weft_mcp::{AuditLogger, McpAuthConfig, McpClient};
use weft_planner::Planner;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Inventory JSON file.
    #[arg(long, env = "WEFT_INVENTORY")]
    pub inventory: PathBuf,

    /// Intent JSON file.
    #[arg(long, env = "WEFT_INTENTS")]
    pub intents: PathBuf,

    /// Seconds to sleep between cycles.
    #[arg(long, env = "WEFT_INTERVAL_SECONDS", default_value_t = 10)]
    pub interval_seconds: u64,

    /// Consult the external evaluation service for plan risk.
    #[arg(long, env = "WEFT_USE_MCP")]
    pub use_mcp: bool,

    /// Base URL of the evaluation service.
    #[arg(long, env = "WEFT_MCP_URL", default_value = "http://127.0.0.1:8787")]
    pub mcp_url: String,

    /// Bearer token shared with the evaluation service.
    #[arg(long, env = "WEFT_AUTH_TOKEN", default_value = "", hide_env_values = true)]
    pub auth_token: String,

    /// HMAC secret shared with the evaluation service.
    #[arg(long, env = "WEFT_HMAC_SECRET", default_value = "", hide_env_values = true)]
    pub hmac_secret: String,

    /// Accepted clock drift for signed requests, in seconds.
    #[arg(long, env = "WEFT_ALLOWED_CLOCK_SKEW_SECONDS", default_value_t = 60)]
    pub allowed_clock_skew_seconds: i64,

    /// Client-side audit log path.
    #[arg(long, env = "WEFT_AUDIT_PATH", default_value = "var/audit/mcp_audit.jsonl")]
    pub audit_path: PathBuf,
}

pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    // The stock binary runs against the in-memory executor; applying to
    // real devices means wiring a device client factory into GnmiExecutor
    // at this spot.
    let executor = Arc::new(InMemoryExecutor::new());

    let mut engine = OrchestrationEngine::new(Planner::default(), executor);
    if args.use_mcp {
        let auth = McpAuthConfig::new(args.auth_token.clone(), args.hmac_secret.clone())
            .with_allowed_clock_skew(args.allowed_clock_skew_seconds);
        let client = McpClient::new(args.mcp_url.clone(), auth)
            .with_audit(Arc::new(AuditLogger::new(&args.audit_path)));
        engine = engine.with_evaluator(Arc::new(client));
        tracing::info!(url = %args.mcp_url, "external plan evaluation enabled");
    }

    let runner = Runner::new(
        engine,
        Arc::new(StaticInventorySource::new(&args.inventory)),
        Arc::new(StaticIntentSource::new(&args.intents)),
        RunnerConfig {
            interval: Duration::from_secs(args.interval_seconds),
        },
    );

    tracing::info!(
        inventory = %args.inventory.display(),
        intents = %args.intents.display(),
        interval_seconds = args.interval_seconds,
        "runner starting"
    );
    runner.run_forever().await;
    Ok(())
}

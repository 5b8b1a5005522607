//! `weft mcp-serve` - the authenticated plan-evaluation endpoint.

use anyhow::Context;
use clap::Args;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use weft_mcp::{serve, ConservativeEvaluator, McpAuthConfig, McpServerConfig};

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "WEFT_MCP_LISTEN", default_value = "127.0.0.1:8787")]
    pub listen: SocketAddr,

    /// Bearer token callers must present.
    #[arg(long, env = "WEFT_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: String,

    /// HMAC secret callers sign requests with.
    #[arg(long, env = "WEFT_HMAC_SECRET", hide_env_values = true)]
    pub hmac_secret: String,

    /// Accepted clock drift for signed requests, in seconds.
    #[arg(long, env = "WEFT_ALLOWED_CLOCK_SKEW_SECONDS", default_value_t = 60)]
    pub allowed_clock_skew_seconds: i64,

    /// Replay-protection window for nonces, in seconds.
    #[arg(long, env = "WEFT_NONCE_TTL_SECONDS", default_value_t = 300)]
    pub nonce_ttl_seconds: u64,

    /// Audit log path.
    #[arg(long, env = "WEFT_AUDIT_PATH", default_value = "var/audit/mcp_audit.jsonl")]
    pub audit_path: PathBuf,
}

pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let auth = McpAuthConfig::new(args.auth_token, args.hmac_secret)
        .with_allowed_clock_skew(args.allowed_clock_skew_seconds);
    let config = McpServerConfig::new(auth)
        .with_audit_path(args.audit_path)
        .with_nonce_ttl_seconds(args.nonce_ttl_seconds);

    serve(args.listen, config, Arc::new(ConservativeEvaluator))
        .await
        .context("mcp server failed")
}

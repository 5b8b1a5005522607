//! Plan execution.
//!
//! Stable interfaces for applying plans without binding the engine to a
//! vendor or transport. The engine expects every apply to return both the
//! observed post-apply state and the pre-change snapshot, which is what
//! makes rollback deterministic and auditable.

pub mod error;
pub mod gnmi;
pub mod memory;
pub mod snapshot;

pub use error::{ExecutorError, Result};
pub use gnmi::{DeviceClient, DeviceClientFactory, GnmiExecutor};
pub use memory::InMemoryExecutor;

use async_trait::async_trait;
use weft_types::{ChangePlan, FabricState};

/// Result of applying a plan.
#[derive(Debug, Clone, Default)]
pub struct PlanApplication {
    /// Post-apply state for exactly the paths the plan touched.
    pub observed: FabricState,
    /// Prior values for the touched paths, captured before any write.
    /// A path the device did not have is absent here, never null.
    pub pre_snapshot: FabricState,
}

/// Executor configuration.
#[derive(Debug, Clone, Copy)]
pub struct ExecutorConfig {
    /// When true, observed state comes from a read after the write. Turning
    /// this off makes observed equal to desired, which skips convergence
    /// detection entirely; verification will always pass. Unsafe outside
    /// simulations.
    pub read_after_write: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            read_after_write: true,
        }
    }
}

/// Execution interface expected by the orchestration engine.
///
/// Implementations should be idempotent per (device, path). Per-action
/// atomicity at the transport level is not required; verification catches
/// partial success.
#[async_trait]
pub trait PlanExecutor: Send + Sync {
    /// Apply the plan and return observed plus pre-snapshot state.
    ///
    /// On transport failure after a partial apply, whatever snapshot was
    /// captured so far should still be returned inside the error so the
    /// caller can attempt recovery.
    async fn apply_plan(&self, plan: &ChangePlan) -> Result<PlanApplication>;
}

//! The orchestration engine and its surrounding loop.
//!
//! One run is a sequential pipeline: plan, assess risk (optionally through
//! the external evaluation service, always with the local assessor as
//! fallback), guard, then apply or simulate or stop, verify, and roll back
//! from the pre-change snapshot when verification fails. Failures surface
//! as structured alerts, never as silent state drift.

pub mod alert;
pub mod engine;
pub mod evaluate;
pub mod intent;
pub mod runner;

pub use alert::{Alert, AlertSeverity};
pub use engine::{OrchestrationEngine, RunResult};
pub use evaluate::{EvaluationError, PlanEvaluator};
pub use intent::{GitIntentSource, IntentSource, IntentSourceError, StaticIntentSource};
pub use runner::{CycleReport, Runner, RunnerConfig, RunnerError};

//! Deterministic planning pipeline: intent to plan, risk scoring, post-apply
//! verification, and rollback construction.
//!
//! Nothing in this crate performs I/O or consults a clock. Agentic systems
//! can propose intents, but the plan that touches devices must be stable,
//! auditable, and repeatable, so every function here is a pure function of
//! its inputs.

pub mod error;
pub mod planner;
pub mod risk;
pub mod rollback;
pub mod verification;

pub use error::{PlanError, Result};
pub use planner::{Planner, PlannerConfig};
pub use risk::{assess_plan_risk, RiskAssessment};
pub use rollback::{build_rollback_plan, RollbackBuild};
pub use verification::{evaluate_verification, VerificationOutcome};

//! Shared domain model for the Weft orchestration engine.
//!
//! Everything here is vendor neutral and transport neutral: desired state is
//! expressed as model paths and JSON values, never CLI commands, and the
//! executor seam hides whether a device speaks gNMI or something else.

pub mod device;
pub mod intent;
pub mod plan;
pub mod state;

pub use device::{
    CapabilityClass, Confidence, DeviceEndpoints, DeviceIdentity, DeviceRecord, DeviceRole,
    Evidence, FabricLocation, Link, LinkKind,
};
pub use intent::IntentChange;
pub use plan::{
    ChangeAction, ChangePlan, Check, ModelPaths, RiskLevel, RollbackSpec, VerificationSpec,
};
pub use state::{DeviceState, FabricState};

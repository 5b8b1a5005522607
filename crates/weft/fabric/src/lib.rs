//! Fabric topology: graph construction, CLOS invariants, external
//! connectivity policy, and capacity synthesis.
//!
//! Everything in this crate is deterministic and free of vendor logic.
//! Validators attach structured evidence so their output can be dropped
//! straight into an alert.

pub mod capacity;
pub mod clos;
pub mod external;
pub mod graph;
pub mod report;

#[cfg(test)]
pub(crate) mod testutil;

pub use capacity::{
    breakout_adjusted_capacity, synthesize_architecture, three_tier_capacity, two_tier_capacity,
    ArchitecturePlan, FabricTier, SwitchSpec,
};
pub use clos::validate_clos_topology;
pub use external::validate_external_connectivity;
pub use graph::{build_fabric_graph, FabricGraph, GraphEdge};
pub use report::ValidationReport;

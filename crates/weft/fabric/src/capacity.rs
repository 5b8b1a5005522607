//! CLOS capacity and architecture synthesis.
//!
//! Deterministic sizing math for two-tier and three-tier fabrics, including
//! breakout scenarios under non-blocking assumptions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical switch specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchSpec {
    /// Total physical ports.
    pub port_count: u64,
    /// Lane multiplier when ports can be broken out into lower-speed lanes
    /// (32 x 100G broken into 4 x 25G gives a factor of 4).
    pub breakout_factor: u64,
}

impl SwitchSpec {
    pub fn new(port_count: u64) -> Self {
        Self {
            port_count,
            breakout_factor: 1,
        }
    }

    pub fn with_breakout(mut self, factor: u64) -> Self {
        self.breakout_factor = factor;
        self
    }

    /// Usable port count after breakout.
    pub fn effective_ports(&self) -> u64 {
        self.port_count * self.breakout_factor
    }
}

/// Fabric tier selected by the synthesis step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FabricTier {
    TwoTier,
    ThreeTier,
}

impl fmt::Display for FabricTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FabricTier::TwoTier => write!(f, "two-tier"),
            FabricTier::ThreeTier => write!(f, "three-tier"),
        }
    }
}

/// Structured output of capacity planning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitecturePlan {
    pub tier: FabricTier,
    pub leaf_count: u64,
    pub spine_count: u64,
    pub super_spine_count: u64,
    /// Maximum servers supported by this plan.
    pub max_servers: u64,
    /// Human-readable reasoning, kept for audit.
    pub explanation: String,
}

/// Two-tier non-blocking capacity.
///
/// `total_servers = n * m / 2` where n is ports per leaf and m is ports per
/// spine: half of each leaf's ports face servers, half face spines.
pub fn two_tier_capacity(leaf_ports: u64, spine_ports: u64) -> u64 {
    leaf_ports * spine_ports / 2
}

/// Three-tier capacity when all tiers use the same port count.
///
/// `total_servers = n^3 / 4`, from the canonical folded-Clos derivation
/// with each tier sized at n/2 switches.
pub fn three_tier_capacity(ports: u64) -> u64 {
    ports * ports * ports / 4
}

/// Two-tier capacity using effective (post-breakout) ports.
pub fn breakout_adjusted_capacity(leaf_spec: SwitchSpec, spine_spec: SwitchSpec) -> u64 {
    two_tier_capacity(leaf_spec.effective_ports(), spine_spec.effective_ports())
}

/// Pick a two-tier or three-tier architecture for a required server count.
///
/// Two-tier wins whenever it is sufficient; otherwise the plan escalates to
/// three tiers using the leaf spec's port count for all tiers.
pub fn synthesize_architecture(
    required_servers: u64,
    leaf_spec: SwitchSpec,
    spine_spec: SwitchSpec,
) -> ArchitecturePlan {
    let two_tier_max = breakout_adjusted_capacity(leaf_spec, spine_spec);

    if required_servers <= two_tier_max {
        return ArchitecturePlan {
            tier: FabricTier::TwoTier,
            leaf_count: leaf_spec.effective_ports() / 2,
            spine_count: spine_spec.effective_ports() / 2,
            super_spine_count: 0,
            max_servers: two_tier_max,
            explanation: format!(
                "Two tier sufficient. Capacity {two_tier_max} servers >= required {required_servers}."
            ),
        };
    }

    let ports = leaf_spec.effective_ports();
    let three_tier_max = three_tier_capacity(ports);

    ArchitecturePlan {
        tier: FabricTier::ThreeTier,
        leaf_count: ports / 2,
        spine_count: ports / 2,
        super_spine_count: ports / 2,
        max_servers: three_tier_max,
        explanation: format!(
            "Two tier insufficient ({two_tier_max}). Escalating to three tier with capacity {three_tier_max}."
        ),
    }
}

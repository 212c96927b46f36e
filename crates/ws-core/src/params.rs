//! Validated generation parameters.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, WsError};

/// Default bound on candidate draws for a single rewired slot.
pub const DEFAULT_MAX_ATTEMPTS_PER_SLOT: usize = 10_000;

/// How the lattice treats an odd degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OddDegreePolicy {
    /// Keep the forward walk: `k / 2` predecessors and `k / 2 + 1` successors.
    #[default]
    ExtraSuccessor,
    /// Refuse odd degrees with an invalid-parameter error.
    Reject,
}

/// Random stream layout used by the rewirer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StreamMode {
    /// One stream consumed node by node in ascending order.
    #[default]
    Shared,
    /// Node `i` draws from substream `i` of the master seed.
    PerNode,
}

/// Parameters of a Watts-Strogatz run: `N`, `k`, `p` plus policy knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WattsStrogatzParams {
    /// Number of nodes `N` on the ring.
    pub nodes: usize,
    /// Lattice degree `k` (row length).
    pub degree: usize,
    /// Per-edge rewiring probability `p`.
    pub rewire_probability: f64,
    /// Policy applied when `degree` is odd.
    #[serde(default)]
    pub odd_degree: OddDegreePolicy,
    /// Candidate draws allowed per rewired slot before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts_per_slot: usize,
}

fn default_max_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS_PER_SLOT
}

impl WattsStrogatzParams {
    /// Creates parameters with the default odd-degree policy and retry budget.
    pub fn new(nodes: usize, degree: usize, rewire_probability: f64) -> Self {
        Self {
            nodes,
            degree,
            rewire_probability,
            odd_degree: OddDegreePolicy::default(),
            max_attempts_per_slot: DEFAULT_MAX_ATTEMPTS_PER_SLOT,
        }
    }

    /// Builds parameters from signed integers as read from a command line,
    /// rejecting negative values.
    pub fn from_signed(nodes: i64, degree: i64, rewire_probability: f64) -> Result<Self, WsError> {
        let nodes = non_negative("nodes", nodes)?;
        let degree = non_negative("degree", degree)?;
        let params = Self::new(nodes, degree, rewire_probability);
        params.validate()?;
        Ok(params)
    }

    /// Replaces the odd-degree policy.
    pub fn with_odd_degree(mut self, policy: OddDegreePolicy) -> Self {
        self.odd_degree = policy;
        self
    }

    /// Replaces the per-slot retry budget.
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts_per_slot = attempts;
        self
    }

    /// Checks every precondition of lattice construction and rewiring.
    pub fn validate(&self) -> Result<(), WsError> {
        if self.nodes == 0 {
            return Err(WsError::InvalidParameter(
                ErrorInfo::new("empty-graph", "the ring needs at least one node")
                    .with_context("nodes", self.nodes),
            ));
        }
        if self.degree >= self.nodes {
            return Err(WsError::InvalidParameter(
                ErrorInfo::new("degree-too-large", "degree must be smaller than the node count")
                    .with_context("nodes", self.nodes)
                    .with_context("degree", self.degree)
                    .with_hint("use at least degree + 1 nodes"),
            ));
        }
        let p = self.rewire_probability;
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(WsError::InvalidParameter(
                ErrorInfo::new(
                    "probability-out-of-range",
                    "rewire probability must lie in [0, 1]",
                )
                .with_context("probability", p),
            ));
        }
        if self.degree % 2 == 1 && self.odd_degree == OddDegreePolicy::Reject {
            return Err(WsError::InvalidParameter(
                ErrorInfo::new("odd-degree", "odd degrees are rejected by the configured policy")
                    .with_context("degree", self.degree)
                    .with_hint("pick an even degree or the extra-successor policy"),
            ));
        }
        if self.max_attempts_per_slot == 0 {
            return Err(WsError::InvalidParameter(ErrorInfo::new(
                "zero-attempt-budget",
                "max_attempts_per_slot must be positive",
            )));
        }
        Ok(())
    }
}

/// Converts a signed command-line value into a count, rejecting negatives.
pub fn non_negative(name: &str, value: i64) -> Result<usize, WsError> {
    usize::try_from(value).map_err(|_| {
        WsError::InvalidParameter(
            ErrorInfo::new("negative-parameter", format!("{name} must not be negative"))
                .with_context(name, value),
        )
    })
}

//! Resource-ranking strategies.
//!
//! After capability filtering, a pluggable [`ResourceRanking`] orders the
//! eligible candidates; the scheduler assigns the first. The default
//! [`FirstCapable`] keeps the caller's resource order (stable first-match),
//! [`LeastLoaded`] prefers resources with fewer placements in the current
//! run. Both are deterministic.
//!
//! [`ResourceLoad`] is the run-local utilization tracker: a plain placement
//! counter, reset for every pass. No load state survives between runs.

use std::collections::HashMap;
use std::fmt::Debug;

use crate::models::Resource;

/// Run-local placement counts per resource.
#[derive(Debug, Clone, Default)]
pub struct ResourceLoad {
    counts: HashMap<i64, usize>,
}

impl ResourceLoad {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Placements recorded for a resource so far this run.
    pub fn count(&self, resource_id: i64) -> usize {
        self.counts.get(&resource_id).copied().unwrap_or(0)
    }

    /// Records a placement and returns the updated count.
    pub fn record(&mut self, resource_id: i64) -> usize {
        let count = self.counts.entry(resource_id).or_insert(0);
        *count += 1;
        *count
    }
}

/// Orders eligible resources for assignment.
///
/// Implementations must be deterministic: identical candidates and load
/// state must produce identical orderings.
pub trait ResourceRanking: Send + Sync + Debug {
    /// Strategy name for run reporting.
    fn name(&self) -> &'static str;

    /// Reorders `candidates` in place, best candidate first.
    fn rank(&self, candidates: &mut Vec<&Resource>, load: &ResourceLoad);
}

/// Stable first-match: candidates keep their input order.
///
/// The default strategy. Per-resource load is tracked for diagnostics but
/// deliberately not used for selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstCapable;

impl ResourceRanking for FirstCapable {
    fn name(&self) -> &'static str {
        "first-capable"
    }

    fn rank(&self, _candidates: &mut Vec<&Resource>, _load: &ResourceLoad) {}
}

/// Prefers the resource with the fewest placements this run.
///
/// Ties keep the input order (stable sort), so the strategy remains
/// deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeastLoaded;

impl ResourceRanking for LeastLoaded {
    fn name(&self) -> &'static str {
        "least-loaded"
    }

    fn rank(&self, candidates: &mut Vec<&Resource>, load: &ResourceLoad) {
        candidates.sort_by_key(|r| load.count(r.id));
    }
}

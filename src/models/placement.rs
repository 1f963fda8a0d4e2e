//! Scheduling output models.
//!
//! A run produces one [`ScheduleRun`]: an ordered list of [`Placement`]s
//! plus tally statistics. Placements are tagged (an operation is either
//! placed fresh, preserved frozen from a prior run, or explicitly
//! unassignable) so callers can distinguish "fully scheduled" from
//! "partially scheduled with gaps".
//!
//! # Invariant
//! For every `Placed` window, `end_time - start_time` equals the
//! operation's duration exactly; buffer and working-hour shifts move the
//! window, they never stretch or compress it. `Frozen` windows are copied
//! verbatim from the prior run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of the backward pass for one operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Placement {
    /// Freshly computed window and assignment.
    Placed(ScheduledOperation),
    /// Prior placement inside the frozen horizon, preserved verbatim.
    Frozen(ScheduledOperation),
    /// No eligible resource satisfied the operation's requirements.
    Unassignable(UnplacedOperation),
}

/// A computed (or preserved) operation window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledOperation {
    /// Placed operation ID.
    pub operation_id: i64,
    /// Parent order ID.
    pub order_id: i64,
    /// Assigned resource ID.
    pub resource_id: i64,
    /// Assigned resource name (denormalized for reporting).
    pub resource_name: String,
    /// Window start.
    pub start_time: DateTime<Utc>,
    /// Window end.
    pub end_time: DateTime<Utc>,
    /// Processing time in hours.
    pub duration_hours: f64,
    /// Optimization diagnostics. `None` for frozen placements.
    pub diagnostics: Option<Diagnostics>,
}

/// An operation the run could not place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnplacedOperation {
    /// Skipped operation ID.
    pub operation_id: i64,
    /// Parent order ID.
    pub order_id: i64,
    /// Why no placement was possible.
    pub reason: String,
}

/// Per-placement optimization diagnostics.
///
/// Computed for fresh placements only, against the owning order's due date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Slack between window end and due date, in hours (negative = late).
    pub time_variance_hours: f64,
    /// More than one day of slack before the due date.
    pub is_early: bool,
    /// Window ends after the due date; infeasible under the stated target.
    pub is_late: bool,
    /// Three or more placements landed on the assigned resource this run.
    pub is_bottleneck: bool,
    /// Copied from the order when critical/high, otherwise normal.
    pub criticality: Criticality,
    /// Human-readable summary of the triggered conditions.
    pub optimization_notes: String,
}

/// Diagnostic criticality level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criticality {
    Critical,
    High,
    Normal,
}

/// Tally of one scheduling pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Operations offered to the scheduler.
    pub total_operations: usize,
    /// Operations that received a window (fresh + frozen).
    pub placed: usize,
    /// Windows preserved from a prior run.
    pub frozen: usize,
    /// Freshly computed windows.
    pub rescheduled: usize,
    /// Operations with no eligible resource.
    pub unassignable: usize,
}

/// Complete output of one backward-scheduling pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRun {
    /// Placements in emission order.
    pub placements: Vec<Placement>,
    /// Run statistics.
    pub stats: RunStats,
}

impl Placement {
    /// The scheduled window, if this placement produced one.
    pub fn scheduled(&self) -> Option<&ScheduledOperation> {
        match self {
            Placement::Placed(op) | Placement::Frozen(op) => Some(op),
            Placement::Unassignable(_) => None,
        }
    }

    /// Whether this placement was preserved from a prior run.
    pub fn is_frozen(&self) -> bool {
        matches!(self, Placement::Frozen(_))
    }

    /// The operation this placement refers to.
    pub fn operation_id(&self) -> i64 {
        match self {
            Placement::Placed(op) | Placement::Frozen(op) => op.operation_id,
            Placement::Unassignable(u) => u.operation_id,
        }
    }

    /// The owning order.
    pub fn order_id(&self) -> i64 {
        match self {
            Placement::Placed(op) | Placement::Frozen(op) => op.order_id,
            Placement::Unassignable(u) => u.order_id,
        }
    }
}

impl ScheduleRun {
    /// Creates an empty run result.
    pub fn new() -> Self {
        Self::default()
    }

    /// All scheduled windows (fresh and frozen), in emission order.
    pub fn scheduled(&self) -> Vec<&ScheduledOperation> {
        self.placements.iter().filter_map(|p| p.scheduled()).collect()
    }

    /// All unassignable operations.
    pub fn unassignable(&self) -> Vec<&UnplacedOperation> {
        self.placements
            .iter()
            .filter_map(|p| match p {
                Placement::Unassignable(u) => Some(u),
                _ => None,
            })
            .collect()
    }

    /// Scheduled windows belonging to one order.
    pub fn placements_for_order(&self, order_id: i64) -> Vec<&ScheduledOperation> {
        self.placements
            .iter()
            .filter_map(|p| p.scheduled())
            .filter(|op| op.order_id == order_id)
            .collect()
    }

    /// Scheduled windows assigned to one resource.
    pub fn placements_for_resource(&self, resource_id: i64) -> Vec<&ScheduledOperation> {
        self.placements
            .iter()
            .filter_map(|p| p.scheduled())
            .filter(|op| op.resource_id == resource_id)
            .collect()
    }

    /// The window emitted for a given operation, if any.
    pub fn window_for_operation(&self, operation_id: i64) -> Option<&ScheduledOperation> {
        self.placements
            .iter()
            .filter_map(|p| p.scheduled())
            .find(|op| op.operation_id == operation_id)
    }

    /// Count of placements whose window ends after the order's due date.
    pub fn late_count(&self) -> usize {
        self.placements
            .iter()
            .filter_map(|p| p.scheduled())
            .filter(|op| op.diagnostics.as_ref().is_some_and(|d| d.is_late))
            .count()
    }

    /// Whether the run emitted any window at all.
    pub fn is_empty(&self) -> bool {
        self.stats.placed == 0
    }
}

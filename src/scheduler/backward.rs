//! Finite-capacity backward scheduler.
//!
//! Works each order backward from its due date: the last routing step is
//! placed to end at the due date, and every earlier step is placed to end
//! where its successor (minus buffer) begins.
//!
//! # Algorithm
//!
//! 1. Sort orders by priority rank ascending, then due date ascending.
//! 2. For each order, fold over its operations in descending `sequence`
//!    order with the cursor (latest allowed end) as accumulator, starting
//!    at the due date.
//! 3. Per operation: honor the frozen horizon, filter active resources
//!    through the capability matcher, rank them, place the window, apply
//!    buffer and the working-hours shift, annotate diagnostics.
//!
//! # Determinism
//!
//! The pass is a pure function of its inputs: sorts are stable, resource
//! selection is stable, and the reference time `now` is injected rather
//! than read from a clock. Identical inputs produce identical output.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", on
//! backward (ALAP) scheduling against due dates.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Timelike, Utc};
use tracing::{debug, warn};

use crate::matching;
use crate::models::{
    Operation, Order, Placement, Resource, RunStats, ScheduleRun, ScheduledOperation,
    SchedulingParams, UnplacedOperation,
};
use crate::ranking::{FirstCapable, ResourceLoad, ResourceRanking};

use super::diagnostics;

/// The backward-scheduling pass.
///
/// # Example
///
/// ```
/// use backsched::models::{CapabilityRef, Capability, Operation, Order, Resource, SchedulingParams};
/// use backsched::scheduler::BackwardScheduler;
/// use chrono::{TimeZone, Utc};
///
/// let due = Utc.with_ymd_and_hms(2025, 3, 10, 17, 0, 0).unwrap();
/// let orders = vec![Order::new(1, "PO-1", due)];
/// let operations = vec![
///     Operation::new(10, 1, 1)
///         .with_duration_hours(4.0)
///         .with_capability(CapabilityRef::by_name("welding")),
/// ];
/// let resources = vec![Resource::new(5, "R1").with_capability(Capability::new(7, "welding"))];
///
/// let params = SchedulingParams::new().with_overtime(true);
/// let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
/// let run = BackwardScheduler::new(params).schedule(&orders, &operations, &resources, now);
/// assert_eq!(run.stats.placed, 1);
/// assert_eq!(run.window_for_operation(10).unwrap().end_time, due);
/// ```
#[derive(Debug, Clone)]
pub struct BackwardScheduler {
    params: SchedulingParams,
    ranking: Arc<dyn ResourceRanking>,
}

impl BackwardScheduler {
    /// Creates a scheduler with the default first-capable resource selection.
    pub fn new(params: SchedulingParams) -> Self {
        Self {
            params,
            ranking: Arc::new(FirstCapable),
        }
    }

    /// Replaces the resource-ranking strategy.
    pub fn with_ranking<R: ResourceRanking + 'static>(self, ranking: R) -> Self {
        self.with_shared_ranking(Arc::new(ranking))
    }

    /// Replaces the resource-ranking strategy with a shared instance.
    pub fn with_shared_ranking(mut self, ranking: Arc<dyn ResourceRanking>) -> Self {
        self.ranking = ranking;
        self
    }

    /// Runs one backward pass.
    ///
    /// `now` is the injected reference time; it anchors the frozen-horizon
    /// cutoff and nothing else. Inputs are expected to be pre-validated
    /// (see `crate::validation`) and pre-scoped by the caller.
    pub fn schedule(
        &self,
        orders: &[Order],
        operations: &[Operation],
        resources: &[Resource],
        now: DateTime<Utc>,
    ) -> ScheduleRun {
        let frozen_cutoff = now + Duration::days(self.params.frozen_horizon_days);
        let active: Vec<&Resource> = resources.iter().filter(|r| r.is_active()).collect();

        let mut placements: Vec<Placement> = Vec::new();
        let mut load = ResourceLoad::new();

        for order in sort_orders(orders) {
            let mut ops: Vec<&Operation> = operations
                .iter()
                .filter(|op| op.order_id == order.id)
                .collect();
            // Backward pass: last routing step first
            ops.sort_by(|a, b| b.sequence.cmp(&a.sequence));

            debug!(
                order = %order.order_number,
                operations = ops.len(),
                due = %order.due_date,
                "scheduling order backward from due date"
            );

            // Cursor = latest allowed end for the next (earlier) operation
            let final_cursor = ops.iter().fold(order.due_date, |cursor, op| {
                let (placement, next_cursor) =
                    self.place(op, order, cursor, &active, &mut load, frozen_cutoff);
                placements.push(placement);
                next_cursor
            });
            debug!(order = %order.order_number, start = %final_cursor, "order pass complete");
        }

        let stats = tally(operations.len(), &placements);
        debug!(
            total = stats.total_operations,
            placed = stats.placed,
            frozen = stats.frozen,
            unassignable = stats.unassignable,
            "backward pass finished"
        );

        ScheduleRun { placements, stats }
    }

    /// Places one operation; returns the placement and the next cursor.
    fn place(
        &self,
        op: &Operation,
        order: &Order,
        cursor: DateTime<Utc>,
        active: &[&Resource],
        load: &mut ResourceLoad,
        frozen_cutoff: DateTime<Utc>,
    ) -> (Placement, DateTime<Utc>) {
        // Frozen horizon: a complete prior placement starting inside the
        // horizon is preserved verbatim and consumes no resource slot.
        if self.params.frozen_horizon_enabled {
            if let (Some(start), Some(end), Some(resource_id)) = (
                op.scheduled_start_date,
                op.scheduled_end_date,
                op.assigned_resource_id,
            ) {
                if start <= frozen_cutoff {
                    let resource_name = active
                        .iter()
                        .find(|r| r.id == resource_id)
                        .map(|r| r.name.clone())
                        .unwrap_or_default();
                    let frozen = ScheduledOperation {
                        operation_id: op.id,
                        order_id: op.order_id,
                        resource_id,
                        resource_name,
                        start_time: start,
                        end_time: end,
                        duration_hours: op.duration_hours(),
                        diagnostics: None,
                    };
                    return (Placement::Frozen(frozen), start);
                }
            }
        }

        let mut candidates: Vec<&Resource> = active
            .iter()
            .copied()
            .filter(|r| matching::is_eligible(r, &op.required_capabilities))
            .collect();
        if candidates.is_empty() {
            warn!(
                operation = op.id,
                order = %order.order_number,
                requirements = op.required_capabilities.len(),
                "no eligible resource; operation left unplaced"
            );
            let unplaced = UnplacedOperation {
                operation_id: op.id,
                order_id: op.order_id,
                reason: format!(
                    "no active resource satisfies {} required capabilit{}",
                    op.required_capabilities.len(),
                    if op.required_capabilities.len() == 1 { "y" } else { "ies" }
                ),
            };
            // An unplaced operation does not move the cursor
            return (Placement::Unassignable(unplaced), cursor);
        }

        self.ranking.rank(&mut candidates, load);
        let resource = candidates[0];

        let duration = hours(op.duration_hours());
        let buffer = hours(self.params.buffer_time_hours);

        let end = cursor;
        let start = end - duration;
        let buffered_start = start - buffer;

        // Working-hours shift: without overtime, a window whose buffered
        // start drifts before the working day is re-anchored to end at the
        // previous day's closing hour.
        let (final_start, final_end) = if !self.params.allow_overtime
            && buffered_start.hour() < self.params.working_hours_start
        {
            let shifted_end =
                previous_day_at_hour(buffered_start, self.params.working_hours_end);
            (shifted_end - duration, shifted_end)
        } else {
            (start, end)
        };
        let next_cursor = final_start - buffer;

        let placements_on_resource = load.record(resource.id);
        let diag = diagnostics::annotate(
            final_end,
            order.due_date,
            placements_on_resource,
            order.priority,
        );

        let placed = ScheduledOperation {
            operation_id: op.id,
            order_id: op.order_id,
            resource_id: resource.id,
            resource_name: resource.name.clone(),
            start_time: final_start,
            end_time: final_end,
            duration_hours: op.duration_hours(),
            diagnostics: Some(diag),
        };
        (Placement::Placed(placed), next_cursor)
    }
}

/// Orders sorted by priority rank, ties broken by earlier due date.
fn sort_orders(orders: &[Order]) -> Vec<&Order> {
    let mut sorted: Vec<&Order> = orders.iter().collect();
    sorted.sort_by(|a, b| {
        a.priority
            .rank()
            .cmp(&b.priority.rank())
            .then(a.due_date.cmp(&b.due_date))
    });
    sorted
}

fn tally(total_operations: usize, placements: &[Placement]) -> RunStats {
    let mut stats = RunStats {
        total_operations,
        ..RunStats::default()
    };
    for p in placements {
        match p {
            Placement::Placed(_) => {
                stats.placed += 1;
                stats.rescheduled += 1;
            }
            Placement::Frozen(_) => {
                stats.placed += 1;
                stats.frozen += 1;
            }
            Placement::Unassignable(_) => stats.unassignable += 1,
        }
    }
    stats
}

/// Fractional hours as a chrono duration (millisecond resolution).
fn hours(h: f64) -> Duration {
    Duration::milliseconds((h * 3_600_000.0).round() as i64)
}

/// The previous calendar day of `t`, at `hour`:00 UTC.
fn previous_day_at_hour(t: DateTime<Utc>, hour: u32) -> DateTime<Utc> {
    let midnight = Utc.from_utc_datetime(&t.date_naive().and_time(NaiveTime::MIN));
    midnight - Duration::hours(24 - i64::from(hour))
}

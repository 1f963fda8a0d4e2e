//! Schedule applier.
//!
//! Persists a computed [`ScheduleRun`] back onto the order/operation
//! records in two phases:
//!
//! 1. Write every emitted window (start, end, resource, diagnostics) onto
//!    its operation record, collecting per-operation failures instead of
//!    aborting.
//! 2. Derive each order's date span (earliest start to latest end over
//!    all its windows, frozen included) and write it to the order record.
//!
//! An order with any failed operation write is skipped in phase 2: a span
//! must never be derived from a partially-written operation set. Skipped
//! orders and failed writes are reported, not swallowed.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::ScheduleRun;
use crate::store::{OperationUpdate, OrderUpdate, ScheduleStore};

/// Outcome of persisting one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplyReport {
    /// Operation records successfully written.
    pub scheduled_operations: usize,
    /// Order records whose date span was successfully written.
    pub updated_orders: usize,
    /// Operation writes that failed: (operation ID, error).
    pub failed_operations: Vec<(i64, String)>,
    /// Order writes that failed: (order ID, error).
    pub failed_orders: Vec<(i64, String)>,
    /// Orders whose span was withheld because an operation write failed.
    pub skipped_orders: Vec<i64>,
}

impl ApplyReport {
    /// Whether every write went through.
    pub fn is_complete(&self) -> bool {
        self.failed_operations.is_empty()
            && self.failed_orders.is_empty()
            && self.skipped_orders.is_empty()
    }
}

/// Persists a run's placements and derived order spans.
pub fn apply_run<S: ScheduleStore>(store: &mut S, run: &ScheduleRun) -> ApplyReport {
    let mut report = ApplyReport::default();
    let mut failed_order_ids: HashSet<i64> = HashSet::new();

    // Phase 1: operation windows
    for window in run.scheduled() {
        let update = OperationUpdate {
            scheduled_start_date: window.start_time,
            scheduled_end_date: window.end_time,
            assigned_resource_id: window.resource_id,
            diagnostics: window.diagnostics.clone(),
        };
        match store.persist_operation(window.operation_id, &update) {
            Ok(()) => report.scheduled_operations += 1,
            Err(err) => {
                warn!(
                    operation = window.operation_id,
                    order = window.order_id,
                    %err,
                    "operation write failed; withholding order span"
                );
                failed_order_ids.insert(window.order_id);
                report
                    .failed_operations
                    .push((window.operation_id, err.to_string()));
            }
        }
    }

    // Phase 2: order spans, derived only from fully-written orders
    for (order_id, update) in order_spans(run) {
        if failed_order_ids.contains(&order_id) {
            report.skipped_orders.push(order_id);
            continue;
        }
        match store.persist_order(order_id, &update) {
            Ok(()) => report.updated_orders += 1,
            Err(err) => {
                warn!(order = order_id, %err, "order write failed");
                report.failed_orders.push((order_id, err.to_string()));
            }
        }
    }

    debug!(
        operations = report.scheduled_operations,
        orders = report.updated_orders,
        failed = report.failed_operations.len(),
        "apply finished"
    );
    report
}

/// Per-order date spans in first-emission order.
fn order_spans(run: &ScheduleRun) -> Vec<(i64, OrderUpdate)> {
    let mut seen: Vec<i64> = Vec::new();
    let mut spans: HashMap<i64, OrderUpdate> = HashMap::new();

    for window in run.scheduled() {
        match spans.get_mut(&window.order_id) {
            Some(span) => {
                span.scheduled_start_date = span.scheduled_start_date.min(window.start_time);
                span.scheduled_end_date = span.scheduled_end_date.max(window.end_time);
            }
            None => {
                seen.push(window.order_id);
                spans.insert(
                    window.order_id,
                    OrderUpdate {
                        scheduled_start_date: window.start_time,
                        scheduled_end_date: window.end_time,
                    },
                );
            }
        }
    }

    seen.into_iter()
        .filter_map(|id| spans.remove(&id).map(|span| (id, span)))
        .collect()
}

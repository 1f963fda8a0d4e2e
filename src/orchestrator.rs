//! Execution orchestrator.
//!
//! The entry point the surrounding system invokes: validates that the
//! requested algorithm may run, narrows the working set to an optional
//! scope, runs the backward pass, and persists the result.
//!
//! # Run lifecycle
//!
//! `Requested → Validated → Scoped → Scheduled → Applied → Completed`,
//! or `Requested → Rejected` with a structured [`ScheduleError`].
//!
//! # Concurrency
//!
//! A run is one isolated read-then-write pass against the store; the core
//! does not coordinate concurrent runs. Callers must serialize runs whose
//! order/operation sets overlap (e.g., one lock per plant or scope held
//! across schedule + apply) to avoid lost updates on the persisted
//! schedule fields.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::apply;
use crate::error::ScheduleError;
use crate::models::{Operation, Order, Resource, RunStats, SchedulingParams};
use crate::ranking::{FirstCapable, ResourceRanking};
use crate::scheduler::BackwardScheduler;
use crate::store::{AlgorithmStatus, ScheduleStore};
use crate::validation;

/// A request to execute one scheduling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRequest {
    /// Identifier of the algorithm configuration to execute.
    pub algorithm_id: String,
    /// Per-run parameters.
    pub params: SchedulingParams,
    /// Optional working-set restriction.
    pub scope: Option<RunScope>,
}

/// Restricts a run to a subset of orders and/or resources.
///
/// Operations are implicitly included when their parent order is in scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunScope {
    /// Order IDs to schedule; `None` = all orders.
    pub order_ids: Option<Vec<i64>>,
    /// Resource IDs to schedule on; `None` = all resources.
    pub resource_ids: Option<Vec<i64>>,
}

/// Lifecycle stage of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Requested,
    Validated,
    Scoped,
    Scheduled,
    Applied,
    Completed,
    Rejected,
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Algorithm that produced the schedule.
    pub algorithm: String,
    /// Reference time the run was anchored to.
    pub execution_time: DateTime<Utc>,
    /// Operation records written.
    pub scheduled_operations: usize,
    /// Order records whose span was updated.
    pub updated_orders: usize,
    /// Operations with no eligible resource (left unplaced).
    pub unassignable_operations: usize,
    /// Placements ending past their order's due date (soft infeasibility).
    pub late_operations: usize,
    /// Operation writes that failed: (operation ID, error).
    pub failed_operations: Vec<(i64, String)>,
    /// Orders whose span was withheld after a failed operation write.
    pub skipped_orders: Vec<i64>,
    /// Scheduler tallies for the pass.
    pub stats: RunStats,
}

/// Runs scheduling requests end to end.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    ranking: Arc<dyn ResourceRanking>,
}

impl Orchestrator {
    /// Creates an orchestrator with the default first-capable selection.
    pub fn new() -> Self {
        Self {
            ranking: Arc::new(FirstCapable),
        }
    }

    /// Replaces the resource-ranking strategy used for scheduling.
    pub fn with_ranking<R: ResourceRanking + 'static>(mut self, ranking: R) -> Self {
        self.ranking = Arc::new(ranking);
        self
    }

    /// Executes one run against the store.
    ///
    /// `now` anchors the frozen horizon and is echoed back as the report's
    /// execution time; injecting it keeps runs reproducible.
    pub fn execute<S: ScheduleStore>(
        &self,
        store: &mut S,
        request: &RunRequest,
        now: DateTime<Utc>,
    ) -> Result<RunReport, ScheduleError> {
        let mut state = RunState::Requested;
        debug!(algorithm = %request.algorithm_id, ?state, "run requested");

        // Parameters first: nothing is fetched for a malformed request
        validation::validate_params(&request.params).map_err(ScheduleError::Validation)?;

        // Policy gate, still before any data fetch
        let status = store.algorithm_status(&request.algorithm_id)?;
        if status != AlgorithmStatus::Approved {
            debug!(algorithm = %request.algorithm_id, ?status, "run rejected by policy");
            return Err(ScheduleError::Policy {
                algorithm_id: request.algorithm_id.clone(),
                status,
            });
        }
        state = RunState::Validated;
        debug!(?state, "algorithm approved");

        let orders = store.fetch_orders()?;
        let operations = store.fetch_operations()?;
        let resources = store.fetch_resources()?;
        validation::validate_input(&orders, &operations, &resources)
            .map_err(ScheduleError::Validation)?;

        let (orders, operations, resources) =
            scope_working_set(orders, operations, resources, request.scope.as_ref());
        state = RunState::Scoped;
        debug!(
            ?state,
            orders = orders.len(),
            operations = operations.len(),
            resources = resources.len(),
            "working set scoped"
        );

        let scheduler =
            BackwardScheduler::new(request.params.clone()).with_shared_ranking(self.ranking.clone());
        let run = scheduler.schedule(&orders, &operations, &resources, now);
        if run.is_empty() && !operations.is_empty() {
            debug!(operations = operations.len(), "run produced no schedule");
            return Err(ScheduleError::EmptyRun {
                operation_count: operations.len(),
            });
        }
        state = RunState::Scheduled;
        debug!(?state, placed = run.stats.placed, "schedule computed");

        let applied = apply::apply_run(store, &run);
        state = RunState::Applied;
        debug!(?state, operations = applied.scheduled_operations, "schedule persisted");

        let report = RunReport {
            algorithm: request.algorithm_id.clone(),
            execution_time: now,
            scheduled_operations: applied.scheduled_operations,
            updated_orders: applied.updated_orders,
            unassignable_operations: run.stats.unassignable,
            late_operations: run.late_count(),
            failed_operations: applied.failed_operations,
            skipped_orders: applied.skipped_orders,
            stats: run.stats,
        };
        state = RunState::Completed;
        info!(
            algorithm = %report.algorithm,
            ?state,
            scheduled = report.scheduled_operations,
            orders = report.updated_orders,
            unassignable = report.unassignable_operations,
            late = report.late_operations,
            "run completed"
        );
        Ok(report)
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl RunRequest {
    /// Creates a request with default parameters and no scope.
    pub fn new(algorithm_id: impl Into<String>) -> Self {
        Self {
            algorithm_id: algorithm_id.into(),
            params: SchedulingParams::default(),
            scope: None,
        }
    }

    /// Sets the parameters.
    pub fn with_params(mut self, params: SchedulingParams) -> Self {
        self.params = params;
        self
    }

    /// Sets the scope.
    pub fn with_scope(mut self, scope: RunScope) -> Self {
        self.scope = Some(scope);
        self
    }
}

impl RunScope {
    /// Scope restricted to the given orders.
    pub fn orders(order_ids: Vec<i64>) -> Self {
        Self {
            order_ids: Some(order_ids),
            resource_ids: None,
        }
    }

    /// Scope restricted to the given resources.
    pub fn resources(resource_ids: Vec<i64>) -> Self {
        Self {
            order_ids: None,
            resource_ids: Some(resource_ids),
        }
    }

    /// Additionally restricts the resources.
    pub fn with_resources(mut self, resource_ids: Vec<i64>) -> Self {
        self.resource_ids = Some(resource_ids);
        self
    }
}

/// Narrows the working set to the requested scope.
fn scope_working_set(
    orders: Vec<Order>,
    operations: Vec<Operation>,
    resources: Vec<Resource>,
    scope: Option<&RunScope>,
) -> (Vec<Order>, Vec<Operation>, Vec<Resource>) {
    let Some(scope) = scope else {
        return (orders, operations, resources);
    };

    let orders: Vec<Order> = match &scope.order_ids {
        Some(ids) => orders.into_iter().filter(|o| ids.contains(&o.id)).collect(),
        None => orders,
    };
    // Operations follow their parent order into (or out of) scope
    let operations: Vec<Operation> = operations
        .into_iter()
        .filter(|op| orders.iter().any(|o| o.id == op.order_id))
        .collect();
    let resources: Vec<Resource> = match &scope.resource_ids {
        Some(ids) => resources
            .into_iter()
            .filter(|r| ids.contains(&r.id))
            .collect(),
        None => resources,
    };

    (orders, operations, resources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Capability, CapabilityRef, Priority};
    use crate::store::InMemoryStore;
    use chrono::TimeZone;

    const ALGORITHM: &str = "backward-scheduling";

    fn at(day: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, h, 0, 0).unwrap()
    }

    fn now() -> DateTime<Utc> {
        at(1, 0)
    }

    fn store() -> InMemoryStore {
        InMemoryStore::new()
            .with_algorithm(ALGORITHM, AlgorithmStatus::Approved)
            .with_order(Order::new(1, "PO-1", at(10, 17)).with_priority(Priority::High))
            .with_order(Order::new(2, "PO-2", at(12, 17)))
            .with_operation(
                Operation::new(11, 1, 2)
                    .with_duration_hours(4.0)
                    .with_capability(CapabilityRef::by_name("welding")),
            )
            .with_operation(
                Operation::new(12, 1, 1)
                    .with_duration_hours(3.0)
                    .with_capability(CapabilityRef::by_name("painting")),
            )
            .with_operation(Operation::new(21, 2, 1).with_duration_hours(2.0))
            .with_resource(Resource::new(5, "R1").with_capability(Capability::new(7, "welding")))
            .with_resource(Resource::new(6, "R2").with_capability(Capability::new(8, "painting")))
    }

    fn request() -> RunRequest {
        RunRequest::new(ALGORITHM)
            .with_params(SchedulingParams::new().with_overtime(true))
    }

    #[test]
    fn test_full_run() {
        let mut store = store();
        let report = Orchestrator::new()
            .execute(&mut store, &request(), now())
            .unwrap();

        assert_eq!(report.algorithm, ALGORITHM);
        assert_eq!(report.execution_time, now());
        assert_eq!(report.scheduled_operations, 3);
        assert_eq!(report.updated_orders, 2);
        assert_eq!(report.unassignable_operations, 0);
        assert_eq!(report.late_operations, 0);
        assert!(report.failed_operations.is_empty());

        // Order span was recomputed from the persisted windows
        let order = store.order(1).unwrap();
        assert_eq!(order.scheduled_end_date, Some(at(10, 17)));
        assert!(order.scheduled_start_date.unwrap() < at(10, 17));
    }

    #[test]
    fn test_policy_rejection_before_fetch() {
        let mut store = store().with_algorithm("draft-algo", AlgorithmStatus::Draft);
        let req = RunRequest::new("draft-algo");
        let err = Orchestrator::new()
            .execute(&mut store, &req, now())
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Policy { .. }));
        // Nothing was written
        assert!(store.order(1).unwrap().scheduled_start_date.is_none());
    }

    #[test]
    fn test_unknown_algorithm_is_store_error() {
        let mut store = store();
        let err = Orchestrator::new()
            .execute(&mut store, &RunRequest::new("missing"), now())
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Store(_)));
    }

    #[test]
    fn test_invalid_params_rejected_first() {
        // Bad params short-circuit even with an unknown algorithm
        let mut store = store();
        let req = RunRequest::new("missing")
            .with_params(SchedulingParams::new().with_working_hours(17, 8));
        let err = Orchestrator::new()
            .execute(&mut store, &req, now())
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Validation(_)));
    }

    #[test]
    fn test_invalid_input_rejected() {
        let mut store = store().with_operation(Operation::new(99, 1, 3).with_duration_hours(0.0));
        let err = Orchestrator::new()
            .execute(&mut store, &request(), now())
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Validation(_)));
        assert!(store.operation(11).unwrap().scheduled_start_date.is_none());
    }

    #[test]
    fn test_oversized_duration_rejected_before_scheduling() {
        // A finite but absurd duration must be caught by validation, not
        // blow up window arithmetic inside the scheduler
        let mut store = store().with_operation(Operation::new(99, 1, 3).with_duration_hours(1e15));
        let err = Orchestrator::new()
            .execute(&mut store, &request(), now())
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Validation(_)));
        assert!(store.operation(11).unwrap().scheduled_start_date.is_none());
    }

    #[test]
    fn test_order_scope_filters_operations() {
        let mut store = store();
        let req = request().with_scope(RunScope::orders(vec![2]));
        let report = Orchestrator::new()
            .execute(&mut store, &req, now())
            .unwrap();

        assert_eq!(report.scheduled_operations, 1);
        assert_eq!(report.updated_orders, 1);
        assert!(store.operation(11).unwrap().scheduled_start_date.is_none());
        assert!(store.operation(21).unwrap().scheduled_start_date.is_some());
    }

    #[test]
    fn test_resource_scope_can_make_operations_unassignable() {
        let mut store = store();
        // Only the welding resource in scope: the painting step is unplaced
        let req = request().with_scope(RunScope::orders(vec![1]).with_resources(vec![5]));
        let report = Orchestrator::new()
            .execute(&mut store, &req, now())
            .unwrap();

        assert_eq!(report.scheduled_operations, 1);
        assert_eq!(report.unassignable_operations, 1);
    }

    #[test]
    fn test_empty_run_rejected() {
        // No resource satisfies any operation → zero placements
        let mut store = InMemoryStore::new()
            .with_algorithm(ALGORITHM, AlgorithmStatus::Approved)
            .with_order(Order::new(1, "PO-1", at(10, 17)))
            .with_operation(
                Operation::new(11, 1, 1).with_capability(CapabilityRef::by_name("anodizing")),
            );
        let err = Orchestrator::new()
            .execute(&mut store, &request(), now())
            .unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::EmptyRun { operation_count: 1 }
        ));
    }

    #[test]
    fn test_empty_scope_completes_with_zero_counts() {
        let mut store = store();
        let req = request().with_scope(RunScope::orders(vec![999]));
        let report = Orchestrator::new()
            .execute(&mut store, &req, now())
            .unwrap();
        assert_eq!(report.scheduled_operations, 0);
        assert_eq!(report.updated_orders, 0);
    }

    #[test]
    fn test_partial_persist_failure_surfaced() {
        let mut store = store().with_failing_operation_write(12);
        let report = Orchestrator::new()
            .execute(&mut store, &request(), now())
            .unwrap();

        assert_eq!(report.failed_operations.len(), 1);
        assert_eq!(report.failed_operations[0].0, 12);
        assert_eq!(report.skipped_orders, vec![1]);
        // The untouched order still got its span
        assert_eq!(report.updated_orders, 1);
    }

    #[test]
    fn test_diagnostics_persisted_through_run() {
        // A 30h final step pushes the first step more than a day before
        // the due date, so its persisted diagnostics carry the early flag.
        let mut store = InMemoryStore::new()
            .with_algorithm(ALGORITHM, AlgorithmStatus::Approved)
            .with_order(Order::new(1, "PO-1", at(20, 17)))
            .with_operation(Operation::new(11, 1, 2).with_duration_hours(30.0))
            .with_operation(Operation::new(12, 1, 1).with_duration_hours(2.0))
            .with_resource(Resource::new(5, "R1"));

        let report = Orchestrator::new()
            .execute(&mut store, &request(), now())
            .unwrap();
        assert_eq!(report.late_operations, 0);

        let last = store.operation_diagnostics(11).unwrap();
        assert!(!last.is_early);
        let first = store.operation_diagnostics(12).unwrap();
        assert!(first.is_early);
        assert!(first.optimization_notes.contains("early"));
    }
}

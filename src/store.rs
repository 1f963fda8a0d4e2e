//! Persistence collaborator.
//!
//! The scheduler core never talks to a database directly; it consumes a
//! [`ScheduleStore`], a narrow read/write surface an adapter implements
//! over the surrounding system's data layer. The bundled
//! [`InMemoryStore`] backs the test suite and small embedded uses, and
//! can inject write failures to exercise partial-apply handling.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::models::{Diagnostics, Operation, Order, Resource};

/// Approval state of a scheduling algorithm.
///
/// Only `Approved` algorithms may run; anything else is rejected by the
/// orchestrator before data is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlgorithmStatus {
    /// Cleared for execution.
    Approved,
    /// Still being configured.
    Draft,
    /// Retired from use.
    Archived,
}

/// Fields the applier writes onto one operation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationUpdate {
    pub scheduled_start_date: DateTime<Utc>,
    pub scheduled_end_date: DateTime<Utc>,
    pub assigned_resource_id: i64,
    /// Present for fresh placements, absent for frozen ones.
    pub diagnostics: Option<Diagnostics>,
}

/// Fields the applier writes onto one order record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub scheduled_start_date: DateTime<Utc>,
    pub scheduled_end_date: DateTime<Utc>,
}

/// Read/write surface over the external data store.
///
/// Implementations carry no scheduling logic. Both fetch and persist calls
/// may fail; fetch failures abort a run, persist failures are collected by
/// the applier into a partial-failure report.
pub trait ScheduleStore {
    /// All production orders.
    fn fetch_orders(&self) -> Result<Vec<Order>, StoreError>;

    /// All operations.
    fn fetch_operations(&self) -> Result<Vec<Operation>, StoreError>;

    /// All resources.
    fn fetch_resources(&self) -> Result<Vec<Resource>, StoreError>;

    /// One operation by ID.
    fn fetch_operation(&self, id: i64) -> Result<Operation, StoreError>;

    /// Writes a placement onto an operation record.
    fn persist_operation(&mut self, id: i64, update: &OperationUpdate) -> Result<(), StoreError>;

    /// Writes a derived date span onto an order record.
    fn persist_order(&mut self, id: i64, update: &OrderUpdate) -> Result<(), StoreError>;

    /// Approval state of an algorithm.
    fn algorithm_status(&self, algorithm_id: &str) -> Result<AlgorithmStatus, StoreError>;
}

/// In-memory [`ScheduleStore`] for tests and embedded use.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    orders: Vec<Order>,
    operations: Vec<Operation>,
    resources: Vec<Resource>,
    algorithms: HashMap<String, AlgorithmStatus>,
    diagnostics: HashMap<i64, Diagnostics>,
    fail_operation_writes: HashSet<i64>,
    fail_order_writes: HashSet<i64>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an order.
    pub fn with_order(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }

    /// Adds an operation.
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Adds a resource.
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    /// Registers an algorithm with its approval state.
    pub fn with_algorithm(mut self, id: impl Into<String>, status: AlgorithmStatus) -> Self {
        self.algorithms.insert(id.into(), status);
        self
    }

    /// Makes writes to one operation fail, for partial-apply tests.
    pub fn with_failing_operation_write(mut self, operation_id: i64) -> Self {
        self.fail_operation_writes.insert(operation_id);
        self
    }

    /// Makes writes to one order fail.
    pub fn with_failing_order_write(mut self, order_id: i64) -> Self {
        self.fail_order_writes.insert(order_id);
        self
    }

    /// Current state of an order record.
    pub fn order(&self, id: i64) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    /// Current state of an operation record.
    pub fn operation(&self, id: i64) -> Option<&Operation> {
        self.operations.iter().find(|o| o.id == id)
    }

    /// Diagnostics last persisted for an operation.
    pub fn operation_diagnostics(&self, id: i64) -> Option<&Diagnostics> {
        self.diagnostics.get(&id)
    }
}

impl ScheduleStore for InMemoryStore {
    fn fetch_orders(&self) -> Result<Vec<Order>, StoreError> {
        Ok(self.orders.clone())
    }

    fn fetch_operations(&self) -> Result<Vec<Operation>, StoreError> {
        Ok(self.operations.clone())
    }

    fn fetch_resources(&self) -> Result<Vec<Resource>, StoreError> {
        Ok(self.resources.clone())
    }

    fn fetch_operation(&self, id: i64) -> Result<Operation, StoreError> {
        self.operation(id).cloned().ok_or(StoreError::NotFound {
            entity: "operation",
            id,
        })
    }

    fn persist_operation(&mut self, id: i64, update: &OperationUpdate) -> Result<(), StoreError> {
        if self.fail_operation_writes.contains(&id) {
            return Err(StoreError::WriteFailed(format!(
                "injected failure for operation {id}"
            )));
        }
        let op = self
            .operations
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::NotFound {
                entity: "operation",
                id,
            })?;
        op.scheduled_start_date = Some(update.scheduled_start_date);
        op.scheduled_end_date = Some(update.scheduled_end_date);
        op.assigned_resource_id = Some(update.assigned_resource_id);
        if let Some(diag) = &update.diagnostics {
            self.diagnostics.insert(id, diag.clone());
        }
        Ok(())
    }

    fn persist_order(&mut self, id: i64, update: &OrderUpdate) -> Result<(), StoreError> {
        if self.fail_order_writes.contains(&id) {
            return Err(StoreError::WriteFailed(format!(
                "injected failure for order {id}"
            )));
        }
        let order = self
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::NotFound {
                entity: "order",
                id,
            })?;
        order.scheduled_start_date = Some(update.scheduled_start_date);
        order.scheduled_end_date = Some(update.scheduled_end_date);
        Ok(())
    }

    fn algorithm_status(&self, algorithm_id: &str) -> Result<AlgorithmStatus, StoreError> {
        self.algorithms
            .get(algorithm_id)
            .copied()
            .ok_or_else(|| StoreError::UnknownAlgorithm(algorithm_id.to_string()))
    }
}

//! Operation model.
//!
//! An operation is the smallest schedulable unit of work: one step in an
//! order's routing. Operations are placed in **descending** `sequence`
//! order (last step first) because scheduling works backward from the
//! order's due date.
//!
//! The `scheduled_*` and `assigned_resource_id` fields play a dual role:
//! as input they hold the previous run's placement (consulted by the
//! frozen-horizon check), as output they receive the new placement via the
//! applier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CapabilityRef;

/// Fallback processing time when a record carries no estimate.
pub const DEFAULT_DURATION_HOURS: f64 = 4.0;

/// A single routing step of a production order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Unique operation identifier.
    pub id: i64,
    /// Parent order identifier.
    pub order_id: i64,
    /// Position within the order's routing.
    pub sequence: i32,
    /// Processing time in hours. `None` falls back to
    /// [`DEFAULT_DURATION_HOURS`]; explicit values must be positive.
    pub estimated_duration_hours: Option<f64>,
    /// Capabilities the assigned resource must possess (all of them).
    pub required_capabilities: Vec<CapabilityRef>,
    /// Start of the previous run's window, if any.
    pub scheduled_start_date: Option<DateTime<Utc>>,
    /// End of the previous run's window, if any.
    pub scheduled_end_date: Option<DateTime<Utc>>,
    /// Resource assigned by the previous run, if any.
    pub assigned_resource_id: Option<i64>,
}

impl Operation {
    /// Creates a new operation.
    pub fn new(id: i64, order_id: i64, sequence: i32) -> Self {
        Self {
            id,
            order_id,
            sequence,
            estimated_duration_hours: None,
            required_capabilities: Vec::new(),
            scheduled_start_date: None,
            scheduled_end_date: None,
            assigned_resource_id: None,
        }
    }

    /// Sets the estimated duration (hours).
    pub fn with_duration_hours(mut self, hours: f64) -> Self {
        self.estimated_duration_hours = Some(hours);
        self
    }

    /// Adds a required capability.
    pub fn with_capability(mut self, capability: CapabilityRef) -> Self {
        self.required_capabilities.push(capability);
        self
    }

    /// Sets a pre-existing placement from a prior run.
    pub fn with_prior_placement(
        mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        resource_id: i64,
    ) -> Self {
        self.scheduled_start_date = Some(start);
        self.scheduled_end_date = Some(end);
        self.assigned_resource_id = Some(resource_id);
        self
    }

    /// Effective processing time in hours.
    pub fn duration_hours(&self) -> f64 {
        self.estimated_duration_hours
            .unwrap_or(DEFAULT_DURATION_HOURS)
    }
}

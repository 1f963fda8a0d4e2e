//! Production order model.
//!
//! An order is the unit of demand the scheduler works against: it carries
//! the due date that anchors the backward pass and owns the operations of
//! one routing. Order-level scheduled dates are derived: the applier
//! recomputes them from operation windows after every run, they are never
//! hand-edited by the algorithm.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A production order (job) to be scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier.
    pub id: i64,
    /// Human-readable order number, unique within a dataset.
    pub order_number: String,
    /// Hard completion target the backward pass schedules against.
    pub due_date: DateTime<Utc>,
    /// Sort tie-breaker, never a hard constraint.
    pub priority: Priority,
    /// Derived: earliest operation start after the last run.
    pub scheduled_start_date: Option<DateTime<Utc>>,
    /// Derived: latest operation end after the last run.
    pub scheduled_end_date: Option<DateTime<Utc>>,
}

/// Order priority.
///
/// Orders are processed in ascending rank (critical first); within a rank,
/// earlier due dates come first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Order {
    /// Creates a new order.
    pub fn new(id: i64, order_number: impl Into<String>, due_date: DateTime<Utc>) -> Self {
        Self {
            id,
            order_number: order_number.into(),
            due_date,
            priority: Priority::Medium,
            scheduled_start_date: None,
            scheduled_end_date: None,
        }
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

impl Priority {
    /// Fixed sort rank: critical=0, high=1, medium=2, low=3.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Critical => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

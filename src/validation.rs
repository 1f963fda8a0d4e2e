//! Input validation for scheduling runs.
//!
//! Checks structural integrity of parameters, orders, operations, and
//! resources before a pass begins. Detects:
//! - Malformed parameters (hour bounds, negative or oversized buffer/horizon)
//! - Duplicate IDs
//! - Operations referencing unknown orders
//! - Non-positive or oversized explicit durations
//!
//! All issues are collected and returned together; nothing is scheduled
//! or written when validation fails.

use std::collections::HashSet;

use crate::models::{Operation, Order, Resource, SchedulingParams};

/// Upper bound (hours) for durations and buffer times.
///
/// Keeps every window computation within chrono's representable range;
/// values beyond this are data-entry faults, not real processing times.
pub const MAX_DURATION_HOURS: f64 = 10_000.0;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// An operation references an order that doesn't exist.
    UnknownOrder,
    /// An operation's explicit duration is zero or negative.
    NonPositiveDuration,
    /// An operation's explicit duration exceeds the supported range.
    DurationOutOfRange,
    /// A scheduling parameter is out of range.
    InvalidParameter,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates per-run parameters.
///
/// Checked before any data is fetched: hour-of-day bounds must satisfy
/// `start < end <= 23`, the buffer must be finite and within
/// `0..=MAX_DURATION_HOURS`, and the horizon must be non-negative.
pub fn validate_params(params: &SchedulingParams) -> ValidationResult {
    let mut errors = Vec::new();

    if params.working_hours_end > 23 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidParameter,
            format!(
                "working_hours_end must be at most 23, got {}",
                params.working_hours_end
            ),
        ));
    }
    if params.working_hours_start >= params.working_hours_end {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidParameter,
            format!(
                "working hours must satisfy start < end, got {}..{}",
                params.working_hours_start, params.working_hours_end
            ),
        ));
    }
    if !params.buffer_time_hours.is_finite()
        || params.buffer_time_hours < 0.0
        || params.buffer_time_hours > MAX_DURATION_HOURS
    {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidParameter,
            format!(
                "buffer_time_hours must be between 0 and {MAX_DURATION_HOURS}, got {}",
                params.buffer_time_hours
            ),
        ));
    }
    if params.frozen_horizon_days < 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidParameter,
            format!(
                "frozen_horizon_days must be non-negative, got {}",
                params.frozen_horizon_days
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates the fetched working set.
///
/// Checks:
/// 1. No duplicate order IDs or order numbers
/// 2. No duplicate operation IDs
/// 3. No duplicate resource IDs
/// 4. Every operation references an existing order
/// 5. Explicit durations are positive and within the supported range
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    orders: &[Order],
    operations: &[Operation],
    resources: &[Resource],
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut order_ids = HashSet::new();
    let mut order_numbers = HashSet::new();
    for order in orders {
        if !order_ids.insert(order.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("duplicate order ID: {}", order.id),
            ));
        }
        if !order_numbers.insert(order.order_number.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("duplicate order number: {}", order.order_number),
            ));
        }
    }

    let mut operation_ids = HashSet::new();
    for op in operations {
        if !operation_ids.insert(op.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("duplicate operation ID: {}", op.id),
            ));
        }
        if !order_ids.contains(&op.order_id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownOrder,
                format!("operation {} references unknown order {}", op.id, op.order_id),
            ));
        }
        if let Some(hours) = op.estimated_duration_hours {
            if !hours.is_finite() || hours <= 0.0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NonPositiveDuration,
                    format!("operation {} has non-positive duration {hours}", op.id),
                ));
            } else if hours > MAX_DURATION_HOURS {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DurationOutOfRange,
                    format!(
                        "operation {} duration {hours} exceeds the {MAX_DURATION_HOURS}h limit",
                        op.id
                    ),
                ));
            }
        }
    }

    let mut resource_ids = HashSet::new();
    for r in resources {
        if !resource_ids.insert(r.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("duplicate resource ID: {}", r.id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

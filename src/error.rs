//! Run-level error taxonomy.
//!
//! Every rejected run surfaces a structured error distinguishing
//! validation, policy, and runtime failure; no run silently succeeds with
//! zero effect on a non-empty input. Lateness is deliberately *not* an
//! error; it is a soft infeasibility carried in the diagnostics and the
//! run report.

use thiserror::Error;

use crate::store::AlgorithmStatus;
use crate::validation::ValidationError;

/// Why a scheduling run was rejected or aborted.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Malformed parameters or working set; nothing was written.
    #[error("invalid scheduling input: {}", describe(.0))]
    Validation(Vec<ValidationError>),

    /// The requested algorithm is not approved for execution.
    #[error("algorithm '{algorithm_id}' is not approved for execution (status: {status:?})")]
    Policy {
        algorithm_id: String,
        status: AlgorithmStatus,
    },

    /// The pass emitted zero windows for a non-empty operation set.
    #[error("no schedule generated for {operation_count} input operation(s)")]
    EmptyRun { operation_count: usize },

    /// The data store failed while fetching the working set.
    #[error("data store failure: {0}")]
    Store(#[from] StoreError),
}

/// Failures reported by a [`crate::store::ScheduleStore`] backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("unknown algorithm '{0}'")]
    UnknownAlgorithm(String),

    #[error("write failed: {0}")]
    WriteFailed(String),

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

fn describe(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

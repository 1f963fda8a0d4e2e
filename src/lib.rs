//! Finite-capacity backward scheduler for production orders.
//!
//! Plans each order backward from its due date: operations are placed in
//! reverse routing order onto capability-matched resources, separated by
//! buffer time and confined to working hours, so every order finishes as
//! late as possible without missing its deadline (ALAP). Placements from
//! earlier runs that start inside a frozen horizon are preserved verbatim.
//!
//! # Modules
//!
//! - **`models`**: Domain types (`Order`, `Operation`, `Resource`,
//!   `Capability`, `SchedulingParams`, `Placement`, `ScheduleRun`)
//! - **`scheduler`**: The backward placement pass and per-placement
//!   diagnostics (lateness, slack, bottleneck flags)
//! - **`matching`** / **`ranking`**: Capability eligibility and pluggable
//!   candidate ordering (`FirstCapable`, `LeastLoaded`)
//! - **`validation`**: Parameter and working-set integrity checks
//! - **`store`** / **`apply`**: Persistence seam and the two-phase writer
//!   that puts a run's windows back onto order/operation records
//! - **`orchestrator`**: End-to-end run driver covering the policy gate,
//!   validation, scoping, scheduling, apply, and the final run report
//! - **`error`**: Run-level error taxonomy
//!
//! # Architecture
//!
//! The placement pass is pure: it reads a working set and emits a
//! [`models::ScheduleRun`] without touching storage. All I/O goes through
//! the [`store::ScheduleStore`] trait, so the same core runs against a
//! database adapter or the bundled in-memory store. Runs are deterministic
//! for a given working set, parameters, and injected clock.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Blazewicz et al. (2019), "Handbook on Scheduling"

pub mod apply;
pub mod error;
pub mod matching;
pub mod models;
pub mod orchestrator;
pub mod ranking;
pub mod scheduler;
pub mod store;
pub mod validation;

pub use apply::{apply_run, ApplyReport};
pub use error::{ScheduleError, StoreError};
pub use orchestrator::{Orchestrator, RunReport, RunRequest, RunScope};
pub use scheduler::BackwardScheduler;

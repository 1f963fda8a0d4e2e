//! Scheduling domain models.
//!
//! Pure data types for the backward-scheduling problem: no behavior
//! beyond construction, accessors, and derived-field helpers.
//!
//! | Type | Role |
//! |------|------|
//! | `Order` | Due-date-driven production order (job) |
//! | `Operation` | One routing step of an order |
//! | `Resource` | Machine/work center that performs operations |
//! | `Capability` / `CapabilityRef` | Matching labels |
//! | `SchedulingParams` | Per-run tunables |
//! | `Placement` / `ScheduleRun` | Algorithm output |

mod capability;
mod operation;
mod order;
mod params;
mod placement;
mod resource;

pub use capability::{Capability, CapabilityRef};
pub use operation::{Operation, DEFAULT_DURATION_HOURS};
pub use order::{Order, Priority};
pub use params::SchedulingParams;
pub use placement::{
    Criticality, Diagnostics, Placement, RunStats, ScheduleRun, ScheduledOperation,
    UnplacedOperation,
};
pub use resource::{Resource, ResourceStatus};

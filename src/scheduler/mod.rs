//! Backward scheduling pass and diagnostics.
//!
//! `BackwardScheduler` is the core algorithm: a single deterministic batch
//! pass that walks each order's routing from its due date toward the
//! present. `diagnostics` annotates fresh placements with
//! earliness/lateness, bottleneck risk, and criticality.

mod backward;
pub mod diagnostics;

pub use backward::BackwardScheduler;

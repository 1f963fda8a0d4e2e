//! Per-placement optimization diagnostics.
//!
//! Every freshly placed operation is annotated with earliness/lateness
//! against its order's due date, a coarse bottleneck signal, and a
//! criticality level, plus a human-readable note string.
//!
//! | Flag | Condition |
//! |------|-----------|
//! | `is_early` | More than 24h of slack before the due date |
//! | `is_late` | Window ends after the due date |
//! | `is_bottleneck` | ≥ 3 placements on the assigned resource this run |
//! | `criticality` | Copied from critical/high orders, otherwise normal |
//!
//! Lateness is a soft infeasibility: the run still completes and persists,
//! but the flag is surfaced in the run report so a planner can intervene.

use chrono::{DateTime, Utc};

use crate::models::{Criticality, Diagnostics, Priority};

/// Slack threshold (hours) beyond which a placement counts as early.
const EARLY_SLACK_HOURS: f64 = 24.0;

/// Run-local placement count at which a resource counts as congested.
const BOTTLENECK_THRESHOLD: usize = 3;

/// Annotates one fresh placement.
///
/// `resource_placements` is the run-local placement count on the assigned
/// resource, including the placement being annotated.
pub fn annotate(
    window_end: DateTime<Utc>,
    due_date: DateTime<Utc>,
    resource_placements: usize,
    priority: Priority,
) -> Diagnostics {
    let time_variance_hours = round_hours(hours_between(window_end, due_date));
    let is_early = time_variance_hours > EARLY_SLACK_HOURS;
    let is_late = time_variance_hours < 0.0;
    let is_bottleneck = resource_placements >= BOTTLENECK_THRESHOLD;
    let criticality = match priority {
        Priority::Critical => Criticality::Critical,
        Priority::High => Criticality::High,
        Priority::Medium | Priority::Low => Criticality::Normal,
    };

    let mut notes: Vec<String> = Vec::new();
    if is_early {
        notes.push(format!(
            "early by {time_variance_hours}h: consider moving closer to the deadline to reduce WIP"
        ));
    }
    if is_late {
        notes.push(format!(
            "URGENT: ends {}h past the due date",
            -time_variance_hours
        ));
    }
    if is_bottleneck {
        notes.push(format!(
            "bottleneck risk: {resource_placements} operations on this resource"
        ));
    }
    if criticality != Criticality::Normal {
        notes.push(format!("{criticality:?}-priority order").to_lowercase());
    }

    Diagnostics {
        time_variance_hours,
        is_early,
        is_late,
        is_bottleneck,
        criticality,
        optimization_notes: notes.join("; "),
    }
}

/// Signed hours from `from` to `to` (positive when `to` is later).
pub fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_seconds() as f64 / 3600.0
}

/// Rounds to one decimal place.
fn round_hours(hours: f64) -> f64 {
    (hours * 10.0).round() / 10.0
}

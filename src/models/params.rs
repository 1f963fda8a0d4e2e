//! Per-run scheduling parameters.
//!
//! Tunable knobs for a single scheduling pass. Not persisted as domain
//! state; the caller supplies them with each run request.
//!
//! | Option | Effect |
//! |--------|--------|
//! | `frozen_horizon_*` | Prior placements starting within the horizon are left untouched |
//! | `buffer_time_hours` | Idle slack inserted before every computed window |
//! | `allow_overtime` | When `false`, windows are shifted into working hours |
//! | `working_hours_*` | Hour-of-day bounds used only when overtime is disallowed |

use serde::{Deserialize, Serialize};

/// Configuration for one backward-scheduling pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingParams {
    /// Whether the frozen near-term horizon is honored.
    pub frozen_horizon_enabled: bool,
    /// Horizon length in days from the run's reference time.
    pub frozen_horizon_days: i64,
    /// Idle slack (hours) before each operation.
    pub buffer_time_hours: f64,
    /// Whether windows may fall outside working hours.
    pub allow_overtime: bool,
    /// First working hour of day (0-23).
    pub working_hours_start: u32,
    /// Last working hour of day (1-23), exclusive end of the working window.
    pub working_hours_end: u32,
}

impl Default for SchedulingParams {
    fn default() -> Self {
        Self {
            frozen_horizon_enabled: false,
            frozen_horizon_days: 7,
            buffer_time_hours: 0.5,
            allow_overtime: false,
            working_hours_start: 8,
            working_hours_end: 17,
        }
    }
}

impl SchedulingParams {
    /// Creates parameters with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables the frozen horizon with the given length in days.
    pub fn with_frozen_horizon(mut self, days: i64) -> Self {
        self.frozen_horizon_enabled = true;
        self.frozen_horizon_days = days;
        self
    }

    /// Sets the buffer time (hours).
    pub fn with_buffer_hours(mut self, hours: f64) -> Self {
        self.buffer_time_hours = hours;
        self
    }

    /// Allows or disallows overtime.
    pub fn with_overtime(mut self, allow: bool) -> Self {
        self.allow_overtime = allow;
        self
    }

    /// Sets the working-hour window (hour-of-day bounds).
    pub fn with_working_hours(mut self, start: u32, end: u32) -> Self {
        self.working_hours_start = start;
        self.working_hours_end = end;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = SchedulingParams::default();
        assert!(!p.frozen_horizon_enabled);
        assert!((p.buffer_time_hours - 0.5).abs() < 1e-10);
        assert!(!p.allow_overtime);
        assert_eq!(p.working_hours_start, 8);
        assert_eq!(p.working_hours_end, 17);
    }

    #[test]
    fn test_builder() {
        let p = SchedulingParams::new()
            .with_frozen_horizon(3)
            .with_buffer_hours(1.0)
            .with_overtime(true)
            .with_working_hours(6, 22);

        assert!(p.frozen_horizon_enabled);
        assert_eq!(p.frozen_horizon_days, 3);
        assert!((p.buffer_time_hours - 1.0).abs() < 1e-10);
        assert!(p.allow_overtime);
        assert_eq!(p.working_hours_start, 6);
        assert_eq!(p.working_hours_end, 22);
    }

    #[test]
    fn test_partial_deserialization() {
        // Omitted fields fall back to defaults
        let p: SchedulingParams = serde_json::from_str("{}").unwrap();
        assert_eq!(p.working_hours_start, 8);

        let p2: SchedulingParams =
            serde_json::from_str(r#"{"buffer_time_hours": 2.0}"#).unwrap();
        assert!((p2.buffer_time_hours - 2.0).abs() < 1e-10);
        assert_eq!(p2.working_hours_end, 17);
    }
}

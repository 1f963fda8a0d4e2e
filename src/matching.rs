//! Capability matching.
//!
//! Decides whether a resource can perform an operation: every required
//! capability must be covered by the resource's capability set, matching
//! by ID or, for legacy records without IDs, by name.
//!
//! Pure functions; no state, no panics. An empty requirement set matches
//! any resource; an empty capability set fails any non-empty requirement.

use crate::models::{Capability, CapabilityRef, Resource};

/// Whether `resource` satisfies all of `required`.
pub fn is_eligible(resource: &Resource, required: &[CapabilityRef]) -> bool {
    required
        .iter()
        .all(|req| covers(&resource.capabilities, req))
}

/// Whether a capability set contains an entry matching the reference.
///
/// An ID match wins; a name match is the fallback for references missing
/// an ID. A reference carrying neither never matches.
fn covers(capabilities: &[Capability], required: &CapabilityRef) -> bool {
    capabilities.iter().any(|c| {
        let id_match = required.id.is_some_and(|id| id == c.id);
        let name_match = required.name.as_deref().is_some_and(|n| n == c.name);
        id_match || name_match
    })
}

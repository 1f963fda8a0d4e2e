//! Resource model.
//!
//! Resources are the entities that perform operations: machines, work
//! centers, crews. Only `Active` resources are eligible for assignment.
//!
//! No load state is persisted between runs; within a single run, utilization
//! is tracked transiently by counting placements per resource
//! (see `crate::ranking::ResourceLoad`).

use serde::{Deserialize, Serialize};

use super::Capability;

/// A resource that can be assigned to operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique resource identifier.
    pub id: i64,
    /// Human-readable name.
    pub name: String,
    /// Availability status.
    pub status: ResourceStatus,
    /// Capabilities this resource possesses.
    pub capabilities: Vec<Capability>,
}

/// Resource availability status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    /// Eligible for scheduling.
    Active,
    /// Taken out of service.
    Inactive,
    /// Temporarily unavailable.
    Maintenance,
}

impl Resource {
    /// Creates a new active resource.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: ResourceStatus::Active,
            capabilities: Vec::new(),
        }
    }

    /// Sets the status.
    pub fn with_status(mut self, status: ResourceStatus) -> Self {
        self.status = status;
        self
    }

    /// Adds a capability.
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.push(capability);
        self
    }

    /// Whether this resource may receive assignments.
    pub fn is_active(&self) -> bool {
        self.status == ResourceStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_builder() {
        let r = Resource::new(1, "Welding Cell 1")
            .with_capability(Capability::new(7, "welding").with_category("assembly"));

        assert_eq!(r.id, 1);
        assert_eq!(r.name, "Welding Cell 1");
        assert!(r.is_active());
        assert_eq!(r.capabilities.len(), 1);
    }

    #[test]
    fn test_resource_status() {
        let r = Resource::new(1, "M1").with_status(ResourceStatus::Maintenance);
        assert!(!r.is_active());

        let r2 = Resource::new(2, "M2").with_status(ResourceStatus::Inactive);
        assert!(!r2.is_active());
    }
}

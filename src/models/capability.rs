//! Capability model.
//!
//! Capabilities are pure labels used to match operations to resources:
//! an operation declares the capabilities it requires, a resource declares
//! the capabilities it possesses. Matching logic lives in `crate::matching`.

use serde::{Deserialize, Serialize};

/// A capability a resource possesses (e.g., "welding", "cnc-milling").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    /// Unique capability identifier.
    pub id: i64,
    /// Capability name, unique within a dataset.
    pub name: String,
    /// Free-text grouping (e.g., "machining", "assembly").
    pub category: String,
}

/// A reference to a required capability, by ID and/or name.
///
/// Legacy operation records sometimes carry only a capability name;
/// the name acts as a matching fallback when the ID is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapabilityRef {
    /// Referenced capability ID, if known.
    pub id: Option<i64>,
    /// Referenced capability name, if known.
    pub name: Option<String>,
}

impl Capability {
    /// Creates a new capability.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            category: String::new(),
        }
    }

    /// Sets the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

impl CapabilityRef {
    /// Creates a reference by capability ID.
    pub fn by_id(id: i64) -> Self {
        Self {
            id: Some(id),
            name: None,
        }
    }

    /// Creates a reference by capability name.
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }

    /// Creates a fully-qualified reference.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: Some(name.into()),
        }
    }

    /// Whether this reference carries neither an ID nor a name.
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_none()
    }
}

//! Instance Counter Registry
//!
//! Per-scope bookkeeping of how many instances of each device label have been
//! created. A label must be registered before it can be counted: the R/L/C
//! primitives are registered when a scope is created, sub-circuit names when
//! the sub-circuit is added to the scope.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::SpiceGenError;
use crate::netlist::device::DeviceKind;

/// Label -> count mapping plus the running total of the scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstanceCounter {
    counts: BTreeMap<String, u32>,
    total: u64,
}

impl InstanceCounter {
    /// Create an empty registry with no labels at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with `R`, `L` and `C` registered at zero.
    pub fn with_primitives() -> Self {
        let mut counter = Self::new();
        for kind in DeviceKind::ALL {
            counter.register(kind.label());
        }
        counter
    }

    /// Register `label` with a count of zero. Registering twice is a no-op.
    pub fn register(&mut self, label: &str) {
        self.counts.entry(label.to_string()).or_insert(0);
    }

    /// Bump the count of `label` and the scope total, returning the new count.
    pub fn increment(&mut self, label: &str) -> Result<u32, SpiceGenError> {
        let count = self
            .counts
            .get_mut(label)
            .ok_or_else(|| SpiceGenError::UnregisteredLabel(label.to_string()))?;
        *count += 1;
        self.total += 1;
        Ok(*count)
    }

    /// Whether `label` has been registered in this scope.
    pub fn contains(&self, label: &str) -> bool {
        self.counts.contains_key(label)
    }

    /// Current count of `label`, `None` if it was never registered.
    pub fn count(&self, label: &str) -> Option<u32> {
        self.counts.get(label).copied()
    }

    /// Sum of every increment ever applied in this scope.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Iterate labels and counts in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(label, count)| (label.as_str(), *count))
    }
}

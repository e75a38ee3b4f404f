//! Netlist scope
//!
//! A scope owns a counter registry, its device lines in creation order and the
//! sub-circuits registered in it. Both the root netlist and every sub-circuit
//! body are scopes; instance numbering never crosses a scope boundary.

use serde::Serialize;

use crate::core::SpiceGenError;
use crate::netlist::device::{DeviceInstance, DeviceKind, RlcInstance, SubcircuitInstance};
use crate::netlist::registry::InstanceCounter;
use crate::netlist::subcircuit::SubCircuit;

/// Electrical netlist containing sub-circuits and devices
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Netlist {
    counter: InstanceCounter,
    devices: Vec<DeviceInstance>,
    subcircuits: Vec<SubCircuit>,
}

impl Default for Netlist {
    fn default() -> Self {
        Self::new()
    }
}

impl Netlist {
    /// Create an empty scope with the R/L/C counters at zero.
    pub fn new() -> Self {
        Self {
            counter: InstanceCounter::with_primitives(),
            devices: Vec::new(),
            subcircuits: Vec::new(),
        }
    }

    /// Device instances in creation order.
    pub fn devices(&self) -> &[DeviceInstance] {
        &self.devices
    }

    /// Rendered device lines in creation order.
    pub fn device_lines(&self) -> Vec<String> {
        self.devices.iter().map(|d| d.to_string()).collect()
    }

    /// Sub-circuits in registration order.
    pub fn subcircuits(&self) -> &[SubCircuit] {
        &self.subcircuits
    }

    pub fn subcircuit(&self, name: &str) -> Option<&SubCircuit> {
        self.subcircuits.iter().find(|s| s.name() == name)
    }

    pub fn subcircuit_names(&self) -> Vec<&str> {
        self.subcircuits.iter().map(|s| s.name()).collect()
    }

    pub fn counter(&self) -> &InstanceCounter {
        &self.counter
    }

    /// Instances created so far for `label` (`R`, `L`, `C` or a sub-circuit name).
    pub fn instance_count(&self, label: &str) -> Option<u32> {
        self.counter.count(label)
    }

    pub fn total_instance_count(&self) -> u64 {
        self.counter.total()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty() && self.subcircuits.is_empty()
    }

    /// Register `subcircuit` in this scope so it can be instantiated here.
    ///
    /// Names are unique per scope and may not reuse a primitive label
    /// (`R`, `L`, `C`); the original registration is kept when a duplicate
    /// is rejected.
    pub fn add_subcircuit(&mut self, subcircuit: SubCircuit) -> Result<(), SpiceGenError> {
        if self.counter.contains(subcircuit.name()) {
            return Err(SpiceGenError::DuplicateRegistration(
                subcircuit.name().to_string(),
            ));
        }

        self.counter.register(subcircuit.name());
        tracing::info!(
            subcircuit = subcircuit.name(),
            external_nodes = subcircuit.external_nodes().len(),
            "registered sub-circuit"
        );
        self.subcircuits.push(subcircuit);
        Ok(())
    }

    /// Create a new R, L or C instance on `nodes`.
    ///
    /// `device` must be exactly `"R"`, `"L"` or `"C"`.
    pub fn create_rlc_instance<I, S>(
        &mut self,
        device: &str,
        nodes: I,
        value: f64,
    ) -> Result<&DeviceInstance, SpiceGenError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let kind: DeviceKind = device.parse()?;
        let index = self.counter.increment(kind.label())?;

        let instance = DeviceInstance::Rlc(RlcInstance {
            kind,
            index,
            nodes: nodes.into_iter().map(Into::into).collect(),
            value,
        });
        Ok(self.push(instance))
    }

    /// Create a new instance of the sub-circuit registered here as `subcircuit`.
    ///
    /// The instance name is built from the registered sub-circuit's suffix.
    /// Counters are left untouched when the name is not registered.
    pub fn create_subcircuit_instance<I, S>(
        &mut self,
        subcircuit: &str,
        nodes: I,
    ) -> Result<&DeviceInstance, SpiceGenError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let suffix = self
            .subcircuit(subcircuit)
            .map(|s| s.suffix().to_string())
            .ok_or_else(|| SpiceGenError::UnregisteredSubcircuit(subcircuit.to_string()))?;
        let index = self.counter.increment(subcircuit)?;

        let instance = DeviceInstance::Subcircuit(SubcircuitInstance {
            suffix,
            index,
            nodes: nodes.into_iter().map(Into::into).collect(),
            subcircuit: subcircuit.to_string(),
        });
        Ok(self.push(instance))
    }

    fn push(&mut self, instance: DeviceInstance) -> &DeviceInstance {
        tracing::debug!(line = %instance, "created instance");
        self.devices.push(instance);
        &self.devices[self.devices.len() - 1]
    }
}

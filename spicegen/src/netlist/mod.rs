pub mod device;
pub mod registry;
pub mod scope;
pub mod subcircuit;

// Re-export for convenience
pub use device::{format_value, DeviceInstance, DeviceKind, RlcInstance, SubcircuitInstance};
pub use registry::InstanceCounter;
pub use scope::Netlist;
pub use subcircuit::{SubCircuit, ENDS_DIRECTIVE, SUBCIRCUIT_DIRECTIVE};

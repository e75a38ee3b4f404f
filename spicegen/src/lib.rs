//! SpiceGen - hierarchical SPICE netlist builder and parser
//!
//! This library models an electrical netlist as a tree of scopes holding
//! R/L/C devices and nested sub-circuits, writes it in the line-oriented
//! netlist format read by circuit simulators, and loads that format back.
//!
//! # Quick Start
//!
//! ```no_run
//! use spicegen::{Netlist, SubCircuit};
//! use std::path::Path;
//!
//! let mut amp = SubCircuit::new("OPAMP", ["in", "out"], "AMP");
//! amp.create_rlc_instance("R", ["in", "out"], 10e3).unwrap();
//!
//! let mut netlist = Netlist::new();
//! netlist.add_subcircuit(amp).unwrap();
//! netlist.create_subcircuit_instance("OPAMP", ["vin", "vout"]).unwrap();
//! netlist.create_rlc_instance("C", ["vout", "0"], 1e-9).unwrap();
//!
//! spicegen::write_netlist(Path::new("netlist.cir"), &netlist).unwrap();
//! ```
//!
//! # Features
//!
//! - **Scoped numbering**: `R1`, `C2`, `X_AMP_00001` counted per scope
//! - **Nested sub-circuits**: definitions are written before their usages
//! - **Loader**: single-pass parser for sub-circuit and netlist files

pub mod core;
pub mod netlist;
pub mod parser;
pub mod writer;

// Re-export main types
pub use crate::core::{
    discover_netlist_files, ParseOptions, SpiceGenCore, SpiceGenError, UnrecognizedLine,
    WriteMode, WriteOptions,
};
pub use netlist::{
    format_value, DeviceInstance, DeviceKind, InstanceCounter, Netlist, RlcInstance, SubCircuit,
    SubcircuitInstance,
};
pub use parser::{LoadReport, SpiceParser};
pub use writer::{Destination, NetlistWriter};

/// Load a sub-circuit file with default options (convenience wrapper).
pub fn load_subcircuit(path: &std::path::Path) -> Result<SubCircuit, SpiceGenError> {
    SpiceParser::new(ParseOptions::default()).load(path)
}

/// Write a netlist file with default options (convenience wrapper).
pub fn write_netlist(path: &std::path::Path, netlist: &Netlist) -> Result<(), SpiceGenError> {
    SpiceGenCore::write_netlist(path, netlist, &WriteOptions::default())
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        DeviceInstance, DeviceKind, LoadReport, Netlist, ParseOptions, SpiceGenCore,
        SpiceGenError, SpiceParser, SubCircuit, WriteMode, WriteOptions,
    };
}

//! Sub-circuit: a named, instantiable netlist fragment.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::core::SpiceGenError;
use crate::netlist::device::DeviceInstance;
use crate::netlist::scope::Netlist;

/// Opening directive written by the serializer.
pub const SUBCIRCUIT_DIRECTIVE: &str = ".SUBCIRCUIT";
/// Closing directive.
pub const ENDS_DIRECTIVE: &str = ".ENDS";

/// A sub-circuit definition: identity plus its own netlist scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubCircuit {
    name: String,
    external_nodes: Vec<String>,
    suffix: String,
    comment: Option<String>,
    source_path: Option<PathBuf>,
    netlist: Netlist,
}

impl SubCircuit {
    /// Create an empty sub-circuit.
    ///
    /// `suffix` is used to name its instances: `X_<suffix>_<index>`.
    pub fn new<I, S>(name: impl Into<String>, external_nodes: I, suffix: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            external_nodes: external_nodes.into_iter().map(Into::into).collect(),
            suffix: suffix.into(),
            comment: None,
            source_path: None,
            netlist: Netlist::new(),
        }
    }

    /// Attach a comment written right before the definition.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        let comment = comment.into();
        self.comment = if comment.is_empty() { None } else { Some(comment) };
        self
    }

    /// Replace the instancing suffix before the sub-circuit is registered.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn external_nodes(&self) -> &[String] {
        &self.external_nodes
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// File this sub-circuit was loaded from, if it came from the parser.
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// The sub-circuit body.
    pub fn netlist(&self) -> &Netlist {
        &self.netlist
    }

    pub fn netlist_mut(&mut self) -> &mut Netlist {
        &mut self.netlist
    }

    pub fn devices(&self) -> &[DeviceInstance] {
        self.netlist.devices()
    }

    /// Nested sub-circuits in registration order.
    pub fn subcircuits(&self) -> &[SubCircuit] {
        self.netlist.subcircuits()
    }

    pub fn add_subcircuit(&mut self, subcircuit: SubCircuit) -> Result<(), SpiceGenError> {
        self.netlist.add_subcircuit(subcircuit)
    }

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
        self.netlist.create_rlc_instance(device, nodes, value)
    }

    pub fn create_subcircuit_instance<I, S>(
        &mut self,
        subcircuit: &str,
        nodes: I,
    ) -> Result<&DeviceInstance, SpiceGenError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.netlist.create_subcircuit_instance(subcircuit, nodes)
    }

    /// `.SUBCIRCUIT <name> <external nodes>`
    pub fn start_line(&self) -> String {
        let mut line = format!("{} {}", SUBCIRCUIT_DIRECTIVE, self.name);
        for node in &self.external_nodes {
            line.push(' ');
            line.push_str(node);
        }
        line
    }

    /// `.ENDS <name>`
    pub fn end_line(&self) -> String {
        format!("{} {}", ENDS_DIRECTIVE, self.name)
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_external_nodes(&mut self, nodes: Vec<String>) {
        self.external_nodes = nodes;
    }

    pub(crate) fn set_suffix(&mut self, suffix: String) {
        self.suffix = suffix;
    }

    pub(crate) fn set_source_path(&mut self, path: Option<PathBuf>) {
        self.source_path = path;
    }
}

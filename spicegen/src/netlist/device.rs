//! Device instance records
//!
//! Instances are stored as structured records and rendered to their netlist
//! line through `Display`:
//! - `<R|L|C><index> <node>... <value:%.6e>`
//! - `X_<suffix>_<index:05> <node>... <subcircuit-name>`

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::core::SpiceGenError;

/// Width of the zero-padded index in sub-circuit instance names.
pub const INSTANCE_INDEX_WIDTH: usize = 5;

/// Primitive device type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeviceKind {
    /// Resistance, value in Ohm
    Resistor,
    /// Inductance, value in Henry
    Inductor,
    /// Capacitance, value in Farad
    Capacitor,
}

impl DeviceKind {
    pub const ALL: [DeviceKind; 3] = [
        DeviceKind::Resistor,
        DeviceKind::Inductor,
        DeviceKind::Capacitor,
    ];

    /// Single-letter netlist label.
    pub fn label(&self) -> &'static str {
        match self {
            DeviceKind::Resistor => "R",
            DeviceKind::Inductor => "L",
            DeviceKind::Capacitor => "C",
        }
    }

    /// Kind for the first character of an instance name, if it is a primitive.
    pub fn from_prefix(c: char) -> Option<Self> {
        match c {
            'R' => Some(DeviceKind::Resistor),
            'L' => Some(DeviceKind::Inductor),
            'C' => Some(DeviceKind::Capacitor),
            _ => None,
        }
    }
}

impl FromStr for DeviceKind {
    type Err = SpiceGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => DeviceKind::from_prefix(c)
                .ok_or_else(|| SpiceGenError::InvalidDeviceType(s.to_string())),
            _ => Err(SpiceGenError::InvalidDeviceType(s.to_string())),
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One R, L or C occurrence in a scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RlcInstance {
    pub kind: DeviceKind,
    /// 1-based, local to the owning scope and kind
    pub index: u32,
    pub nodes: Vec<String>,
    pub value: f64,
}

/// One usage of a registered sub-circuit in a scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubcircuitInstance {
    pub suffix: String,
    /// 1-based, local to the owning scope and sub-circuit name
    pub index: u32,
    pub nodes: Vec<String>,
    pub subcircuit: String,
}

impl SubcircuitInstance {
    /// Instance designator, e.g. `X_AMP_00001`.
    pub fn designator(&self) -> String {
        format!(
            "X_{}_{:0width$}",
            self.suffix,
            self.index,
            width = INSTANCE_INDEX_WIDTH
        )
    }
}

/// A device line owned by a scope, in creation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum DeviceInstance {
    Rlc(RlcInstance),
    Subcircuit(SubcircuitInstance),
}

impl DeviceInstance {
    /// Registry label this instance was counted under.
    pub fn label(&self) -> &str {
        match self {
            DeviceInstance::Rlc(rlc) => rlc.kind.label(),
            DeviceInstance::Subcircuit(x) => &x.subcircuit,
        }
    }

    pub fn index(&self) -> u32 {
        match self {
            DeviceInstance::Rlc(rlc) => rlc.index,
            DeviceInstance::Subcircuit(x) => x.index,
        }
    }

    pub fn nodes(&self) -> &[String] {
        match self {
            DeviceInstance::Rlc(rlc) => &rlc.nodes,
            DeviceInstance::Subcircuit(x) => &x.nodes,
        }
    }

    /// The R/L/C record, if this is a primitive device.
    pub fn as_rlc(&self) -> Option<&RlcInstance> {
        match self {
            DeviceInstance::Rlc(rlc) => Some(rlc),
            _ => None,
        }
    }

    /// The sub-circuit usage record, if this is an `X` line.
    pub fn as_subcircuit(&self) -> Option<&SubcircuitInstance> {
        match self {
            DeviceInstance::Subcircuit(x) => Some(x),
            _ => None,
        }
    }
}

impl fmt::Display for DeviceInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (head, tail) = match self {
            DeviceInstance::Rlc(rlc) => (
                format!("{}{}", rlc.kind.label(), rlc.index),
                format_value(rlc.value),
            ),
            DeviceInstance::Subcircuit(x) => (x.designator(), x.subcircuit.clone()),
        };
        write!(f, "{}", head)?;
        for node in self.nodes() {
            write!(f, " {}", node)?;
        }
        write!(f, " {}", tail)
    }
}

/// Format a value the way C's `%.6e` does: `1.000000e+03`, `4.700000e-09`.
///
/// The simulator expects a signed exponent of at least two digits, which
/// Rust's `{:e}` does not produce on its own.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let raw = format!("{:.6e}", value);
    let (mantissa, exponent) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{}e{}{:02}", mantissa, sign, exponent.abs())
}

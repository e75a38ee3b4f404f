//! Line classification for the netlist text format.
//!
//! A line is classified by the first character of its first token only:
//! `R`/`L`/`C` primitives, `X` sub-circuit instances, `.` directives and `*`
//! comments. Everything else is unrecognized.

use crate::netlist::{DeviceKind, ENDS_DIRECTIVE, SUBCIRCUIT_DIRECTIVE};

/// Alternative spelling of the opening directive accepted on input.
pub const SUBCKT_DIRECTIVE: &str = ".SUBCKT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    Rlc(DeviceKind),
    Instance,
    SubcircuitStart,
    SubcircuitEnd,
    /// Any other `.` directive; ignored.
    Directive,
    Unknown,
}

/// Classify a tokenized line.
pub fn classify(tokens: &[&str]) -> LineKind {
    let Some(first) = tokens.first() else {
        return LineKind::Blank;
    };
    let Some(c) = first.chars().next() else {
        return LineKind::Blank;
    };

    if let Some(kind) = DeviceKind::from_prefix(c) {
        return LineKind::Rlc(kind);
    }
    match c {
        'X' => LineKind::Instance,
        '*' => LineKind::Comment,
        '.' => {
            if is_subcircuit_start(first) {
                LineKind::SubcircuitStart
            } else if first.eq_ignore_ascii_case(ENDS_DIRECTIVE) {
                LineKind::SubcircuitEnd
            } else {
                LineKind::Directive
            }
        }
        _ => LineKind::Unknown,
    }
}

pub fn is_subcircuit_start(token: &str) -> bool {
    token.eq_ignore_ascii_case(SUBCIRCUIT_DIRECTIVE) || token.eq_ignore_ascii_case(SUBCKT_DIRECTIVE)
}

/// Recover the suffix from an instance designator: `X_AMP_00001` -> `AMP`.
pub fn suffix_from_designator(designator: &str) -> Option<&str> {
    let rest = designator.strip_prefix("X_")?;
    let (suffix, index) = rest.rsplit_once('_')?;
    if !index.is_empty() && index.chars().all(|c| c.is_ascii_digit()) {
        Some(suffix)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(line: &str) -> LineKind {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        classify(&tokens)
    }

    #[test]
    fn test_classify() {
        assert_eq!(kind("R1 a b 1.0"), LineKind::Rlc(DeviceKind::Resistor));
        assert_eq!(kind("L12 a b 1e-6"), LineKind::Rlc(DeviceKind::Inductor));
        assert_eq!(kind("C3 a 0 1p"), LineKind::Rlc(DeviceKind::Capacitor));
        assert_eq!(kind("X_AMP_00001 in out OPAMP"), LineKind::Instance);
        assert_eq!(kind(".SUBCIRCUIT OPAMP in out"), LineKind::SubcircuitStart);
        assert_eq!(kind(".subckt opamp in out"), LineKind::SubcircuitStart);
        assert_eq!(kind(".ENDS OPAMP"), LineKind::SubcircuitEnd);
        assert_eq!(kind(".ends"), LineKind::SubcircuitEnd);
        assert_eq!(kind(".TRAN 1n 1u"), LineKind::Directive);
        assert_eq!(kind("*** Instances"), LineKind::Comment);
        assert_eq!(kind(""), LineKind::Blank);
        assert_eq!(kind("   \t  "), LineKind::Blank);
        assert_eq!(kind("Q1 c b e NPN"), LineKind::Unknown);
        assert_eq!(kind("r1 a b 1.0"), LineKind::Unknown);
    }

    #[test]
    fn test_suffix_from_designator() {
        assert_eq!(suffix_from_designator("X_AMP_00001"), Some("AMP"));
        assert_eq!(suffix_from_designator("X_LOW_PASS_00012"), Some("LOW_PASS"));
        assert_eq!(suffix_from_designator("X__00001"), Some(""));
        assert_eq!(suffix_from_designator("X1"), None);
        assert_eq!(suffix_from_designator("X_AMP_first"), None);
    }
}

//! Core netlist file logic shared by library users and the CLI.
//! Errors, options and the file-level entry points.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::netlist::{Netlist, SubCircuit};
use crate::parser::{LoadReport, SpiceParser};
use crate::writer::NetlistWriter;

#[derive(Debug, thiserror::Error)]
pub enum SpiceGenError {
    #[error("Invalid argument: expected {expected}, found `{found}`")]
    InvalidArgumentType { expected: &'static str, found: String },
    #[error("Invalid device type `{0}`: device must be in [R, L, C]")]
    InvalidDeviceType(String),
    #[error("{0} does not exist as a subcircuit (use add_subcircuit to register it first)")]
    UnregisteredSubcircuit(String),
    #[error("Label {0} is not registered in this scope")]
    UnregisteredLabel(String),
    #[error("Subcircuit {0} is already registered in this scope")]
    DuplicateRegistration(String),
    #[error("Write operation on closed destination")]
    ClosedDestination,
    #[error("Truncated input: {origin} ended before {expected}")]
    TruncatedInput { origin: String, expected: String },
    #[error(transparent)]
    UnrecognizedLine(#[from] UnrecognizedLine),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A line the parser could not classify. Reported and skipped unless
/// parsing is strict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("Line {line}: unidentified component `{text}`")]
pub struct UnrecognizedLine {
    /// 1-based line number in the source
    pub line: usize,
    pub text: String,
}

/// How `write_all` reaches a file destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteMode {
    /// Header truncates the file, sub-circuits and instances are appended in
    /// two more passes.
    ThreePass,
    /// One buffered pass producing the same bytes.
    Buffered,
}

/// Options for serializing a netlist.
#[derive(Clone, Debug)]
pub struct WriteOptions {
    /// Simulator named in `*** Generated for: ...`
    pub target: String,
    /// Tool named in `*** By: ...`
    pub generator: String,
    /// Header timestamp; local time at write when unset.
    pub timestamp: Option<NaiveDateTime>,
    pub mode: WriteMode,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            target: "SPICE".to_string(),
            generator: "spicegen".to_string(),
            timestamp: None,
            mode: WriteMode::ThreePass,
        }
    }
}

/// Options for loading a sub-circuit file.
///
/// Unset fields are taken from the `.SUBCIRCUIT` header line.
#[derive(Clone, Debug, Default)]
pub struct ParseOptions {
    pub external_nodes: Vec<String>,
    pub name: Option<String>,
    pub suffix: Option<String>,
    /// Fail on the first unrecognized line instead of reporting it.
    pub strict: bool,
}

/// File extensions treated as netlists when scanning a directory.
pub const NETLIST_EXTENSIONS: [&str; 4] = ["cir", "sp", "spi", "net"];

/// Recursively discover netlist files in a directory.
pub fn discover_netlist_files(dir: &Path) -> Result<Vec<PathBuf>, SpiceGenError> {
    let mut files = Vec::new();
    walk_dir(dir, &mut files, 0)?;
    files.sort();
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>, depth: usize) -> Result<(), SpiceGenError> {
    if depth > 20 {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if name.starts_with('.') || name == "target" {
                continue;
            }
            walk_dir(&path, files, depth + 1)?;
        } else if path.is_file() {
            let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
            if NETLIST_EXTENSIONS.contains(&ext) {
                files.push(path);
            }
        }
    }
    Ok(())
}

/// File-level API used by both library users and the CLI.
pub struct SpiceGenCore;

impl SpiceGenCore {
    /// Write header, sub-circuits and instances of `netlist` to `path`.
    ///
    /// On failure the file may be left partially written.
    pub fn write_netlist(
        path: &Path,
        netlist: &Netlist,
        options: &WriteOptions,
    ) -> Result<(), SpiceGenError> {
        NetlistWriter::new(netlist, options).write_to_path(path)
    }

    /// Load a sub-circuit definition from a `.cir` file.
    pub fn load_subcircuit(
        path: &Path,
        options: ParseOptions,
    ) -> Result<(SubCircuit, LoadReport), SpiceGenError> {
        let mut parser = SpiceParser::new(options);
        let subcircuit = parser.load(path)?;
        Ok((subcircuit, parser.into_report()))
    }

    /// Load a whole netlist file (definitions and top-level instances).
    pub fn load_netlist(
        path: &Path,
        options: ParseOptions,
    ) -> Result<(Netlist, LoadReport), SpiceGenError> {
        let mut parser = SpiceParser::new(options);
        let netlist = parser.load_netlist(path)?;
        Ok((netlist, parser.into_report()))
    }

    /// Re-serialize a netlist file, returning the load report.
    pub fn reformat(
        input: &Path,
        output: &Path,
        parse: ParseOptions,
        write: &WriteOptions,
    ) -> Result<LoadReport, SpiceGenError> {
        let (netlist, report) = Self::load_netlist(input, parse)?;
        Self::write_netlist(output, &netlist, write)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_write_options() {
        let options = WriteOptions::default();
        assert_eq!(options.target, "SPICE");
        assert_eq!(options.mode, WriteMode::ThreePass);
        assert!(options.timestamp.is_none());
    }

    #[test]
    fn test_error_messages() {
        let err = SpiceGenError::UnregisteredSubcircuit("OPAMP".into());
        assert!(err.to_string().contains("OPAMP does not exist as a subcircuit"));

        let err: SpiceGenError = UnrecognizedLine {
            line: 7,
            text: "Q1 c b e".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Line 7: unidentified component `Q1 c b e`");
    }

    #[test]
    fn test_discover_netlist_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("top.cir"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("lib")).unwrap();
        std::fs::write(dir.path().join("lib").join("amp.sp"), "").unwrap();
        std::fs::create_dir(dir.path().join(".hidden")).unwrap();
        std::fs::write(dir.path().join(".hidden").join("skip.cir"), "").unwrap();

        let files = discover_netlist_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(names.len(), 2);
        assert!(names.contains(&"top.cir".to_string()));
        assert!(names.contains(&"amp.sp".to_string()));
    }
}

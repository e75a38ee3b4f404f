//! Single-pass loader for the netlist text format written by [`crate::writer`].
//!
//! Lines of a body are classified as they are read. Instance lines are kept
//! until the body's `.ENDS` so that sub-circuits defined later in the same
//! body (the writer emits definitions after the instance lines) are
//! registered before the instances that use them are created again.

use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use crate::core::{ParseOptions, SpiceGenError, UnrecognizedLine};
use crate::netlist::{DeviceKind, Netlist, SubCircuit, ENDS_DIRECTIVE, SUBCIRCUIT_DIRECTIVE};
use crate::parser::classify::{classify, suffix_from_designator, LineKind};

/// What a load saw besides the model itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub origin: Option<PathBuf>,
    pub lines_read: usize,
    pub unrecognized: Vec<UnrecognizedLine>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.unrecognized.is_empty()
    }
}

struct SourceLines<R> {
    lines: Lines<R>,
    number: usize,
}

impl<R: BufRead> SourceLines<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            number: 0,
        }
    }

    fn next_line(&mut self) -> Result<Option<(usize, String)>, SpiceGenError> {
        match self.lines.next() {
            Some(line) => {
                self.number += 1;
                Ok(Some((self.number, line?)))
            }
            None => Ok(None),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Terminator<'a> {
    Eof,
    Ends(&'a str),
}

/// A device line waiting for its body to close.
#[derive(Debug)]
enum Pending {
    Rlc {
        kind: DeviceKind,
        nodes: Vec<String>,
        value: f64,
    },
    Instance {
        designator: String,
        nodes: Vec<String>,
        subcircuit: String,
    },
}

impl Pending {
    fn suffix_for(&self, name: &str) -> Option<&str> {
        match self {
            Pending::Instance {
                designator,
                subcircuit,
                ..
            } if subcircuit == name => suffix_from_designator(designator),
            _ => None,
        }
    }
}

/// Stateful netlist parser. Collects unrecognized lines across loads.
pub struct SpiceParser {
    options: ParseOptions,
    report: LoadReport,
}

impl SpiceParser {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            report: LoadReport::default(),
        }
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn into_report(self) -> LoadReport {
        self.report
    }

    /// Load a sub-circuit from a file whose first significant line is its
    /// `.SUBCIRCUIT` header.
    pub fn load(&mut self, path: &Path) -> Result<SubCircuit, SpiceGenError> {
        let mut subcircuit = SubCircuit::new("", Vec::<String>::new(), "");
        self.load_into(&mut subcircuit, path)?;
        Ok(subcircuit)
    }

    /// Load a file into an existing sub-circuit. Sub-circuits already
    /// registered in `target` can be instantiated by the file.
    pub fn load_into(&mut self, target: &mut SubCircuit, path: &Path) -> Result<(), SpiceGenError> {
        let file = File::open(path)?;
        self.parse_subcircuit_into(BufReader::new(file), path, target)
    }

    pub fn parse_subcircuit<R: BufRead>(
        &mut self,
        reader: R,
        origin: &Path,
    ) -> Result<SubCircuit, SpiceGenError> {
        let mut subcircuit = SubCircuit::new("", Vec::<String>::new(), "");
        self.parse_subcircuit_into(reader, origin, &mut subcircuit)?;
        Ok(subcircuit)
    }

    pub fn parse_subcircuit_into<R: BufRead>(
        &mut self,
        reader: R,
        origin: &Path,
        target: &mut SubCircuit,
    ) -> Result<(), SpiceGenError> {
        self.report.origin = Some(origin.to_path_buf());
        let mut lines = SourceLines::new(reader);

        // Skip leading blank and comment lines up to the header
        let header = loop {
            match lines.next_line()? {
                None => {
                    return Err(SpiceGenError::TruncatedInput {
                        origin: origin.display().to_string(),
                        expected: format!("a {} header line", SUBCIRCUIT_DIRECTIVE),
                    })
                }
                Some((_, text)) => {
                    let tokens: Vec<&str> = text.split_whitespace().collect();
                    let significant =
                        !matches!(classify(&tokens), LineKind::Blank | LineKind::Comment);
                    drop(tokens);
                    if significant {
                        break text;
                    }
                }
            }
        };

        let tokens: Vec<&str> = header.split_whitespace().collect();
        if classify(&tokens) != LineKind::SubcircuitStart {
            return Err(SpiceGenError::InvalidArgumentType {
                expected: "a .SUBCIRCUIT header line",
                found: header.trim().to_string(),
            });
        }

        let header_name = tokens.get(1).map(|s| s.to_string());
        let name = match (&self.options.name, &header_name) {
            (Some(name), _) => name.clone(),
            (None, Some(name)) => name.clone(),
            (None, None) => {
                return Err(SpiceGenError::InvalidArgumentType {
                    expected: "a sub-circuit name",
                    found: header.trim().to_string(),
                })
            }
        };
        let external_nodes = if self.options.external_nodes.is_empty() {
            tokens.iter().skip(2).map(|s| s.to_string()).collect()
        } else {
            self.options.external_nodes.clone()
        };

        target.set_name(name.clone());
        target.set_external_nodes(external_nodes);
        if let Some(suffix) = &self.options.suffix {
            target.set_suffix(suffix.clone());
        }
        tracing::info!(
            subcircuit = %name,
            origin = %origin.display(),
            "loading subcircuit"
        );

        let end_name = header_name.unwrap_or(name);
        let result = self.parse_body(
            &mut lines,
            target.netlist_mut(),
            Terminator::Ends(&end_name),
            origin,
        );
        self.report.lines_read = lines.number;
        result?;

        target.set_source_path(Some(origin.to_path_buf()));
        Ok(())
    }

    /// Load a whole netlist file: top-level definitions and instances up to
    /// end of file. Name, node and suffix options do not apply here.
    pub fn load_netlist(&mut self, path: &Path) -> Result<Netlist, SpiceGenError> {
        let file = File::open(path)?;
        self.parse_netlist(BufReader::new(file), path)
    }

    pub fn parse_netlist<R: BufRead>(
        &mut self,
        reader: R,
        origin: &Path,
    ) -> Result<Netlist, SpiceGenError> {
        self.report.origin = Some(origin.to_path_buf());
        let mut lines = SourceLines::new(reader);
        let mut netlist = Netlist::new();

        let result = self.parse_body(&mut lines, &mut netlist, Terminator::Eof, origin);
        self.report.lines_read = lines.number;
        result?;

        tracing::info!(
            origin = %origin.display(),
            subcircuits = netlist.subcircuits().len(),
            instances = netlist.devices().len(),
            "netlist loaded"
        );
        Ok(netlist)
    }

    fn parse_body<R: BufRead>(
        &mut self,
        lines: &mut SourceLines<R>,
        scope: &mut Netlist,
        terminator: Terminator<'_>,
        origin: &Path,
    ) -> Result<(), SpiceGenError> {
        let mut pending = Vec::new();
        let mut nested = Vec::new();

        loop {
            let Some((number, text)) = lines.next_line()? else {
                match terminator {
                    Terminator::Eof => break,
                    Terminator::Ends(name) => {
                        return Err(SpiceGenError::TruncatedInput {
                            origin: origin.display().to_string(),
                            expected: format!("{} {}", ENDS_DIRECTIVE, name),
                        })
                    }
                }
            };

            let tokens: Vec<&str> = text.split_whitespace().collect();
            match classify(&tokens) {
                LineKind::Blank | LineKind::Comment => {}
                LineKind::Rlc(kind) => pending.push(rlc_entry(kind, &tokens, &text)?),
                LineKind::Instance => pending.push(instance_entry(&tokens, &text)?),
                LineKind::SubcircuitStart => {
                    nested.push(self.parse_nested(lines, &tokens, &text, origin)?);
                }
                LineKind::SubcircuitEnd => {
                    let closing = tokens.get(1).copied();
                    match terminator {
                        Terminator::Ends(name)
                            if closing.map_or(true, |c| c.eq_ignore_ascii_case(name)) =>
                        {
                            break
                        }
                        _ => {
                            tracing::debug!(line = number, "ignoring .ENDS of another body");
                        }
                    }
                }
                LineKind::Directive => {
                    tracing::debug!(line = number, directive = tokens[0], "ignoring directive");
                }
                LineKind::Unknown => self.unrecognized(number, &text)?,
            }
        }

        for mut child in nested {
            if child.suffix().is_empty() {
                if let Some(suffix) = pending.iter().find_map(|p| p.suffix_for(child.name())) {
                    child.set_suffix(suffix.to_string());
                }
            }
            scope.add_subcircuit(child)?;
        }

        for entry in pending {
            match entry {
                Pending::Rlc { kind, nodes, value } => {
                    scope.create_rlc_instance(kind.label(), nodes, value)?;
                }
                Pending::Instance {
                    nodes, subcircuit, ..
                } => {
                    scope.create_subcircuit_instance(&subcircuit, nodes)?;
                }
            }
        }
        Ok(())
    }

    fn parse_nested<R: BufRead>(
        &mut self,
        lines: &mut SourceLines<R>,
        tokens: &[&str],
        text: &str,
        origin: &Path,
    ) -> Result<SubCircuit, SpiceGenError> {
        let name = tokens
            .get(1)
            .copied()
            .ok_or_else(|| SpiceGenError::InvalidArgumentType {
                expected: "a sub-circuit name",
                found: text.trim().to_string(),
            })?;
        tracing::debug!(subcircuit = name, "parsing inner subcircuit");

        let mut child = SubCircuit::new(name, tokens.iter().skip(2).copied(), "");
        self.parse_body(lines, child.netlist_mut(), Terminator::Ends(name), origin)?;
        Ok(child)
    }

    fn unrecognized(&mut self, line: usize, text: &str) -> Result<(), SpiceGenError> {
        let issue = UnrecognizedLine {
            line,
            text: text.trim().to_string(),
        };
        tracing::warn!(line, text = %issue.text, "unidentified component");
        if self.options.strict {
            return Err(issue.into());
        }
        self.report.unrecognized.push(issue);
        Ok(())
    }
}

/// `<R|L|C><index> <node>... <value>`
fn rlc_entry(kind: DeviceKind, tokens: &[&str], text: &str) -> Result<Pending, SpiceGenError> {
    let (value, inner) = match tokens {
        [_, inner @ .., value] => (*value, inner),
        _ => {
            return Err(SpiceGenError::InvalidArgumentType {
                expected: "a device value",
                found: text.trim().to_string(),
            })
        }
    };
    let value = value
        .parse::<f64>()
        .map_err(|_| SpiceGenError::InvalidArgumentType {
            expected: "a numeric device value",
            found: value.to_string(),
        })?;

    Ok(Pending::Rlc {
        kind,
        nodes: inner.iter().map(|s| s.to_string()).collect(),
        value,
    })
}

/// `X<designator> <node>... <subcircuit>`
fn instance_entry(tokens: &[&str], text: &str) -> Result<Pending, SpiceGenError> {
    match tokens {
        [designator, inner @ .., subcircuit] => Ok(Pending::Instance {
            designator: designator.to_string(),
            nodes: inner.iter().map(|s| s.to_string()).collect(),
            subcircuit: subcircuit.to_string(),
        }),
        _ => Err(SpiceGenError::InvalidArgumentType {
            expected: "a sub-circuit name",
            found: text.trim().to_string(),
        }),
    }
}

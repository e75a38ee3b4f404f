//! Netlist Serializer
//!
//! Emits a netlist in three fixed sections: header comments, sub-circuit
//! definitions, then top-level instances. Definitions always precede their
//! usages. Every section is written through an explicit [`Destination`].

pub mod destination;

pub use destination::{Destination, COMMENT_PREFIX, END_OF_LINE};

use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::{SpiceGenError, WriteMode, WriteOptions};
use crate::netlist::{Netlist, SubCircuit};

/// Serializer over a borrowed netlist.
pub struct NetlistWriter<'a> {
    netlist: &'a Netlist,
    options: &'a WriteOptions,
}

impl<'a> NetlistWriter<'a> {
    pub fn new(netlist: &'a Netlist, options: &'a WriteOptions) -> Self {
        Self { netlist, options }
    }

    /// Generator identity, date (`DD/MM/YYYY`), time (`HH:MM:SS`) and a
    /// blank separator comment.
    pub fn write_header<W: Write>(&self, dest: &mut Destination<W>) -> Result<(), SpiceGenError> {
        dest.ensure_open()?;
        let now = self
            .options
            .timestamp
            .unwrap_or_else(|| Local::now().naive_local());

        dest.write_comment(&format!("Generated for: {}", self.options.target))?;
        dest.write_comment(&format!("By: {}", self.options.generator))?;
        dest.write_comment(&format!("On: {}", now.format("%d/%m/%Y")))?;
        dest.write_comment(&format!("At: {}", now.format("%H:%M:%S")))?;
        dest.write_comment(" ")
    }

    /// Every registered sub-circuit, recursively, in registration order.
    pub fn write_subcircuits<W: Write>(
        &self,
        dest: &mut Destination<W>,
    ) -> Result<(), SpiceGenError> {
        dest.ensure_open()?;
        tracing::debug!(
            subcircuits = ?self.netlist.subcircuit_names(),
            "writing subcircuits"
        );
        dest.write_comment("subcircuits")?;
        for subcircuit in self.netlist.subcircuits() {
            write_subcircuit(subcircuit, dest)?;
        }
        Ok(())
    }

    /// Top-level instance lines in creation order.
    pub fn write_instances<W: Write>(
        &self,
        dest: &mut Destination<W>,
    ) -> Result<(), SpiceGenError> {
        dest.ensure_open()?;
        tracing::debug!(
            instances = self.netlist.devices().len(),
            "writing instances"
        );
        dest.write_comment("Instances")?;
        for device in self.netlist.devices() {
            dest.write_line(&device.to_string())?;
        }
        Ok(())
    }

    /// Header, sub-circuits, instances.
    pub fn write_all<W: Write>(&self, dest: &mut Destination<W>) -> Result<(), SpiceGenError> {
        self.write_header(dest)?;
        self.write_subcircuits(dest)?;
        self.write_instances(dest)
    }

    /// Render the whole netlist in memory.
    pub fn render(&self) -> Result<String, SpiceGenError> {
        let mut dest = Destination::new(Vec::new());
        self.write_all(&mut dest)?;
        let bytes = dest.close()?.unwrap_or_default();
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Write the netlist to `path` according to the configured [`WriteMode`].
    ///
    /// Each pass owns its file handle for the duration of the pass only. A
    /// failing pass leaves whatever earlier passes wrote in place.
    pub fn write_to_path(&self, path: &Path) -> Result<(), SpiceGenError> {
        match self.options.mode {
            WriteMode::ThreePass => {
                let mut dest = Destination::new(BufWriter::new(File::create(path)?));
                self.write_header(&mut dest)?;
                dest.close()?;

                let mut dest = Destination::new(BufWriter::new(append(path)?));
                self.write_subcircuits(&mut dest)?;
                dest.close()?;

                let mut dest = Destination::new(BufWriter::new(append(path)?));
                self.write_instances(&mut dest)?;
                dest.close()?;
            }
            WriteMode::Buffered => {
                let mut dest = Destination::new(BufWriter::new(File::create(path)?));
                self.write_all(&mut dest)?;
                dest.close()?;
            }
        }

        tracing::info!(
            path = %path.display(),
            subcircuits = self.netlist.subcircuits().len(),
            instances = self.netlist.devices().len(),
            "netlist written"
        );
        Ok(())
    }
}

fn append(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().append(true).open(path)
}

/// Write one sub-circuit definition and, recursively, the ones nested in it.
pub fn write_subcircuit<W: Write>(
    subcircuit: &SubCircuit,
    dest: &mut Destination<W>,
) -> Result<(), SpiceGenError> {
    dest.ensure_open()?;

    if let Some(comment) = subcircuit.comment() {
        dest.write_comment(comment)?;
    }
    dest.write_line(&subcircuit.start_line())?;
    for device in subcircuit.devices() {
        dest.write_line(&device.to_string())?;
    }
    for nested in subcircuit.subcircuits() {
        dest.write_comment(" ")?;
        dest.write_comment("Inner subcircuit")?;
        if let Some(path) = nested.source_path() {
            dest.write_comment(&format!("subcircuit loaded from : {}", path.display()))?;
        }
        write_subcircuit(nested, dest)?;
    }
    dest.write_line(&subcircuit.end_line())
}

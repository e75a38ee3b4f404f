//! Line sink handed down the serializer recursion.

use std::io::Write;

use crate::core::SpiceGenError;

/// Line terminator of the netlist format.
pub const END_OF_LINE: &str = "\n";
/// Prefix of every comment line.
pub const COMMENT_PREFIX: &str = "***";

/// Wraps any writer and refuses writes once it has been closed.
#[derive(Debug)]
pub struct Destination<W: Write> {
    inner: Option<W>,
}

impl<W: Write> Destination<W> {
    pub fn new(inner: W) -> Self {
        Self { inner: Some(inner) }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    /// Fail with `ClosedDestination` if the destination was released.
    pub fn ensure_open(&self) -> Result<(), SpiceGenError> {
        if self.is_closed() {
            Err(SpiceGenError::ClosedDestination)
        } else {
            Ok(())
        }
    }

    /// Write `line` followed by a newline.
    pub fn write_line(&mut self, line: &str) -> Result<(), SpiceGenError> {
        let inner = self.inner.as_mut().ok_or(SpiceGenError::ClosedDestination)?;
        inner.write_all(line.as_bytes())?;
        inner.write_all(END_OF_LINE.as_bytes())?;
        Ok(())
    }

    /// Write `*** <comment>`, one `***` line per line of `comment`.
    /// Empty comments write nothing.
    pub fn write_comment(&mut self, comment: &str) -> Result<(), SpiceGenError> {
        self.ensure_open()?;
        for line in comment.split(['\r', '\n']).filter(|l| !l.is_empty()) {
            self.write_line(&format!("{} {}", COMMENT_PREFIX, line))?;
        }
        Ok(())
    }

    /// Flush and release the writer. Later writes fail with `ClosedDestination`.
    pub fn close(&mut self) -> Result<Option<W>, SpiceGenError> {
        match self.inner.take() {
            Some(mut inner) => {
                inner.flush()?;
                Ok(Some(inner))
            }
            None => Ok(None),
        }
    }
}

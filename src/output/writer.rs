//! Plain-text position dump
//!
//! The file is truncated when the writer is created. Every call to
//! [`StateWriter::write_state`] appends one line per body,
//! `x, y, z` with six decimals, in body order, and flushes, so an aborted
//! run leaves only complete steps behind.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::SimError;
use crate::simulation::states::Body;

pub struct StateWriter {
    path: PathBuf,
    out: BufWriter<File>,
}

impl StateWriter {
    /// Create or truncate the output file
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| SimError::io(&path, e))?;
        Ok(Self {
            path,
            out: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append the current positions of `bodies`
    pub fn write_state(&mut self, bodies: &[Body]) -> Result<(), SimError> {
        for b in bodies {
            writeln!(self.out, "{}", format_position(b)).map_err(|e| SimError::io(&self.path, e))?;
        }
        self.out.flush().map_err(|e| SimError::io(&self.path, e))
    }
}

/// `x, y, z` with six decimals
pub fn format_position(b: &Body) -> String {
    format!("{:.6}, {:.6}, {:.6}", b.x.e1(), b.x.e2(), b.x.e3())
}

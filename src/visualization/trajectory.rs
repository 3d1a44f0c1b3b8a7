//! Per-body trajectories read back from a position dump.
//!
//! The dump has no header and no step markers: every step writes one
//! `x, y, z` line per body in system order. With `n` bodies, line `k`
//! (counting every line of the file, blank ones included) belongs to
//! body `k % n`. Blank lines are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::SimError;
use crate::simulation::states::NVec3;

/// One position track per body, in system order
#[derive(Debug, Clone)]
pub struct Trajectories {
    pub tracks: Vec<Vec<NVec3>>,
}

impl Trajectories {
    pub fn num_bodies(&self) -> usize {
        self.tracks.len()
    }

    /// Number of complete frames (steps) shared by every track
    pub fn frames(&self) -> usize {
        self.tracks.iter().map(Vec::len).min().unwrap_or(0)
    }

    /// Axis-aligned bounds `(min, max)` over every recorded position
    pub fn bounds(&self) -> Option<(NVec3, NVec3)> {
        let mut points = self.tracks.iter().flatten();
        let first = *points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| (lo.inf(p), hi.sup(p))))
    }

    /// Last recorded position of each body
    pub fn final_positions(&self) -> Vec<Option<NVec3>> {
        self.tracks.iter().map(|t| t.last().copied()).collect()
    }

    /// Tracks flattened onto the XY plane
    pub fn xy_projection(&self) -> Vec<Vec<[f64; 2]>> {
        self.tracks
            .iter()
            .map(|t| t.iter().map(|p| [p.x, p.y]).collect())
            .collect()
    }
}

/// Split a dump into per-body tracks by line index
pub fn parse_tracks(reader: impl BufRead, num_bodies: usize) -> Result<Trajectories, SimError> {
    if num_bodies == 0 {
        return Err(SimError::MalformedDump {
            line: 0,
            reason: "number of bodies must be at least 1".to_string(),
        });
    }

    let mut tracks = vec![Vec::new(); num_bodies];
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| SimError::MalformedDump {
            line: index + 1,
            reason: e.to_string(),
        })?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        tracks[index % num_bodies].push(parse_position(line, index + 1)?);
    }

    Ok(Trajectories { tracks })
}

/// Read a dump file into per-body tracks
pub fn read_tracks(path: impl AsRef<Path>, num_bodies: usize) -> Result<Trajectories, SimError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| SimError::io(path, e))?;
    parse_tracks(BufReader::new(file), num_bodies)
}

fn parse_position(line: &str, line_no: usize) -> Result<NVec3, SimError> {
    let malformed = |reason: String| SimError::MalformedDump { line: line_no, reason };

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 3 {
        return Err(malformed(format!("expected 3 comma-separated values, got {}", fields.len())));
    }

    let mut xyz = [0.0; 3];
    for (slot, field) in xyz.iter_mut().zip(&fields) {
        *slot = field
            .parse::<f64>()
            .map_err(|e| malformed(format!("`{field}`: {e}")))?;
    }
    Ok(NVec3::new(xyz[0], xyz[1], xyz[2]))
}

//! Tab-separated landmark file.
//!
//! ```text
//! Index	xSource	ySource	xTarget	yTarget
//!     0	     11	     11	     11	     11
//!     1	    200	      6	    185	     15
//! ```

use std::fmt::Write as _;
use std::path::Path;

use glam::IVec2;

use super::LandmarkPairs;
use crate::error::{Error, Result};

pub const HEADER: &str = "Index\txSource\tySource\txTarget\tyTarget";

const FIELD_NAMES: [&str; 5] = ["Index", "xSource", "ySource", "xTarget", "yTarget"];

/// Source and target positions read from a landmark file, in row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LandmarkRows {
    pub source: Vec<IVec2>,
    pub target: Vec<IVec2>,
}

impl LandmarkRows {
    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }
}

pub fn format_landmarks(pairs: &LandmarkPairs) -> String {
    let mut out = String::with_capacity(HEADER.len() + 1 + pairs.len() * 38);
    out.push_str(HEADER);
    out.push('\n');
    for (idx, (s, t)) in pairs.iter_pairs().enumerate() {
        let _ = writeln!(
            out,
            "{idx:>5}\t{:>7}\t{:>7}\t{:>7}\t{:>7}",
            s.x, s.y, t.x, t.y
        );
    }
    out
}

/// The landmark table for display: same layout as the file.
pub fn format_landmark_table(pairs: &LandmarkPairs) -> String {
    format_landmarks(pairs)
}

pub fn parse_landmarks(text: &str) -> Result<LandmarkRows> {
    let mut lines = text.lines();

    let header = lines.next().map(|l| l.trim_end_matches('\r'));
    if header != Some(HEADER) {
        return Err(Error::MissingHeader { line: 1 });
    }

    let mut rows = LandmarkRows::default();
    for (offset, raw) in lines.enumerate() {
        let line_no = offset + 2;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line
            .split('\t')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect();
        if fields.len() != FIELD_NAMES.len() {
            return Err(Error::FieldCount {
                line: line_no,
                found: fields.len(),
            });
        }

        let mut values = [0i32; 5];
        for (slot, (field, name)) in values.iter_mut().zip(fields.iter().zip(FIELD_NAMES)) {
            *slot = field.parse().map_err(|_| Error::InvalidNumber {
                line: line_no,
                field: name,
                value: field.to_string(),
            })?;
        }

        rows.source.push(IVec2::new(values[1], values[2]));
        rows.target.push(IVec2::new(values[3], values[4]));
    }

    Ok(rows)
}

pub fn read_landmarks(path: &Path) -> Result<LandmarkRows> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = parse_landmarks(&text)?;
    tracing::info!("Read {} landmark pairs from {}", rows.len(), path.display());
    Ok(rows)
}

pub fn write_landmarks(path: &Path, pairs: &LandmarkPairs) -> Result<()> {
    std::fs::write(path, format_landmarks(pairs)).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Wrote {} landmark pairs to {}", pairs.len(), path.display());
    Ok(())
}

impl LandmarkPairs {
    /// Replaces all landmarks with the file contents. On error the current
    /// landmarks are kept.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let rows = read_landmarks(path)?;
        self.replace(&rows.source, &rows.target)
    }

    pub fn save_file(&self, path: &Path) -> Result<()> {
        write_landmarks(path, self)
    }
}

//! Textual discovery of source references in a project definition
//!
//! A candidate counts as referenced when its name appears as a substring
//! of any line. This does not parse the project format, so a comment that
//! mentions a file is a reference too. An extra rebuild is acceptable; a
//! missed reference is not.

use crate::{Result, ScanError};
use ib_core::SourceName;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::Path;

/// Find which `candidates` are mentioned in `project`
///
/// Each candidate gets its own pass from the start of the file.
pub fn discover(project: &Path, candidates: &[SourceName]) -> Result<BTreeSet<SourceName>> {
    let file = File::open(project).map_err(|source| ScanError::Open {
        path: project.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let mut found: BTreeSet<SourceName> = BTreeSet::new();

    let read_err = |source: std::io::Error| ScanError::Read {
        path: project.to_path_buf(),
        source,
    };

    for name in candidates {
        if name.is_empty() || found.contains(name) {
            continue;
        }

        reader.rewind().map_err(read_err)?;
        if file_mentions(&mut reader, name).map_err(read_err)? {
            found.insert(name.clone());
        }
    }

    Ok(found)
}

/// Scan lines from the current position until one contains `needle`
///
/// Lines are decoded lossily so project files with stray non-UTF-8 bytes
/// still scan.
fn file_mentions<R: BufRead>(reader: &mut R, needle: &str) -> std::io::Result<bool> {
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(false);
        }
        if String::from_utf8_lossy(&line).contains(needle) {
            return Ok(true);
        }
    }
}

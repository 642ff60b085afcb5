//! Access trace parsing.
//!
//! A trace is plain text with one access per line: the instruction pointer and
//! the byte address, both hexadecimal (`0x` prefix optional). Blank lines and
//! `#` comments are skipped; any further whitespace-separated fields on a line
//! are ignored, so traces annotated with access types or sizes load unchanged.

use std::fs;
use std::path::Path;

use crate::common::TraceError;

/// One record of an access trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceRecord {
    /// Instruction pointer of the access.
    pub ip: u64,
    /// Byte address accessed.
    pub addr: u64,
}

/// Loads a whole trace file.
///
/// # Errors
///
/// Returns a [`TraceError`] for I/O failures, lines with fewer than two
/// fields, or fields that are not hexadecimal numbers.
pub fn read_trace(path: &Path) -> Result<Vec<TraceRecord>, TraceError> {
    let content = fs::read_to_string(path).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut records = Vec::new();
    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(ip_field), Some(addr_field)) = (fields.next(), fields.next()) else {
            return Err(TraceError::Malformed {
                path: path.to_path_buf(),
                line: index + 1,
                text: raw.to_string(),
            });
        };
        records.push(TraceRecord {
            ip: parse_hex(path, index + 1, ip_field)?,
            addr: parse_hex(path, index + 1, addr_field)?,
        });
    }
    Ok(records)
}

fn parse_hex(path: &Path, line: usize, field: &str) -> Result<u64, TraceError> {
    let digits = field
        .strip_prefix("0x")
        .or_else(|| field.strip_prefix("0X"))
        .unwrap_or(field);
    u64::from_str_radix(digits, 16).map_err(|_| TraceError::BadHex {
        path: path.to_path_buf(),
        line,
        field: field.to_string(),
    })
}

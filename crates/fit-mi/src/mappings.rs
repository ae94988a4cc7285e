//! Parses `info proc mappings` console output (spec.md §4.3 "Memory
//! mappings"), ported from `GDBIjector.get_mappings`.

use crate::error::AdapterError;

/// Bitmask permission flags for a mapped region. Four fixed bits fit in a
/// `u8`; a bitflags-style crate would be overkill for this one call site.
pub mod perm {
    pub const READ: u8 = 0b0001;
    pub const WRITE: u8 = 0b0010;
    pub const EXEC: u8 = 0b0100;
    pub const PRIVATE: u8 = 0b1000;
}

/// A single line of `info proc mappings`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryMapping {
    pub start: u64,
    pub end: u64,
    pub size: u64,
    pub offset: u64,
    pub perms: u8,
    pub path: String,
}

/// Parse the console lines of `info proc mappings`, skipping the first three
/// preamble lines (header text) and any trailing blank line. A line with
/// fewer than five whitespace-separated fields is skipped (log-worthy, not
/// fatal, matching the original's behavior of treating it as an isolated bad
/// line rather than aborting the whole parse).
pub fn parse_mappings(lines: &[String]) -> Vec<MemoryMapping> {
    let body = lines.iter().skip(3);
    let mut out = Vec::new();
    for line in body {
        if let Some(mapping) = parse_mapping_line(line) {
            out.push(mapping);
        }
    }
    out
}

fn parse_mapping_line(line: &str) -> Option<MemoryMapping> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 5 {
        return None;
    }

    let start = u64::from_str_radix(parts[0].trim_start_matches("0x"), 16).ok()?;
    let end = u64::from_str_radix(parts[1].trim_start_matches("0x"), 16).ok()?;
    let size = u64::from_str_radix(parts[2].trim_start_matches("0x"), 16).ok()?;
    let offset = u64::from_str_radix(parts[3].trim_start_matches("0x"), 16).ok()?;

    let mut perms = 0u8;
    for c in parts[4].chars() {
        perms |= match c {
            'r' => perm::READ,
            'w' => perm::WRITE,
            'x' => perm::EXEC,
            'p' => perm::PRIVATE,
            _ => 0,
        };
    }

    let path = if parts.len() > 5 { parts[5..].join(" ") } else { String::new() };

    Some(MemoryMapping { start, end, size, offset, perms, path })
}

/// Validate a parsed mapping line count, surfacing a typed error for the
/// caller to log rather than silently dropping (callers that want the
/// original's "return empty on first bad line" behavior can check this before
/// calling [`parse_mappings`]).
pub fn validate_mapping_line(line: &str) -> Result<(), AdapterError> {
    if line.split_whitespace().count() < 5 {
        return Err(AdapterError::MalformedMapping(line.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_lines() -> Vec<String> {
        vec![
            "process 1234".to_string(),
            "Mapped address spaces:".to_string(),
            "Start Addr   End Addr       Size     Offset  objfile".to_string(),
            "0x400000 0x401000 0x1000 0x0 r-xp /bin/target".to_string(),
            "0x601000 0x602000 0x1000 0x1000 rw-p /bin/target".to_string(),
        ]
    }

    #[test]
    fn parses_permission_bits() {
        let mappings = parse_mappings(&sample_lines());
        assert_eq!(mappings.len(), 2);
        assert_eq!(mappings[0].perms, perm::READ | perm::EXEC);
        assert_eq!(mappings[1].perms, perm::READ | perm::WRITE | perm::PRIVATE);
    }

    #[test]
    fn parses_fields_and_path() {
        let mappings = parse_mappings(&sample_lines());
        assert_eq!(mappings[0].start, 0x400000);
        assert_eq!(mappings[0].end, 0x401000);
        assert_eq!(mappings[0].path, "/bin/target");
    }

    #[test]
    fn short_lines_are_skipped_not_fatal() {
        let mut lines = sample_lines();
        lines.push("garbage line".to_string());
        let mappings = parse_mappings(&lines);
        assert_eq!(mappings.len(), 2);
    }

    #[test]
    fn validate_mapping_line_flags_short_lines() {
        assert!(validate_mapping_line("too short").is_err());
        assert!(validate_mapping_line("0x1 0x2 0x3 0x4 rwxp").is_ok());
    }
}

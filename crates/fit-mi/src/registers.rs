//! Register name list and value access (spec.md §4.3 "Register read").
//!
//! Register names are normalised to lowercase once, at ingestion, per the
//! Open Question resolution in SPEC_FULL.md: the original Python compared
//! register names case-sensitively (a latent bug for targets with
//! mixed-case register names); this adapter canonicalises once so lookups
//! are always case-insensitive as spec.md §3 requires ("case-insensitive
//! match against the debugger's register list").

use serde_json::Value;

use crate::error::AdapterError;

/// The debugger's register-name list, normalised to lowercase for lookup
/// while preserving original casing for commands sent back to GDB.
#[derive(Debug, Clone)]
pub struct RegisterSet {
    original: Vec<String>,
    lowercase: Vec<String>,
}

impl RegisterSet {
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        let lowercase = names.iter().map(|n| n.to_ascii_lowercase()).collect();
        Self { original: names, lowercase }
    }

    /// Build from a parsed `-data-list-register-names` payload.
    pub fn from_payload(payload: &Value) -> Result<Self, AdapterError> {
        let names = payload["register-names"]
            .as_array()
            .ok_or_else(|| AdapterError::MalformedLine("missing register-names array".to_string()))?
            .iter()
            .map(|v| v.as_str().unwrap_or_default().to_string())
            .collect();
        Ok(Self::new(names))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lowercase.iter().any(|n| n == &name.to_ascii_lowercase())
    }

    /// Index of `name` in declaration order, or `None` if unknown.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        let needle = name.to_ascii_lowercase();
        self.lowercase.iter().position(|n| n == &needle)
    }

    /// The original-case name used to send MI commands back to GDB.
    #[must_use]
    pub fn original_name(&self, index: usize) -> Option<&str> {
        self.original.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.original
    }
}

/// Read a register's scalar value out of a parsed `-data-list-register-values
/// d` payload. Fails if the register is unknown, or if the matching entry
/// has no scalar `value` field (a vector/special register).
pub fn extract_register_value(
    payload: &Value,
    registers: &RegisterSet,
    name: &str,
) -> Result<i64, AdapterError> {
    let index = registers.index_of(name).ok_or_else(|| AdapterError::UnknownRegister(name.to_string()))?;

    let values = payload["register-values"]
        .as_array()
        .ok_or_else(|| AdapterError::MalformedLine("missing register-values array".to_string()))?;

    let entry = values
        .iter()
        .find(|v| v["number"].as_str().and_then(|s| s.parse::<usize>().ok()) == Some(index))
        .ok_or_else(|| AdapterError::UnknownRegister(name.to_string()))?;

    let value_str = entry
        .get("value")
        .and_then(Value::as_str)
        .ok_or_else(|| AdapterError::VectorRegister(name.to_string()))?;

    value_str
        .trim_start_matches("0x")
        .parse::<i64>()
        .or_else(|_| i64::from_str_radix(value_str.trim_start_matches("0x"), 16))
        .map_err(|_| AdapterError::VectorRegister(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookup_is_case_insensitive() {
        let regs = RegisterSet::new(vec!["RAX".to_string(), "rbx".to_string()]);
        assert!(regs.contains("rax"));
        assert!(regs.contains("RBX"));
        assert_eq!(regs.index_of("Rax"), Some(0));
        assert_eq!(regs.original_name(0), Some("RAX"));
    }

    #[test]
    fn unknown_register_is_rejected() {
        let regs = RegisterSet::new(vec!["rax".to_string()]);
        assert_eq!(regs.index_of("rcx"), None);
    }

    #[test]
    fn extracts_scalar_register_value() {
        let regs = RegisterSet::new(vec!["rax".to_string(), "rbx".to_string()]);
        let payload = json!({"register-values": [
            {"number": "0", "value": "17"},
            {"number": "1", "value": "42"},
        ]});
        assert_eq!(extract_register_value(&payload, &regs, "RBX").unwrap(), 42);
    }

    #[test]
    fn vector_register_without_value_field_is_fatal() {
        let regs = RegisterSet::new(vec!["xmm0".to_string()]);
        let payload = json!({"register-values": [{"number": "0"}]});
        assert!(matches!(
            extract_register_value(&payload, &regs, "xmm0"),
            Err(AdapterError::VectorRegister(_))
        ));
    }
}

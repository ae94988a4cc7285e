//! Campaign configuration types (spec.md §6 EXTERNAL INTERFACES).
//!
//! These types are the typed boundary the core consumes: an external
//! YAML/CSV loader (out of scope for this crate) is expected to populate a
//! [`CampaignConfig`] and hand it to the Campaign Engine. They derive
//! `serde::{Serialize, Deserialize}` so that loader can use any serde-backed
//! format without this crate caring which one.

use serde::{Deserialize, Serialize};

/// The five injection operations a campaign row may declare (spec.md §3).
///
/// `Zero` ignores any sampled pattern and writes `0`; `Value` overwrites with
/// the sampled pattern; the rest combine `new = old ⊙ pattern`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Xor,
    And,
    Or,
    Zero,
    Value,
}

impl Operation {
    /// Whether this operation ignores the sampled pattern entirely.
    #[must_use]
    pub const fn ignores_pattern(self) -> bool {
        matches!(self, Operation::Zero)
    }

    /// Apply this operation to a single word given an old value and a
    /// sampled pattern word.
    #[must_use]
    pub const fn apply(self, old: u64, pattern: u64) -> u64 {
        match self {
            Operation::Xor => old ^ pattern,
            Operation::And => old & pattern,
            Operation::Or => old | pattern,
            Operation::Zero => 0,
            Operation::Value => pattern,
        }
    }
}

/// One row of the campaign's injector table: `(where, operation,
/// operation_probability, value, value_probability)` from spec.md §3/§6.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRow {
    /// Textual target, e.g. `"vmax1"`, `"0x20000000"`, `"0x20000000:0x20000010"`, `"rax"`.
    #[serde(rename = "where")]
    pub target_text: String,
    pub operation: Operation,
    pub operation_probability: f64,
    pub value: i64,
    pub value_probability: f64,
}

/// `{min, max}` injection-delay envelope, sampled per iteration (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectionDelay {
    pub min_ms: u64,
    pub max_ms: u64,
}

/// Board family for embedded reset sequences (spec.md §4.3, §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BoardFamily {
    Stm32,
    Unknown,
}

/// GDB launch/attach configuration (spec.md §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GdbConfig {
    pub gdb_path: String,
    pub embedded: bool,
    pub board_family: BoardFamily,
    /// `"host:port"`, required when attaching to an already-running gdbserver.
    pub remote: Option<String>,
}

/// Top-level campaign configuration (spec.md §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignConfig {
    pub executable: String,
    pub injector: Vec<CampaignRow>,
    pub golden_result_condition: String,
    pub result_condition: Vec<String>,
    pub number_of_runs: u64,
    pub timeout_ms: u64,
    pub injection_delay: InjectionDelay,
    pub experiment_name: String,
    pub gdb: GdbConfig,
    pub seed: Option<u64>,
}

impl CampaignConfig {
    /// Deserialize a campaign configuration from a JSON string.
    ///
    /// The core never loads YAML or CSV itself (spec.md §1 Non-goals); JSON
    /// support here exists for tests and for tooling that already has a
    /// serde_json value in hand.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize this configuration back to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_apply_matches_spec_semantics() {
        assert_eq!(Operation::Xor.apply(0xff, 0x0f), 0xf0);
        assert_eq!(Operation::And.apply(0xff, 0x0f), 0x0f);
        assert_eq!(Operation::Or.apply(0xf0, 0x0f), 0xff);
        assert_eq!(Operation::Zero.apply(0xff, 0x0f), 0);
        assert_eq!(Operation::Value.apply(0xff, 0x0f), 0x0f);
    }

    #[test]
    fn campaign_config_round_trips_through_json() {
        let config = CampaignConfig {
            executable: "target.elf".into(),
            injector: vec![CampaignRow {
                target_text: "vmax1".into(),
                operation: Operation::Xor,
                operation_probability: 1.0,
                value: 0xff,
                value_probability: 1.0,
            }],
            golden_result_condition: "stop".into(),
            result_condition: vec![],
            number_of_runs: 10,
            timeout_ms: 1000,
            injection_delay: InjectionDelay {
                min_ms: 5,
                max_ms: 50,
            },
            experiment_name: "demo".into(),
            gdb: GdbConfig {
                gdb_path: "gdb".into(),
                embedded: false,
                board_family: BoardFamily::Unknown,
                remote: None,
            },
            seed: Some(42),
        };

        let json = config.to_json().expect("serializable");
        let back = CampaignConfig::from_json(&json).expect("deserializable");
        assert_eq!(config, back);
    }
}

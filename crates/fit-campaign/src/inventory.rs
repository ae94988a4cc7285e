//! Classifies campaign targets into variables, registers, and
//! memory addresses/ranges (spec.md §4.5).

use std::collections::HashMap;

use fit_types::target::{Target, parse_target};
use fit_types::{FitError, TargetLabel};

use crate::logging::{Emitter, LogEvent, Severity};

/// The classified target inventory (spec.md §4.5: "a classified target
/// inventory `(variables, registers, memory_addresses_or_ranges)`").
#[derive(Debug, Clone, Default)]
pub struct TargetInventory {
    pub variables: Vec<TargetLabel>,
    pub registers: Vec<TargetLabel>,
    pub memory: Vec<TargetLabel>,
}

/// Classify every distinct target text in `labels` (first-appearance order).
/// On a classification collision — the same label already resolved to a
/// different category — the first bucket wins and a warning is logged
/// (spec.md §4.5).
pub fn classify_targets(
    labels: &[TargetLabel],
    known_registers: &[String],
    emitter: &mut dyn Emitter,
) -> Result<TargetInventory, FitError> {
    let mut inventory = TargetInventory::default();
    let mut seen: HashMap<&str, Target> = HashMap::new();

    for label in labels {
        let target = parse_target(label, known_registers)?;

        if let Some(previous) = seen.get(label.as_str()) {
            if *previous != target {
                emitter.emit(
                    &LogEvent::new(Severity::Warn, "target classification collision, keeping first")
                        .with_target(label.clone()),
                );
            }
            continue;
        }
        seen.insert(label.as_str(), target.clone());

        match target {
            Target::Variable(_) => inventory.variables.push(label.clone()),
            Target::Register(_) => inventory.registers.push(label.clone()),
            Target::Address(_) | Target::Range(..) => inventory.memory.push(label.clone()),
        }
    }

    Ok(inventory)
}

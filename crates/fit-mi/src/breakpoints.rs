//! Event/Breakpoint Registry (spec.md §4.7, component C7): maps event names
//! to GDB breakpoint ids and resolves stop notifications back to names.

use std::collections::HashMap;

/// The reserved result labels (spec.md §3): never resolvable to a user
/// breakpoint.
pub const RESERVED_EXIT: &str = "exit";
pub const RESERVED_UNKNOWN: &str = "unknown";
pub const RESERVED_TIMEOUT: &str = "Timeout";

/// A registered `-break-insert` result (spec.md §3 "Breakpoint").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakpoint {
    pub id: u32,
    pub address: u64,
    pub name: String,
}

/// `name -> Breakpoint`, cleared on every `reset` (spec.md §4.7).
#[derive(Debug, Clone, Default)]
pub struct BreakpointRegistry {
    by_id: HashMap<u32, Breakpoint>,
}

impl BreakpointRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, bp: Breakpoint) {
        self.by_id.insert(bp.id, bp);
    }

    /// All breakpoints and events are cleared on `reset` (spec.md §3
    /// "Lifecycles").
    pub fn clear(&mut self) {
        self.by_id.clear();
    }

    /// Resolve a stop notification's `bkptno` to the event name it was
    /// registered under, or the reserved label `unknown` if the id is not
    /// (or no longer) registered.
    #[must_use]
    pub fn resolve(&self, id: u32) -> &str {
        self.by_id.get(&id).map_or(RESERVED_UNKNOWN, |bp| bp.name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

//! [`TargetSurface`]: the four read/write entry points spec.md §9 calls for
//! (`read_word`/`write_word`/`read_range`/`write_range`), plus register
//! access, all layered over a [`fit_mi::DebuggerAdapter`].

use fit_mi::DebuggerAdapter;
use fit_mi::transport::Transport;
use fit_types::WordList;

use crate::error::TargetError;

/// A non-owning view over a live [`DebuggerAdapter`], sized to the target's
/// machine word (spec.md §4.4).
pub struct TargetSurface<'a, T: Transport> {
    adapter: &'a mut DebuggerAdapter<T>,
    word_bytes: u32,
}

impl<'a, T: Transport> TargetSurface<'a, T> {
    #[must_use]
    pub fn new(adapter: &'a mut DebuggerAdapter<T>, word_bytes: u32) -> Self {
        Self { adapter, word_bytes }
    }

    /// Read exactly one machine word at `address`.
    pub fn read_word(&mut self, address: u64) -> Result<u64, TargetError> {
        let words = self.adapter.read_memory(address, u64::from(self.word_bytes), self.word_bytes)?;
        words.first().copied().ok_or(TargetError::EmptyRead)
    }

    /// Write exactly one machine word at `address`.
    pub fn write_word(&mut self, address: u64, value: u64) -> Result<(), TargetError> {
        self.adapter.write_memory(address, &[value], self.word_bytes)?;
        Ok(())
    }

    /// Read `[lo, hi)` in `step`-sized words (default `word_bytes`).
    pub fn read_range(&mut self, lo: u64, hi: u64, step: Option<u32>) -> Result<WordList, TargetError> {
        let step = step.unwrap_or(self.word_bytes).max(1);
        let words = self.adapter.read_memory(lo, hi.saturating_sub(lo), step)?;
        Ok(WordList::new(words))
    }

    /// Write `values` across `[lo, hi)`: a single value broadcasts, a longer
    /// list writes pairwise truncated to the shorter of (range, list)
    /// (spec.md §4.4).
    pub fn write_range(&mut self, lo: u64, hi: u64, step: Option<u32>, values: &[u64]) -> Result<(), TargetError> {
        let step = step.unwrap_or(self.word_bytes).max(1);
        let range_words = (hi.saturating_sub(lo) as usize) / step as usize;

        let payload: Vec<u64> = match values {
            [scalar] => vec![*scalar; range_words],
            _ => WordList::truncate_to_shorter(range_words, values).to_vec(),
        };

        self.adapter.write_memory(lo, &payload, step)?;
        Ok(())
    }

    /// Read a register (case-insensitive lookup, spec.md §4.4).
    pub fn read_register(&mut self, name: &str) -> Result<i64, TargetError> {
        Ok(self.adapter.read_register(name)?)
    }

    /// Write a register. A scalar or a one-element list is accepted
    /// (unwrapped); a longer list is fatal ("register is not an array",
    /// spec.md §4.4).
    pub fn write_register(&mut self, name: &str, values: &[u64]) -> Result<(), TargetError> {
        match values {
            [] => Err(TargetError::EmptyRegisterWrite(name.to_string())),
            [value] => {
                self.adapter.write_register(name, *value)?;
                Ok(())
            }
            _ => Err(TargetError::RegisterIsNotAnArray(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fit_mi::adapter::GdbLaunchConfig;
    use fit_mi::transport::ScriptedTransport;
    use fit_types::campaign_config::{BoardFamily, GdbConfig};

    fn config() -> GdbLaunchConfig {
        GdbLaunchConfig {
            executable: "target.elf".to_string(),
            gdb: GdbConfig {
                gdb_path: "gdb".to_string(),
                embedded: false,
                board_family: BoardFamily::Unknown,
                remote: None,
            },
        }
    }

    fn booted_adapter() -> DebuggerAdapter<ScriptedTransport> {
        let mut t = ScriptedTransport::new();
        t.push_lines(&[r#"^done"#]);
        t.push_lines(&[r#"^done,register-names=["rax"]"#]);
        t.push_lines(&[r#"=breakpoint-deleted,id="1""#]);
        DebuggerAdapter::new(t, &config()).unwrap()
    }

    #[test]
    fn read_word_unpacks_single_chunk() {
        let mut adapter = booted_adapter();
        adapter.transport_mut().push_lines(&[
            r#"^done,memory=[{begin="0x2000",end="0x2004",offset="0x0",contents="ffffffff"}]"#,
        ]);
        let mut surface = TargetSurface::new(&mut adapter, 4);
        assert_eq!(surface.read_word(0x2000).unwrap(), 0xFFFF_FFFF);
    }

    #[test]
    fn write_range_broadcasts_a_single_scalar() {
        let mut adapter = booted_adapter();
        adapter.transport_mut().push_lines(&[r#"^done"#]);
        let mut surface = TargetSurface::new(&mut adapter, 4);
        surface.write_range(0x2000, 0x200C, None, &[0xAA]).unwrap();
    }

    #[test]
    fn write_register_rejects_multi_element_lists() {
        let mut adapter = booted_adapter();
        let mut surface = TargetSurface::new(&mut adapter, 4);
        assert!(matches!(
            surface.write_register("rax", &[1, 2]),
            Err(TargetError::RegisterIsNotAnArray(_))
        ));
    }

    #[test]
    fn write_register_rejects_empty_list() {
        let mut adapter = booted_adapter();
        let mut surface = TargetSurface::new(&mut adapter, 4);
        assert!(matches!(
            surface.write_register("rax", &[]),
            Err(TargetError::EmptyRegisterWrite(_))
        ));
    }
}

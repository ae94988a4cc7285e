//! GDB/MI Debugger Adapter (spec.md section 4.3, component C3).
//!
//! Translates high-level operations (reset, set_event, memory/register
//! read/write, run, interrupt, close, list_registers, list_mappings) into
//! GDB/MI commands against a child `gdb` process, matches responses
//! structurally, and tracks the inferior's execution state machine.

#![forbid(unsafe_code)]

pub mod adapter;
pub mod breakpoints;
pub mod error;
pub mod mappings;
pub mod matcher;
pub mod memory;
pub mod registers;
pub mod reset;
pub mod state;
pub mod transport;
pub mod value;

pub use adapter::{DebuggerAdapter, GdbLaunchConfig};
pub use breakpoints::Breakpoint;
pub use error::AdapterError;
pub use state::InferiorState;
pub use value::MiMessage;

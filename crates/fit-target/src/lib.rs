//! Target Surface (spec.md §4.4, component C4): typed memory and register
//! views layered above the Debugger Adapter.

#![forbid(unsafe_code)]

pub mod address;
pub mod error;
pub mod surface;
pub mod symbol;

pub use address::{ResolvedAddress, resolve_target};
pub use error::TargetError;
pub use surface::TargetSurface;
pub use symbol::{SymbolInfo, SymbolResolver};

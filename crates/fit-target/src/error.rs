//! Error type for the Target Surface.

use fit_mi::AdapterError;
use fit_types::FitError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TargetError {
    /// A textual target did not parse under spec.md §3's grammar.
    #[error(transparent)]
    Classification(#[from] FitError),

    /// A `Variable` target's base name is not in the `SymbolResolver`.
    #[error("unresolved symbol {0:?}")]
    UnresolvedSymbol(String),

    /// A memory/register transaction against the Debugger Adapter failed.
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    /// A read returned no words at all (an empty range or a malformed MI
    /// response).
    #[error("read produced no words")]
    EmptyRead,

    /// Writing a zero-length value list to a register (spec.md §4.4 only
    /// permits a scalar or a one-element list).
    #[error("cannot write an empty value list to register {0:?}")]
    EmptyRegisterWrite(String),

    /// Writing a list of more than one value to a register (spec.md §4.4:
    /// "register is not an array").
    #[error("register {0:?} is not an array")]
    RegisterIsNotAnArray(String),
}

//! Builds a typed [`ResolvedAddress`] from campaign-row text (spec.md §9:
//! "Overloaded indexing over `int | str | Range` becomes a typed `Address`
//! enum at the API boundary").

use fit_types::target::{Target, parse_target};

use crate::error::TargetError;
use crate::symbol::SymbolResolver;

/// A target text, fully resolved to something the Debugger Adapter can act
/// on directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedAddress {
    /// A single machine word at a fixed address (an `Address` target, or a
    /// resolved `Variable`).
    Word(u64),
    /// A half-open byte range `[lo, hi)`.
    Range(u64, u64),
    /// A named architectural register.
    Register(String),
}

/// Classify `text` per spec.md §3, then resolve `Variable` targets (with an
/// optional `±N`/`±0xN` byte offset suffix, spec.md §4.4) through `resolver`.
pub fn resolve_target(
    text: &str,
    known_registers: &[String],
    resolver: &dyn SymbolResolver,
) -> Result<ResolvedAddress, TargetError> {
    match parse_target(text, known_registers)? {
        Target::Address(addr) => Ok(ResolvedAddress::Word(addr)),
        Target::Range(lo, hi) => Ok(ResolvedAddress::Range(lo, hi)),
        Target::Register(name) => Ok(ResolvedAddress::Register(name)),
        Target::Variable(name) => {
            let (base, offset) = split_offset(&name);
            let info = resolver.resolve(base).ok_or_else(|| TargetError::UnresolvedSymbol(base.to_string()))?;
            let addr = info.address.wrapping_add_signed(offset);
            Ok(ResolvedAddress::Word(addr))
        }
    }
}

/// Split a trailing `+N`, `-N`, `+0xN`, or `-0xN` byte offset off a symbol
/// name. Returns `(base_name, offset)`; `offset` is `0` when there's no
/// suffix.
fn split_offset(text: &str) -> (&str, i64) {
    let Some(sign_pos) = text.rfind(['+', '-']) else {
        return (text, 0);
    };
    // A leading sign (e.g. a name that is itself just "-1") isn't an offset
    // suffix on anything.
    if sign_pos == 0 {
        return (text, 0);
    }

    let (base, suffix) = text.split_at(sign_pos);
    let sign: i64 = if suffix.starts_with('-') { -1 } else { 1 };
    let digits = &suffix[1..];

    let magnitude = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()
    } else {
        digits.parse::<i64>().ok()
    };

    match magnitude {
        Some(m) => (base, sign * m),
        None => (text, 0),
    }
}

//! Distributions and bit-pattern stencils (spec.md §4.1, §4.2 — components
//! C1 and C2). Pure and PRNG-driven: nothing here touches a process or a
//! debugger. All sampling in a campaign goes through the single shared PRNG
//! handed in at construction, so a seed makes a whole campaign reproducible
//! (spec.md §4.1, §6).

#![forbid(unsafe_code)]

pub mod distribution;
pub mod error;
pub mod stencil;

pub use distribution::Distribution;
pub use error::SamplingError;
pub use stencil::Stencil;

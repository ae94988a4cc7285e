//! Shared data model for the fault-injection orchestrator.
//!
//! This crate owns the types every other crate in the workspace agrees on:
//! [`Target`], [`Operation`], [`WordList`], [`TargetLabel`], the campaign
//! configuration types, and the run-record export shape. None of it talks to a
//! debugger or a process; it is pure data plus the textual grammar used to
//! classify a target (see `target::parse_target`).

#![forbid(unsafe_code)]

pub mod campaign_config;
pub mod error;
pub mod run_record;
pub mod target;
pub mod wordlist;

pub use campaign_config::{CampaignConfig, CampaignRow, GdbConfig, InjectionDelay, Operation};
pub use error::FitError;
pub use run_record::{RunRecord, RunResult};
pub use target::{Target, TargetLabel};
pub use wordlist::WordList;

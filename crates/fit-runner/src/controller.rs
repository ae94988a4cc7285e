//! [`RunController`] (spec.md §4.6, component C6): golden run, per-iteration
//! injected runs, timed cancellation of the final blocking `run`, and
//! `RunRecord` snapshot/export.
//!
//! Grounded on `frankenlibc-harness/src/runner.rs`'s `TestRunner::run` (drive
//! N items, collect records) and `examples/original_source/fit/injector.py`'s
//! `Injector.run` (the per-iteration reset/sleep/interrupt/inject/resume
//! sequence this mirrors almost step for step).

use std::time::{Duration, Instant};

use fit_campaign::CampaignEngine;
use fit_mi::DebuggerAdapter;
use fit_mi::adapter::RunOutcome;
use fit_mi::breakpoints::{RESERVED_TIMEOUT, RESERVED_UNKNOWN};
use fit_mi::transport::Transport;
use fit_target::{ResolvedAddress, SymbolResolver, TargetSurface, resolve_target};
use fit_types::{CampaignConfig, Operation, RunRecord, RunResult, TargetLabel};

use crate::error::RunnerError;
use crate::record_sink::RecordSink;

/// Everything produced by a full campaign (spec.md §3: "a campaign
/// accumulates a singleton `golden: RunRecord` and a list `runs:
/// [RunRecord]`").
pub struct CampaignResult {
    pub golden: RunRecord,
    pub runs: Vec<RunRecord>,
}

/// Drives one [`DebuggerAdapter`] through an entire campaign. Owns the
/// campaign's [`CampaignEngine`] (and, through it, the single shared PRNG
/// spec.md §5 requires); borrows the adapter and symbol resolver, both of
/// which outlive the campaign.
pub struct RunController<'a, T: Transport> {
    adapter: &'a mut DebuggerAdapter<T>,
    resolver: &'a dyn SymbolResolver,
    engine: CampaignEngine,
    target_word_bytes: u32,
}

impl<'a, T: Transport> RunController<'a, T> {
    #[must_use]
    pub fn new(
        adapter: &'a mut DebuggerAdapter<T>,
        resolver: &'a dyn SymbolResolver,
        engine: CampaignEngine,
        target_word_bytes: u32,
    ) -> Self {
        Self { adapter, resolver, engine, target_word_bytes }
    }

    /// Run the whole campaign: golden run, then `config.number_of_runs`
    /// injected iterations. Each finished record is handed to `sink` as soon
    /// as it completes (spec.md §4.6, §6 "the core emits a stream of typed
    /// `RunRecord`s").
    pub fn run_campaign(
        &mut self,
        config: &CampaignConfig,
        sink: &mut dyn RecordSink,
    ) -> Result<CampaignResult, RunnerError> {
        let golden = self.run_golden(config)?;
        sink.emit(&golden);

        let mut runs = Vec::with_capacity(config.number_of_runs as usize);
        for _ in 0..config.number_of_runs {
            let record = self.run_iteration(config, &golden)?;
            sink.emit(&record);
            runs.push(record);
        }

        Ok(CampaignResult { golden, runs })
    }

    /// `reset → register golden_result_condition → run(blocking) →
    /// snapshot` (spec.md §4.6 first paragraph).
    fn run_golden(&mut self, config: &CampaignConfig) -> Result<RunRecord, RunnerError> {
        self.adapter.reset()?;
        self.adapter.set_event(&config.golden_result_condition)?;

        let deadline = Some(Instant::now() + Duration::from_millis(config.timeout_ms));
        let outcome = self.adapter.run(true, deadline)?;
        let result = self.label_blocking_outcome(outcome)?;

        let labels = self.engine.declared_targets().to_vec();
        self.snapshot(&labels, &result)
    }

    /// The per-iteration protocol, spec.md §4.6 steps 1-10.
    fn run_iteration(&mut self, config: &CampaignConfig, golden: &RunRecord) -> Result<RunRecord, RunnerError> {
        // 1. reset (clears all breakpoints).
        self.adapter.reset()?;

        // 2. register golden_result_condition and every additional
        // result_condition.
        self.adapter.set_event(&config.golden_result_condition)?;
        for event in &config.result_condition {
            self.adapter.set_event(event)?;
        }

        let labels = self.engine.declared_targets().to_vec();

        // 3. start non-blocking; a stop here means a condition fired before
        // the injection window opened.
        if let RunOutcome::Stopped(name) = self.adapter.run(false, None)? {
            let record = self.snapshot(&labels, &name)?;
            record.check_key_set_matches(golden)?;
            return Ok(record);
        }

        // 4. sleep injection_delay, sampled per iteration.
        let delay_ms = self
            .engine
            .sample_injection_delay_ms(config.injection_delay.min_ms, config.injection_delay.max_ms);
        std::thread::sleep(Duration::from_millis(delay_ms));

        // 5. interrupt; a named (non-"unknown") stop means a condition fired
        // during the sleep.
        let stop_name = match self.adapter.interrupt()? {
            RunOutcome::Stopped(name) => name,
            _ => return Err(RunnerError::ProtocolInvariantViolated("interrupt() did not resolve to a stop")),
        };
        if stop_name != RESERVED_UNKNOWN {
            let record = self.snapshot(&labels, &stop_name)?;
            record.check_key_set_matches(golden)?;
            return Ok(record);
        }

        // 6. sample + apply the injection.
        self.inject()?;

        // 7-8. resume blocking, cancellable by timeout; label the outcome.
        let deadline = Some(Instant::now() + Duration::from_millis(config.timeout_ms));
        let outcome = self.adapter.run(true, deadline)?;
        let result = self.label_blocking_outcome(outcome)?;

        // 9-10. snapshot and append.
        let record = self.snapshot(&labels, &result)?;
        record.check_key_set_matches(golden)?;
        Ok(record)
    }

    /// Resolve a blocking `run`'s outcome to a result label, forcibly
    /// interrupting the inferior on a timeout (spec.md §4.6 step 7, §5
    /// cancellation semantics: "On cancellation the controller must
    /// interrupt and transition the adapter to `Interrupted`; failure to do
    /// so is fatal for the campaign").
    fn label_blocking_outcome(&mut self, outcome: RunOutcome) -> Result<String, RunnerError> {
        match outcome {
            RunOutcome::Stopped(name) => Ok(name),
            RunOutcome::StillRunning => {
                Err(RunnerError::ProtocolInvariantViolated("blocking run() returned StillRunning"))
            }
            RunOutcome::TimedOut => {
                self.adapter
                    .interrupt()
                    .map_err(|e| RunnerError::InterruptAfterTimeoutFailed(e.to_string()))?;
                Ok(RESERVED_TIMEOUT.to_string())
            }
        }
    }

    /// Sample an injection and apply it through the Target Surface (spec.md
    /// §4.5 step 4: "the caller applies the operation via C4").
    fn inject(&mut self) -> Result<(), RunnerError> {
        let bit_width = self.target_word_bytes * 8;
        let sampled = self.engine.sample_injection(self.target_word_bytes, bit_width)?;

        let known_registers: Vec<String> = self.adapter.list_registers().to_vec();
        let resolved = resolve_target(&sampled.target_text, &known_registers, self.resolver)?;
        let mut surface = TargetSurface::new(&mut *self.adapter, self.target_word_bytes);

        match resolved {
            ResolvedAddress::Word(addr) => {
                let old = surface.read_word(addr)?;
                let pattern = sampled.words.first().copied().unwrap_or(0);
                surface.write_word(addr, apply(sampled.operation, old, pattern))?;
            }
            ResolvedAddress::Range(lo, hi) => {
                let old = surface.read_range(lo, hi, None)?;
                let n = old.len().min(sampled.words.len());
                let new_words: Vec<u64> = (0..n)
                    .map(|i| apply(sampled.operation, old.as_slice()[i], sampled.words[i]))
                    .collect();
                surface.write_range(lo, hi, None, &new_words)?;
            }
            ResolvedAddress::Register(name) => {
                let old = surface.read_register(&name)? as u64;
                let pattern = sampled.words.first().copied().unwrap_or(0);
                surface.write_register(&name, &[apply(sampled.operation, old, pattern)])?;
            }
        }
        Ok(())
    }

    /// Read every declared target's current value into a [`RunRecord`]
    /// (spec.md §4.6 step 9: "same key set as golden").
    fn snapshot(&mut self, labels: &[TargetLabel], result: &str) -> Result<RunRecord, RunnerError> {
        let known_registers: Vec<String> = self.adapter.list_registers().to_vec();
        let mut surface = TargetSurface::new(&mut *self.adapter, self.target_word_bytes);
        let mut record = RunRecord::new(result);

        for label in labels {
            let resolved = resolve_target(label, &known_registers, self.resolver)?;
            let value = match resolved {
                ResolvedAddress::Word(addr) => RunResult::Scalar(surface.read_word(addr)? as i64),
                ResolvedAddress::Range(lo, hi) => {
                    let words = surface.read_range(lo, hi, None)?;
                    RunResult::List(words.as_slice().iter().map(|w| *w as i64).collect())
                }
                ResolvedAddress::Register(name) => RunResult::Scalar(surface.read_register(&name)?),
            };
            record.insert(label.clone(), value);
        }
        Ok(record)
    }
}

fn apply(operation: Operation, old: u64, pattern: u64) -> u64 {
    operation.apply(old, pattern)
}

//! [`DebuggerAdapter`] (spec.md §4.3, component C3): ties the transport,
//! parser, matcher, state machine, register set, and breakpoint registry
//! together into the operation set the Run Controller drives.

use std::time::Instant;

use fit_types::campaign_config::{BoardFamily, GdbConfig};
use serde_json::{Value, json};

use crate::breakpoints::{Breakpoint, BreakpointRegistry, RESERVED_EXIT, RESERVED_UNKNOWN};
use crate::error::AdapterError;
use crate::mappings::{self, MemoryMapping};
use crate::matcher::{Expected, check_any, is_error_record};
use crate::memory::{self, Endianness};
use crate::registers::{self, RegisterSet};
use crate::reset;
use crate::state::InferiorState;
use crate::transport::Transport;
use crate::value::MiMessage;

const GDB_FLAGS: [&str; 3] = ["-q", "--nx", "--interpreter=mi3"];

/// Everything needed to launch and attach a debugger session, gathered from
/// [`fit_types::CampaignConfig::gdb`] plus the resolved executable path.
#[derive(Debug, Clone)]
pub struct GdbLaunchConfig {
    pub executable: String,
    pub gdb: GdbConfig,
}

/// What a `run`/`interrupt` call resolved to (spec.md §3, §4.6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// A breakpoint/event fired, resolved to its registered name, or one of
    /// the reserved labels `exit`/`unknown`.
    Stopped(String),
    /// A non-blocking `run` found nothing pending; the inferior is now
    /// `Running`.
    StillRunning,
    /// The caller's deadline elapsed before a stop was observed.
    TimedOut,
}

/// Drives a single `gdb`/`gdb-multiarch` child process for the lifetime of
/// one campaign (spec.md §3 "Lifecycles").
pub struct DebuggerAdapter<T: Transport> {
    transport: T,
    state: InferiorState,
    registers: RegisterSet,
    breakpoints: BreakpointRegistry,
    board_family: BoardFamily,
    embedded: bool,
    endianness: Endianness,
}

impl<T: Transport> DebuggerAdapter<T> {
    /// Construct an adapter over an already-spawned transport. Performs the
    /// construction sequence from spec.md §4.3: `mi-async on`, optional
    /// remote attach, register-name query, then a first `reset`.
    pub fn new(mut transport: T, config: &GdbLaunchConfig) -> Result<Self, AdapterError> {
        write_and_await(
            &mut transport,
            "-gdb-set mi-async on",
            &[done()],
        )?;

        if let Some(remote) = &config.gdb.remote {
            validate_remote_address(remote)?;
            write_and_await(
                &mut transport,
                &format!("-target-select extended-remote {remote}"),
                &[done(), Expected::new(json!({"message": "connected"}))],
            )?;
        }

        let register_names = write_and_await(&mut transport, "-data-list-register-names", &[done()])?;
        let done_msg = find_message(&register_names, "done")?;
        let registers = RegisterSet::from_payload(&done_msg["payload"])?;

        let mut adapter = Self {
            transport,
            state: InferiorState::Starting,
            registers,
            breakpoints: BreakpointRegistry::new(),
            board_family: config.gdb.board_family,
            embedded: config.gdb.embedded,
            endianness: Endianness::Little,
        };
        adapter.reset()?;
        Ok(adapter)
    }

    #[must_use]
    pub fn state(&self) -> InferiorState {
        self.state
    }

    #[must_use]
    pub fn list_registers(&self) -> &[String] {
        self.registers.names()
    }

    /// Mutable access to the underlying transport, for tests that need to
    /// queue further scripted responses after construction.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// `reset` (spec.md §3, §4.3): clears breakpoints, runs the hosted or
    /// embedded sequence, and returns the adapter to `Interrupted`.
    pub fn reset(&mut self) -> Result<(), AdapterError> {
        self.breakpoints.clear();
        if self.embedded {
            reset::reset_embedded(&mut self.transport, self.board_family)?;
        } else {
            reset::reset_hosted(&mut self.transport)?;
        }
        self.state = InferiorState::Interrupted;
        Ok(())
    }

    /// `set_event` (spec.md §4.3 "Breakpoint set"): requires not `Running`.
    pub fn set_event(&mut self, event: &str) -> Result<(), AdapterError> {
        self.state.require_not_running("set_event")?;

        let responses = write_and_await(&mut self.transport, &format!("-break-insert {event}"), &[done()])?;
        let done_msg = find_message(&responses, "done")?;

        let bkpt = &done_msg["payload"]["bkpt"];
        let id = bkpt["number"]
            .as_str()
            .and_then(|s| s.parse::<u32>().ok())
            .ok_or_else(|| AdapterError::EventNotSet {
                name: event.to_string(),
                detail: "missing bkpt.number".to_string(),
            })?;
        let address = bkpt["addr"]
            .as_str()
            .and_then(|s| u64::from_str_radix(s.trim_start_matches("0x"), 16).ok())
            .unwrap_or(0);

        self.breakpoints.insert(Breakpoint { id, address, name: event.to_string() });
        Ok(())
    }

    /// `read_memory` (spec.md §4.3 "Memory read"): requires not `Running`.
    pub fn read_memory(&mut self, address: u64, count: u64, word_bytes: u32) -> Result<Vec<u64>, AdapterError> {
        self.state.require_not_running("read_memory")?;

        let responses = write_and_await(
            &mut self.transport,
            &format!("-data-read-memory-bytes {address:#x} {count}"),
            &[done()],
        )?;
        let done_msg = find_message(&responses, "done")?;
        let chunks = memory::chunks_from_payload(&done_msg["payload"]["memory"])?;
        let (words, missing) = memory::parse_chunks(&chunks, address, count, word_bytes, self.endianness);
        if !missing.is_empty() {
            // Caller-visible gaps are zero-filled; spec.md §4.3 calls this
            // log-worthy, not fatal.
            for (lo, hi) in missing {
                eprintln!("warn: memory read {address:#x}+{count}: gap [{lo:#x}, {hi:#x}) zero-filled");
            }
        }
        Ok(words)
    }

    /// `write_memory` (spec.md §4.3 "Memory write"): requires not `Running`.
    pub fn write_memory(&mut self, address: u64, words: &[u64], word_bytes: u32) -> Result<(), AdapterError> {
        self.state.require_not_running("write_memory")?;

        let hex = memory::pack_words(words, word_bytes, self.endianness);
        write_and_await(
            &mut self.transport,
            &format!("-data-write-memory-bytes {address:#x} {hex}"),
            &[done()],
        )?;
        Ok(())
    }

    /// `read_register` (spec.md §4.3 "Register read"): requires not `Running`.
    pub fn read_register(&mut self, name: &str) -> Result<i64, AdapterError> {
        self.state.require_not_running("read_register")?;

        if !self.registers.contains(name) {
            return Err(AdapterError::UnknownRegister(name.to_string()));
        }
        let responses = write_and_await(&mut self.transport, "-data-list-register-values d", &[done()])?;
        let done_msg = find_message(&responses, "done")?;
        registers::extract_register_value(&done_msg["payload"], &self.registers, name)
    }

    /// `write_register` (spec.md §6 wire command `set $reg=0xNN`): requires
    /// not `Running`.
    pub fn write_register(&mut self, name: &str, value: u64) -> Result<(), AdapterError> {
        self.state.require_not_running("write_register")?;

        let index = self.registers.index_of(name).ok_or_else(|| AdapterError::UnknownRegister(name.to_string()))?;
        let original = self.registers.original_name(index).unwrap_or(name);
        write_and_await(
            &mut self.transport,
            &format!("-interpreter-exec console \"set ${original}={value:#x}\""),
            &[done()],
        )?;
        Ok(())
    }

    /// `run` (spec.md §4.6 step 3/7): requires `Interrupted`. A non-blocking
    /// call never waits on more MI traffic arriving — it takes a single
    /// bounded drain of whatever the transport already has buffered (spec.md
    /// §5: "reading an MI response is a bounded poll") and reports
    /// `StillRunning` if that didn't include a stop. Blocking calls poll
    /// until a stop is observed or `deadline` elapses.
    pub fn run(&mut self, blocking: bool, deadline: Option<Instant>) -> Result<RunOutcome, AdapterError> {
        self.state.require_one_of(&[InferiorState::Interrupted], "run")?;

        self.transport.send("-exec-continue")?;
        self.state = InferiorState::Running;

        if !blocking {
            let batch = self.transport.poll(Some(Instant::now()))?;
            return Ok(self.scan_for_stop(&batch)?.unwrap_or(RunOutcome::StillRunning));
        }

        loop {
            let batch = self.transport.poll(deadline)?;
            if let Some(outcome) = self.scan_for_stop(&batch)? {
                return Ok(outcome);
            }
            if let Some(dl) = deadline {
                if Instant::now() >= dl {
                    return Ok(RunOutcome::TimedOut);
                }
            }
        }
    }

    /// `interrupt` (spec.md §4.3, §4.6 step 5): requires `Running`. Sends
    /// `-exec-interrupt --all` and awaits the resulting stop.
    pub fn interrupt(&mut self) -> Result<RunOutcome, AdapterError> {
        self.state.require_one_of(&[InferiorState::Running], "interrupt")?;

        self.transport.send("-exec-interrupt --all")?;
        loop {
            let batch = self.transport.poll(None)?;
            if let Some(outcome) = self.scan_for_stop(&batch)? {
                return Ok(outcome);
            }
        }
    }

    /// `close` (spec.md §3): requires not `Running`.
    pub fn close(&mut self) -> Result<(), AdapterError> {
        self.state.require_not_running("close")?;
        self.transport.send("-target-kill")?;
        Ok(())
    }

    /// `list_mappings` (spec.md §4.3 "Memory mappings"): requires not
    /// `Running`.
    pub fn list_mappings(&mut self) -> Result<Vec<MemoryMapping>, AdapterError> {
        self.state.require_not_running("list_mappings")?;

        let responses = write_and_await(
            &mut self.transport,
            "-interpreter-exec console \"info proc mappings\"",
            &[done()],
        )?;

        let lines: Vec<String> = responses
            .iter()
            .filter(|m| m["type"] == "console")
            .filter_map(|m| m["payload"].as_str().map(str::to_string))
            .collect();
        Ok(mappings::parse_mappings(&lines))
    }

    fn scan_for_stop(&mut self, batch: &[MiMessage]) -> Result<Option<RunOutcome>, AdapterError> {
        for msg in batch {
            if is_error_record(msg) {
                return Err(AdapterError::MiError(msg["payload"].clone()));
            }
            if msg["message"] != "stopped" {
                continue;
            }
            let payload = &msg["payload"];
            if payload["reason"] == "exited-normally" {
                self.state = InferiorState::Exited;
                return Ok(Some(RunOutcome::Stopped(RESERVED_EXIT.to_string())));
            }

            self.state = InferiorState::Interrupted;
            let name = payload["bkptno"]
                .as_str()
                .and_then(|s| s.parse::<u32>().ok())
                .map_or_else(|| RESERVED_UNKNOWN.to_string(), |id| self.breakpoints.resolve(id).to_string());
            return Ok(Some(RunOutcome::Stopped(name)));
        }
        Ok(None)
    }
}

fn done() -> Expected {
    Expected::new(json!({"message": "done"}))
}

fn write_and_await(transport: &mut dyn Transport, command: &str, wait_for: &[Expected]) -> Result<Vec<MiMessage>, AdapterError> {
    transport.send(command)?;
    let mut acc: Vec<MiMessage> = Vec::new();
    loop {
        let batch = transport.poll(None)?;
        for msg in &batch {
            if is_error_record(msg) {
                return Err(AdapterError::MiError(msg["payload"].clone()));
            }
        }
        acc.extend(batch);
        if acc.iter().any(|m| check_any(m, wait_for)) {
            return Ok(acc);
        }
    }
}

fn find_message<'a>(responses: &'a [MiMessage], class: &str) -> Result<&'a Value, AdapterError> {
    responses
        .iter()
        .find(|m| m["message"] == class)
        .ok_or_else(|| AdapterError::MalformedLine(format!("no {class:?} record in response")))
}

fn validate_remote_address(address: &str) -> Result<(), AdapterError> {
    let Some((_, port)) = address.split_once(':') else {
        return Err(AdapterError::InvalidRemoteAddress(address.to_string()));
    };
    if port.is_empty() || !port.chars().all(|c| c.is_ascii_digit()) {
        return Err(AdapterError::InvalidRemoteAddress(address.to_string()));
    }
    Ok(())
}

/// Build the `gdb` argv (spec.md §4.3: "child process with the flags `-q
/// --nx --interpreter=mi3` plus the target binary").
#[must_use]
pub fn gdb_args(executable: &str) -> Vec<String> {
    GDB_FLAGS.iter().map(|s| s.to_string()).chain(std::iter::once(executable.to_string())).collect()
}

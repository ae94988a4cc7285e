//! The line-oriented channel to a GDB/MI child process (spec.md §5: "one
//! helper task used to bound the duration of the final blocking `run` call").
//!
//! [`ChildProcessTransport`] spawns real `gdb`; a background thread reads its
//! stdout line-by-line and forwards parsed messages over a channel so the
//! controller thread can poll with a deadline without blocking forever on a
//! single `read`. No async runtime is involved, matching spec.md §9's note
//! that "no implicit global executor is required".

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::error::AdapterError;
use crate::value::{self, MiMessage};

/// The channel over which the adapter sends MI commands and receives parsed
/// MI messages. Implementations must serialise commands in order; this trait
/// is not meant to be shared across threads.
pub trait Transport {
    /// Send one line (without a trailing newline) to the debugger.
    fn send(&mut self, command: &str) -> Result<(), AdapterError>;

    /// Block until at least one message is available, or `deadline` elapses.
    /// A `None` deadline blocks indefinitely. Returns an empty vec on
    /// deadline expiry.
    fn poll(&mut self, deadline: Option<Instant>) -> Result<Vec<MiMessage>, AdapterError>;
}

/// Spawns a real `gdb`/`gdb-multiarch` child process.
pub struct ChildProcessTransport {
    child: Child,
    stdin: std::process::ChildStdin,
    lines: Receiver<std::io::Result<String>>,
    _reader: std::thread::JoinHandle<()>,
}

impl ChildProcessTransport {
    /// Spawn `gdb_path` with `args` (expected to already include `-q --nx
    /// --interpreter=mi3 <elf>`, per spec.md §4.3).
    pub fn spawn(gdb_path: &str, args: &[String]) -> Result<Self, AdapterError> {
        let mut child = Command::new(gdb_path)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| AdapterError::ChildProcessGone(e.to_string()))?;

        let stdin = child.stdin.take().expect("piped stdin");
        let stdout = child.stdout.take().expect("piped stdout");

        let (tx, rx) = mpsc::channel();
        let reader = std::thread::spawn(move || {
            let buf = BufReader::new(stdout);
            for line in buf.lines() {
                let done = line.is_err();
                if tx.send(line).is_err() || done {
                    break;
                }
            }
        });

        Ok(Self { child, stdin, lines: rx, _reader: reader })
    }
}

impl Transport for ChildProcessTransport {
    fn send(&mut self, command: &str) -> Result<(), AdapterError> {
        writeln!(self.stdin, "{command}").map_err(|e| AdapterError::ChildProcessGone(e.to_string()))
    }

    fn poll(&mut self, deadline: Option<Instant>) -> Result<Vec<MiMessage>, AdapterError> {
        let line = match deadline {
            None => self.lines.recv().map_err(|_| RecvTimeoutError::Disconnected),
            Some(dl) => {
                let remaining = dl.saturating_duration_since(Instant::now());
                self.lines.recv_timeout(remaining)
            }
        };

        match line {
            Ok(Ok(text)) => Ok(value::parse_line(&text).into_iter().collect()),
            Ok(Err(e)) => Err(AdapterError::ChildProcessGone(e.to_string())),
            Err(RecvTimeoutError::Timeout) => Ok(Vec::new()),
            Err(RecvTimeoutError::Disconnected) => {
                Err(AdapterError::ChildProcessGone("stdout pipe closed".to_string()))
            }
        }
    }
}

impl Drop for ChildProcessTransport {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Test double driven by a scripted, per-call sequence of responses. Each
/// call to `send` advances to the next scripted batch; `poll` drains one
/// scripted batch per call (empty once exhausted, so a blocking `run` with a
/// deadline can observe a timeout deterministically).
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    pub sent: Vec<String>,
    batches: std::collections::VecDeque<Vec<MiMessage>>,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a batch of raw MI lines to be parsed and returned by the next
    /// `poll()` call.
    pub fn push_lines(&mut self, lines: &[&str]) {
        let batch = lines.iter().filter_map(|l| value::parse_line(l)).collect();
        self.batches.push_back(batch);
    }
}

impl Transport for ScriptedTransport {
    fn send(&mut self, command: &str) -> Result<(), AdapterError> {
        self.sent.push(command.to_string());
        Ok(())
    }

    fn poll(&mut self, deadline: Option<Instant>) -> Result<Vec<MiMessage>, AdapterError> {
        if let Some(dl) = deadline {
            if Instant::now() >= dl {
                return Ok(Vec::new());
            }
        }
        Ok(self.batches.pop_front().unwrap_or_default())
    }
}

/// Wall-clock deadline helper shared by `run`'s blocking poll loop and the
/// run-controller's own cancellation (spec.md §4.6, §4.3).
#[must_use]
pub fn deadline_from(timeout: Duration) -> Instant {
    Instant::now() + timeout
}

//! Structured JSONL logging for campaign-engine and run-controller events
//! (spec.md §6: "Logs are written to the process's standard error.").
//!
//! Grounded on the harness's `structured_log.rs`: a canonical entry type, an
//! emitter abstraction, and no dependency on `log`/`tracing` (the teacher
//! crate doesn't use either).

use serde::Serialize;

/// Log severity, ordered least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Critical,
}

/// One structured log line.
#[derive(Debug, Clone, Serialize)]
pub struct LogEvent {
    pub timestamp: String,
    pub severity: Severity,
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

impl LogEvent {
    #[must_use]
    pub fn new(severity: Severity, event: impl Into<String>) -> Self {
        Self { timestamp: now_utc(), severity, event: event.into(), target: None, detail: None }
    }

    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    #[must_use]
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// Where structured log lines go. The default campaign run uses
/// [`StderrEmitter`] (spec.md §6); tests use an in-memory emitter.
pub trait Emitter {
    fn emit(&mut self, event: &LogEvent);
}

/// Writes one JSONL line per event to standard error.
#[derive(Debug, Default)]
pub struct StderrEmitter;

impl Emitter for StderrEmitter {
    fn emit(&mut self, event: &LogEvent) {
        if let Ok(line) = serde_json::to_string(event) {
            eprintln!("{line}");
        }
    }
}

/// Collects events in memory, for assertions in tests.
#[derive(Debug, Default)]
pub struct BufferEmitter {
    pub events: Vec<LogEvent>,
}

impl Emitter for BufferEmitter {
    fn emit(&mut self, event: &LogEvent) {
        self.events.push(event.clone());
    }
}

fn now_utc() -> String {
    let duration =
        std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).unwrap_or_default();
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        1970 + secs / 31_557_600,
        (secs % 31_557_600) / 2_629_800 + 1,
        (secs % 2_629_800) / 86400 + 1,
        (secs % 86400) / 3600,
        (secs % 3600) / 60,
        secs % 60,
        millis,
    )
}

//! Error type for the Debugger Adapter (spec.md §7: protocol errors and I/O
//! errors are fatal; target lifecycle events (`exit`, `Timeout`) are not
//! errors and never appear here).

use serde_json::Value;
use thiserror::Error;

use crate::state::InferiorState;

/// Fatal conditions raised while driving GDB/MI.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The MI line did not parse as a result, async, or stream record.
    #[error("could not parse MI line: {0:?}")]
    MalformedLine(String),

    /// GDB answered with an `^error` result record.
    #[error("gdb reported an error: {0}")]
    MiError(Value),

    /// An operation was attempted while the inferior was in a state that
    /// forbids it (spec.md §3 "Inferior state").
    #[error("operation {op} is not valid while inferior is {state:?}")]
    InvalidState {
        op: &'static str,
        state: InferiorState,
    },

    /// A `set_event`/`-break-insert` did not answer `^done`.
    #[error("failed to set event {name:?}: {detail}")]
    EventNotSet { name: String, detail: String },

    /// A register name was not found in the adapter's register-name list.
    #[error("unknown register {0:?}")]
    UnknownRegister(String),

    /// A register read returned an entry with no scalar `value` field.
    #[error("register {0:?} is a vector/special register, not supported")]
    VectorRegister(String),

    /// `-interpreter-exec console "info proc mappings"` produced a line with
    /// fewer than five whitespace-separated fields.
    #[error("malformed mappings line: {0:?}")]
    MalformedMapping(String),

    /// The gdb child process exited or its pipes closed unexpectedly.
    #[error("debugger process is no longer reachable: {0}")]
    ChildProcessGone(String),

    /// A configured remote address did not have the `host:port` shape.
    #[error("invalid remote address {0:?}, expected host:port")]
    InvalidRemoteAddress(String),

    /// The poll loop exhausted its deadline waiting for a matching response,
    /// outside of the run-controller's own timeout handling (spec.md §4.3
    /// "the adapter keeps polling until one of the expected shapes matches").
    #[error("timed out waiting for a matching MI response")]
    ResponseDeadlineExceeded,
}

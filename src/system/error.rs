use thiserror::Error;

/// The whole enumeration failed. The tick is skipped and the tracked set is
/// left as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnumerationError {
    #[error("process table came back empty")]
    Empty,
    #[error("process table is incomplete (own PID {0} missing)")]
    Incomplete(u32),
    #[error("snapshot worker failed: {0}")]
    Worker(String),
}

/// A single per-process read failed. Only that entry is skipped for the tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("process {0} has exited")]
    NotFound(u32),
    #[error("access denied reading process {0}")]
    AccessDenied(u32),
}

/// A user-initiated action failed. Surfaced as a notification, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("PID {0} not found")]
    NotFound(u32),
    #[error("{name} (PID {pid}) is a system process and cannot be ended")]
    Protected { pid: u32, name: String },
    #[error("failed to end PID {pid}: {reason}")]
    Failed { pid: u32, reason: String },
}

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::error::ReadError;
use super::process::ProcessState;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SystemTotals {
    pub cpu_usage_percent: f32,
    pub memory_total: u64,
    pub memory_used: u64,
}

/// Per-process info captured during one enumeration.
///
/// Every attribute that the OS may refuse to hand out is kept as a
/// `Result`, so the reconciler can tell "process gone" or "access denied"
/// apart from a real value.
#[derive(Debug, Clone)]
pub struct LiveProcess {
    pub pid: u32,
    pub name: Result<String, ReadError>,
    pub working_set: Result<u64, ReadError>,
    pub cpu_time: Result<Duration, ReadError>,
    pub exe: Result<Option<PathBuf>, ReadError>,
    pub state: ProcessState,
}

impl LiveProcess {
    pub fn new(pid: u32, name: impl Into<String>) -> Self {
        Self {
            pid,
            name: Ok(name.into()),
            working_set: Ok(0),
            cpu_time: Ok(Duration::ZERO),
            exe: Ok(None),
            state: ProcessState::Running,
        }
    }

    pub fn with_memory(mut self, bytes: u64) -> Self {
        self.working_set = Ok(bytes);
        self
    }

    pub fn with_cpu_time(mut self, cpu_time: Duration) -> Self {
        self.cpu_time = Ok(cpu_time);
        self
    }

    pub fn with_exe(mut self, path: impl Into<PathBuf>) -> Self {
        self.exe = Ok(Some(path.into()));
        self
    }

    pub fn name(&self) -> Result<&str, ReadError> {
        self.name.as_deref().map_err(|e| *e)
    }

    pub fn working_set_bytes(&self) -> Result<u64, ReadError> {
        self.working_set
    }

    pub fn cumulative_cpu_time(&self) -> Result<Duration, ReadError> {
        self.cpu_time
    }

    pub fn main_module_path(&self) -> Result<Option<&Path>, ReadError> {
        match &self.exe {
            Ok(path) => Ok(path.as_deref()),
            Err(e) => Err(*e),
        }
    }
}

/// One fresh enumeration of every live process.
#[derive(Debug, Clone)]
pub struct ProcessSnapshot {
    pub captured_at: Instant,
    pub logical_cpus: usize,
    pub totals: SystemTotals,
    pub processes: HashMap<u32, LiveProcess>,
}

impl ProcessSnapshot {
    pub fn new(
        captured_at: Instant,
        logical_cpus: usize,
        processes: impl IntoIterator<Item = LiveProcess>,
    ) -> Self {
        Self {
            captured_at,
            logical_cpus,
            totals: SystemTotals::default(),
            processes: processes.into_iter().map(|p| (p.pid, p)).collect(),
        }
    }

    pub fn contains(&self, pid: u32) -> bool {
        self.processes.contains_key(&pid)
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }
}

use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;

use super::cpu::CpuSampler;
use super::error::ReadError;
use super::history::ProcessHistory;
use super::platform;
use super::snapshot::LiveProcess;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProcessState {
    Running,
    Sleeping,
    Stopped,
    Zombie,
    Unknown,
}

impl ProcessState {
    pub fn label(self) -> &'static str {
        match self {
            ProcessState::Running => "Running",
            ProcessState::Sleeping => "Sleeping",
            ProcessState::Stopped => "Stopped",
            ProcessState::Zombie => "Zombie",
            ProcessState::Unknown => "Unknown",
        }
    }
}

/// One live process under observation.
///
/// Created the first time its PID shows up in an enumeration and refreshed
/// in place on every later tick until the PID disappears.
#[derive(Debug, Clone)]
pub struct TrackedProcess {
    pid: u32,
    name: String,
    exe: Option<PathBuf>,
    display_name: OnceCell<String>,
    state: ProcessState,
    memory_bytes: u64,
    cpu: CpuSampler,
    first_seen: Instant,
    history: ProcessHistory,
}

impl TrackedProcess {
    /// Builds a new entry from a live enumeration record. Needs the name and
    /// working set to be readable. A missing CPU time only means the sampler
    /// starts without a baseline.
    pub fn from_live(
        live: &LiveProcess,
        captured_at: Instant,
        history_capacity: usize,
    ) -> Result<Self, ReadError> {
        let name = live.name()?.to_string();
        let memory_bytes = live.working_set_bytes()?;
        let exe = live.main_module_path().ok().flatten().map(Path::to_path_buf);
        let cpu = match live.cumulative_cpu_time() {
            Ok(cpu_time) => CpuSampler::with_baseline(captured_at, cpu_time),
            Err(_) => CpuSampler::new(),
        };

        Ok(Self {
            pid: live.pid,
            name,
            exe,
            display_name: OnceCell::new(),
            state: live.state,
            memory_bytes,
            cpu,
            first_seen: captured_at,
            history: ProcessHistory::new(history_capacity),
        })
    }

    /// Refreshes mutable attributes from this tick's record.
    ///
    /// If the working set cannot be read nothing changes and the error is
    /// returned. Otherwise memory, state, CPU% and history all advance.
    pub fn refresh(
        &mut self,
        live: &LiveProcess,
        now: Instant,
        logical_cpus: usize,
    ) -> Result<(), ReadError> {
        let memory_bytes = live.working_set_bytes()?;
        self.memory_bytes = memory_bytes;
        self.state = live.state;

        if self.exe.is_none()
            && let Ok(Some(path)) = live.main_module_path()
        {
            self.exe = Some(path.to_path_buf());
            self.display_name = OnceCell::new();
        }

        let cpu = self.sample_cpu(now, live.cumulative_cpu_time(), logical_cpus);
        self.history.push(memory_bytes, cpu);
        Ok(())
    }

    pub fn sample_cpu(
        &mut self,
        now: Instant,
        cpu_time: Result<Duration, ReadError>,
        logical_cpus: usize,
    ) -> f64 {
        match cpu_time {
            Ok(cpu_time) => self.cpu.sample(now, cpu_time, logical_cpus),
            Err(err) => {
                tracing::debug!(pid = self.pid, %err, "cpu time unavailable");
                self.cpu.record_failure()
            }
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// File description of the executable, or the raw name. Resolved on
    /// first use and cached.
    pub fn display_name(&self) -> &str {
        self.display_name
            .get_or_init(|| resolve_display_name(self.exe.as_deref(), &self.name))
    }

    pub fn exe(&self) -> Option<&Path> {
        self.exe.as_deref()
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn memory_bytes(&self) -> u64 {
        self.memory_bytes
    }

    pub fn cpu_percent(&self) -> f64 {
        self.cpu.utilization()
    }

    pub fn cpu_sampler(&self) -> &CpuSampler {
        &self.cpu
    }

    pub fn first_seen(&self) -> Instant {
        self.first_seen
    }

    pub fn history(&self) -> &ProcessHistory {
        &self.history
    }

    pub fn is_protected(&self) -> bool {
        is_protected_path(self.exe.as_deref(), platform::system_directory().as_deref())
    }

    pub fn matches_filter(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty()
            || self.display_name().to_lowercase().contains(needle_lower)
            || self.name.to_lowercase().contains(needle_lower)
            || self.pid.to_string().contains(needle_lower)
    }
}

pub fn resolve_display_name(exe: Option<&Path>, fallback: &str) -> String {
    exe.filter(|path| path.is_file())
        .and_then(platform::file_description)
        .map(|desc| desc.trim().to_string())
        .filter(|desc| !desc.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// A process with no known executable, or one living under the OS system
/// directory, may not be ended from the viewer.
pub fn is_protected_path(exe: Option<&Path>, system_dir: Option<&Path>) -> bool {
    let Some(exe) = exe else {
        return true;
    };
    let Some(system_dir) = system_dir else {
        return false;
    };
    let exe = exe.to_string_lossy().to_lowercase();
    let system_dir = system_dir.to_string_lossy().to_lowercase();
    let system_dir = system_dir.trim_end_matches(['\\', '/']);
    exe.strip_prefix(system_dir)
        .is_some_and(|rest| rest.starts_with(['\\', '/']))
}

/// Everything the properties panel shows for one process.
#[derive(Debug, Clone)]
pub struct ProcessProperties {
    pub pid: u32,
    pub display_name: String,
    pub name: String,
    pub state: ProcessState,
    pub cpu_percent: f64,
    pub memory_bytes: u64,
    pub path: Option<PathBuf>,
    pub priority: Option<i32>,
    pub io_read_bytes: Option<u64>,
    pub io_write_bytes: Option<u64>,
    pub tracked_for: Duration,
    pub protected: bool,
    pub cpu_history: Vec<u64>,
    pub memory_history: Vec<u64>,
}

impl ProcessProperties {
    pub fn query(process: &TrackedProcess, now: Instant) -> Self {
        let io = platform::process_io(process.pid);
        Self {
            pid: process.pid,
            display_name: process.display_name().to_string(),
            name: process.name.clone(),
            state: process.state,
            cpu_percent: process.cpu_percent(),
            memory_bytes: process.memory_bytes,
            path: process.exe.clone(),
            priority: platform::process_priority(process.pid),
            io_read_bytes: io.map(|s| s.read_bytes),
            io_write_bytes: io.map(|s| s.write_bytes),
            tracked_for: now.saturating_duration_since(process.first_seen),
            protected: process.is_protected(),
            cpu_history: process.history.cpu_sparkline(),
            memory_history: process.history.memory().iter().copied().collect(),
        }
    }
}

use std::time::{Duration, Instant};

use sysinfo::{Pid, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System, UpdateKind};

use super::error::{EnumerationError, ReadError};
use super::platform;
use super::process::ProcessState;
use super::snapshot::{LiveProcess, ProcessSnapshot, SystemTotals};

/// Source of live process enumerations.
pub trait ProcessSource {
    fn list_processes(&mut self) -> Result<ProcessSnapshot, EnumerationError>;
}

/// `sysinfo`-backed process source.
pub struct Collector {
    sys: System,
    own_pid: Pid,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_all();
        Collector {
            sys,
            own_pid: Pid::from_u32(std::process::id()),
        }
    }

    fn logical_cpus(&self) -> usize {
        match self.sys.cpus().len() {
            0 => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            n => n,
        }
    }
}

impl ProcessSource for Collector {
    fn list_processes(&mut self) -> Result<ProcessSnapshot, EnumerationError> {
        let _span = tracing::debug_span!("collector.list_processes").entered();

        self.sys.refresh_memory();
        self.sys.refresh_cpu_all();
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing()
                .with_memory()
                .with_cpu()
                .with_exe(UpdateKind::OnlyIfNotSet),
        );
        let captured_at = Instant::now();

        let table = self.sys.processes();
        if table.is_empty() {
            return Err(EnumerationError::Empty);
        }
        if !table.contains_key(&self.own_pid) {
            return Err(EnumerationError::Incomplete(self.own_pid.as_u32()));
        }

        let zero_is_unreadable = platform::zero_working_set_is_unreadable();
        let processes = table.iter().map(|(pid, process)| {
            let pid = pid.as_u32();
            let name = process.name().to_string_lossy().into_owned();
            LiveProcess {
                pid,
                name: if name.is_empty() {
                    Err(ReadError::AccessDenied(pid))
                } else {
                    Ok(name)
                },
                working_set: working_set_read(pid, process.memory(), zero_is_unreadable),
                cpu_time: Ok(Duration::from_millis(process.accumulated_cpu_time())),
                exe: Ok(process.exe().map(|p| p.to_path_buf())),
                state: state_from_status(process.status()),
            }
        });

        let mut snapshot = ProcessSnapshot::new(captured_at, self.logical_cpus(), processes);
        snapshot.totals = SystemTotals {
            cpu_usage_percent: self.sys.global_cpu_usage(),
            memory_total: self.sys.total_memory(),
            memory_used: self.sys.used_memory(),
        };
        Ok(snapshot)
    }
}

/// sysinfo folds "could not open the process" into a zero reading on some
/// platforms. There it becomes a read failure so the entry keeps its last
/// known memory instead of dropping to 0.
fn working_set_read(pid: u32, bytes: u64, zero_is_unreadable: bool) -> Result<u64, ReadError> {
    if bytes == 0 && zero_is_unreadable {
        Err(ReadError::AccessDenied(pid))
    } else {
        Ok(bytes)
    }
}

fn state_from_status(status: ProcessStatus) -> ProcessState {
    match status {
        ProcessStatus::Run => ProcessState::Running,
        ProcessStatus::Sleep | ProcessStatus::Idle => ProcessState::Sleeping,
        ProcessStatus::Stop | ProcessStatus::Tracing => ProcessState::Stopped,
        ProcessStatus::Zombie | ProcessStatus::Dead => ProcessState::Zombie,
        _ => ProcessState::Unknown,
    }
}

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, Signal, System};

use super::error::ActionError;

pub fn signal_name(signal: Signal) -> &'static str {
    match signal {
        Signal::Term => "SIGTERM",
        Signal::Kill => "SIGKILL",
        _ => "signal",
    }
}

/// Ends `pid` with `signal`, falling back to a plain kill where the signal
/// is not supported (Windows only knows TerminateProcess).
///
/// The PID is re-resolved right before signalling so an exited process
/// reports `NotFound` instead of hitting whatever reused the PID later.
pub fn end_task(pid: u32, signal: Signal) -> Result<&'static str, ActionError> {
    let sys_pid = Pid::from_u32(pid);
    let mut sys = System::new();
    sys.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[sys_pid]),
        true,
        ProcessRefreshKind::nothing(),
    );
    let process = sys.process(sys_pid).ok_or(ActionError::NotFound(pid))?;
    let name = signal_name(signal);

    match process.kill_with(signal) {
        Some(true) => Ok(name),
        Some(false) => Err(ActionError::Failed {
            pid,
            reason: format!("could not send {name}"),
        }),
        None => {
            if process.kill() {
                Ok(name)
            } else {
                Err(ActionError::Failed {
                    pid,
                    reason: "permission denied?".to_string(),
                })
            }
        }
    }
}

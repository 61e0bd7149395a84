//! Periodic diff of the tracked set against a fresh enumeration.

use std::collections::HashSet;

use super::error::EnumerationError;
use super::history::DEFAULT_CAPACITY;
use super::process::TrackedProcess;
use super::snapshot::{ProcessSnapshot, SystemTotals};

/// Ordered collection of tracked processes. Insertion order is kept; any
/// sorting belongs to the presentation layer.
#[derive(Debug, Clone)]
pub struct TrackedSet {
    entries: Vec<TrackedProcess>,
    history_capacity: usize,
}

impl TrackedSet {
    pub fn new() -> Self {
        Self::with_history_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_history_capacity(history_capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            history_capacity,
        }
    }

    pub fn history_capacity(&self) -> usize {
        self.history_capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrackedProcess> {
        self.entries.iter()
    }

    pub fn get(&self, pid: u32) -> Option<&TrackedProcess> {
        self.entries.iter().find(|p| p.pid() == pid)
    }

    pub fn contains(&self, pid: u32) -> bool {
        self.get(pid).is_some()
    }

    pub fn pids(&self) -> Vec<u32> {
        self.entries.iter().map(TrackedProcess::pid).collect()
    }
}

impl Default for TrackedSet {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a TrackedSet {
    type Item = &'a TrackedProcess;
    type IntoIter = std::slice::Iter<'a, TrackedProcess>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// What one reconciliation did to the set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub removed: Vec<u32>,
    pub added: Vec<u32>,
    pub refreshed: usize,
    pub failed_refresh: Vec<u32>,
    pub skipped: Vec<u32>,
}

impl ReconcileReport {
    pub fn is_quiet(&self) -> bool {
        self.removed.is_empty()
            && self.added.is_empty()
            && self.failed_refresh.is_empty()
            && self.skipped.is_empty()
    }
}

#[derive(Debug)]
pub enum TickOutcome {
    Reconciled {
        report: ReconcileReport,
        totals: SystemTotals,
    },
    Skipped(EnumerationError),
}

/// Brings `set` in line with `snapshot`: drops exited PIDs, refreshes the
/// survivors in place and appends new PIDs in ascending order.
///
/// Per-entry read failures never abort the pass. A survivor that cannot be
/// refreshed keeps its last known values, and a new PID that cannot be
/// built is left for the next tick.
pub fn reconcile(set: &mut TrackedSet, snapshot: &ProcessSnapshot) -> ReconcileReport {
    let _span = tracing::debug_span!("reconcile", live = snapshot.len(), tracked = set.len())
        .entered();

    let mut report = ReconcileReport::default();

    set.entries.retain(|entry| {
        let alive = snapshot.contains(entry.pid());
        if !alive {
            report.removed.push(entry.pid());
        }
        alive
    });

    for entry in &mut set.entries {
        let Some(live) = snapshot.processes.get(&entry.pid()) else {
            continue;
        };
        match entry.refresh(live, snapshot.captured_at, snapshot.logical_cpus) {
            Ok(()) => report.refreshed += 1,
            Err(err) => {
                tracing::debug!(pid = entry.pid(), %err, "refresh skipped");
                report.failed_refresh.push(entry.pid());
            }
        }
    }

    let tracked: HashSet<u32> = set.entries.iter().map(TrackedProcess::pid).collect();
    let mut fresh: Vec<u32> = snapshot
        .processes
        .keys()
        .copied()
        .filter(|pid| !tracked.contains(pid))
        .collect();
    fresh.sort_unstable();

    for pid in fresh {
        let Some(live) = snapshot.processes.get(&pid) else {
            continue;
        };
        match TrackedProcess::from_live(live, snapshot.captured_at, set.history_capacity) {
            Ok(entry) => {
                set.entries.push(entry);
                report.added.push(pid);
            }
            Err(err) => {
                tracing::debug!(pid, %err, "new process skipped this tick");
                report.skipped.push(pid);
            }
        }
    }

    report
}

/// Applies one scheduler tick. A failed enumeration leaves `set` untouched.
pub fn apply_tick(
    set: &mut TrackedSet,
    result: Result<ProcessSnapshot, EnumerationError>,
) -> TickOutcome {
    match result {
        Ok(snapshot) => {
            let report = reconcile(set, &snapshot);
            tracing::debug!(
                removed = report.removed.len(),
                added = report.added.len(),
                refreshed = report.refreshed,
                failed_refresh = report.failed_refresh.len(),
                skipped = report.skipped.len(),
                "tick reconciled"
            );
            TickOutcome::Reconciled {
                report,
                totals: snapshot.totals,
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "enumeration failed, tick skipped");
            TickOutcome::Skipped(err)
        }
    }
}

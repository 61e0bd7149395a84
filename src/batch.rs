//! Headless mode: a fixed number of ticks printed to a writer, either as a
//! plain table or as JSON lines.

use std::io::Write;
use std::time::Duration;

use color_eyre::Result;
use serde::Serialize;

use crate::app::App;
use crate::config::Config;
use crate::format::{format_cpu, format_megabytes, truncate_unicode};
use crate::system::collector::ProcessSource;
use crate::system::process::{ProcessState, TrackedProcess};

#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    pub ticks: usize,
    pub interval: Duration,
    pub json: bool,
}

#[derive(Serialize)]
struct BatchRow<'a> {
    tick: u64,
    pid: u32,
    name: &'a str,
    display_name: &'a str,
    state: ProcessState,
    cpu_percent: f64,
    memory_bytes: u64,
}

impl<'a> BatchRow<'a> {
    fn new(tick: u64, process: &'a TrackedProcess) -> Self {
        BatchRow {
            tick,
            pid: process.pid(),
            name: process.name(),
            display_name: process.display_name(),
            state: process.state(),
            cpu_percent: process.cpu_percent(),
            memory_bytes: process.memory_bytes(),
        }
    }
}

#[derive(Serialize)]
struct SkippedTick<'a> {
    tick: u64,
    skipped: &'a str,
}

/// Ticks are paced with the runtime's timer, so the runtime thread stays free
/// between enumerations.
pub async fn run<S, W>(
    source: &mut S,
    config: Config,
    options: BatchOptions,
    out: &mut W,
) -> Result<()>
where
    S: ProcessSource,
    W: Write,
{
    let mut app = App::new(config);

    for tick in 1..=options.ticks as u64 {
        if tick > 1 {
            tokio::time::sleep(options.interval).await;
        }

        let result = source.list_processes();
        let skipped = result.as_ref().err().map(ToString::to_string);
        app.apply_snapshot(result);

        if let Some(reason) = skipped {
            if options.json {
                serde_json::to_writer(&mut *out, &SkippedTick { tick, skipped: &reason })?;
                writeln!(out)?;
            } else {
                writeln!(out, "tick {tick}: skipped ({reason})")?;
            }
            continue;
        }

        let rows = app.visible_processes();
        if options.json {
            for process in &rows {
                serde_json::to_writer(&mut *out, &BatchRow::new(tick, process))?;
                writeln!(out)?;
            }
        } else {
            write_table(out, tick, &app, &rows)?;
        }
    }

    out.flush()?;
    Ok(())
}

fn write_table<W: Write>(
    out: &mut W,
    tick: u64,
    app: &App,
    rows: &[&TrackedProcess],
) -> Result<()> {
    writeln!(
        out,
        "tick {tick}: {} processes, cpu {}, sort {}",
        rows.len(),
        format_cpu(f64::from(app.totals.cpu_usage_percent)),
        app.sort_mode.label()
    )?;
    writeln!(
        out,
        "{:>7}  {:<28}  {:<9}  {:>7}  {:>12}",
        "PID", "NAME", "STATUS", "CPU", "MEMORY"
    )?;
    for p in rows {
        writeln!(
            out,
            "{:>7}  {:<28}  {:<9}  {:>7}  {:>12}",
            p.pid(),
            truncate_unicode(p.display_name(), 28),
            p.state().label(),
            format_cpu(p.cpu_percent()),
            format_megabytes(p.memory_bytes())
        )?;
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::time::Instant;

    use super::*;
    use crate::system::error::EnumerationError;
    use crate::system::snapshot::{LiveProcess, ProcessSnapshot};

    struct ScriptedSource(VecDeque<Result<ProcessSnapshot, EnumerationError>>);

    impl ProcessSource for ScriptedSource {
        fn list_processes(&mut self) -> Result<ProcessSnapshot, EnumerationError> {
            self.0.pop_front().unwrap_or(Err(EnumerationError::Empty))
        }
    }

    fn options(ticks: usize, json: bool) -> BatchOptions {
        BatchOptions {
            ticks,
            interval: Duration::ZERO,
            json,
        }
    }

    fn snapshot() -> ProcessSnapshot {
        ProcessSnapshot::new(
            Instant::now(),
            2,
            vec![
                LiveProcess::new(10, "init").with_memory(2 * 1024 * 1024),
                LiveProcess::new(20, "shell").with_memory(1024 * 1024),
            ],
        )
    }

    #[tokio::test]
    async fn text_output_lists_every_process() {
        let mut source = ScriptedSource(VecDeque::from([Ok(snapshot())]));
        let mut out = Vec::new();
        run(&mut source, Config::default(), options(1, false), &mut out)
            .await
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("tick 1: 2 processes"));
        assert!(text.contains("init"));
        assert!(text.contains("2.00 MB"));
        assert!(text.contains("shell"));
    }

    #[tokio::test]
    async fn json_output_is_one_object_per_line() {
        let mut source = ScriptedSource(VecDeque::from([Ok(snapshot())]));
        let mut out = Vec::new();
        run(&mut source, Config::default(), options(1, true), &mut out)
            .await
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        let rows: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["pid"], 10);
        assert_eq!(rows[0]["state"], "Running");
        assert_eq!(rows[1]["memory_bytes"], 1024 * 1024);
    }

    #[tokio::test]
    async fn failed_enumeration_is_reported_and_skipped() {
        let mut source = ScriptedSource(VecDeque::from([
            Ok(snapshot()),
            Err(EnumerationError::Incomplete(1)),
        ]));
        let mut out = Vec::new();
        run(&mut source, Config::default(), options(2, false), &mut out)
            .await
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("tick 2: skipped (process table is incomplete"));
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_are_paced_on_the_runtime_timer() {
        let mut source = ScriptedSource(VecDeque::from([
            Ok(snapshot()),
            Ok(snapshot()),
            Ok(snapshot()),
        ]));
        let options = BatchOptions {
            ticks: 3,
            interval: Duration::from_secs(2),
            json: true,
        };
        let start = tokio::time::Instant::now();
        let mut out = Vec::new();
        run(&mut source, Config::default(), options, &mut out)
            .await
            .unwrap();

        // Two waits between three ticks, no wait before the first
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(4));
        assert!(elapsed < Duration::from_secs(6));
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 6);
    }
}

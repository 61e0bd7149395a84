use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, MouseEvent};
use futures::StreamExt;
use tokio::sync::{Notify, mpsc};
use tokio::time::{Interval, MissedTickBehavior};

use crate::system::collector::ProcessSource;
use crate::system::error::EnumerationError;
use crate::system::snapshot::ProcessSnapshot;

pub type SnapshotResult = Result<ProcessSnapshot, EnumerationError>;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    Snapshot(Box<SnapshotResult>),
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    refresh: Arc<Notify>,
    _input_task: tokio::task::JoinHandle<()>,
    _snapshot_task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    /// `make_source` builds the process source, and builds it again if an
    /// enumeration panics and takes the old one down with it.
    pub fn new<F, S>(make_source: F, refresh_rate: Duration) -> Self
    where
        F: Fn() -> S + Send + 'static,
        S: ProcessSource + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel::<Event>();
        let refresh = Arc::new(Notify::new());

        let input_task = tokio::spawn(forward_input(tx.clone()));
        let snapshot_task = tokio::spawn(run_snapshots(
            make_source,
            refresh_rate,
            refresh.clone(),
            tx,
        ));

        Self {
            rx,
            refresh,
            _input_task: input_task,
            _snapshot_task: snapshot_task,
        }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Asks for an enumeration ahead of the next scheduled tick.
    pub fn request_refresh(&self) {
        self.refresh.notify_one();
    }
}

async fn forward_input(tx: mpsc::UnboundedSender<Event>) {
    let mut reader = event::EventStream::new();
    while let Some(Ok(evt)) = reader.next().await {
        let mapped = match evt {
            CrosstermEvent::Key(key) => Some(Event::Key(key)),
            CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
            CrosstermEvent::Resize(_, _) => Some(Event::Resize),
            _ => None,
        };
        if let Some(e) = mapped
            && tx.send(e).is_err()
        {
            break;
        }
    }
}

fn snapshot_interval(refresh_rate: Duration) -> Interval {
    let mut interval = tokio::time::interval(refresh_rate);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Enumerates on a blocking thread, one at a time. A tick that comes due
/// while an enumeration is still running is delayed, never stacked.
///
/// A panicking enumeration is reported as `EnumerationError::Worker` and the
/// source is rebuilt for the next tick. The loop only ends once nobody is
/// listening.
async fn run_snapshots<F, S>(
    make_source: F,
    refresh_rate: Duration,
    refresh: Arc<Notify>,
    tx: mpsc::UnboundedSender<Event>,
) where
    F: Fn() -> S,
    S: ProcessSource + Send + 'static,
{
    let mut interval = snapshot_interval(refresh_rate);
    let mut source = None;

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = refresh.notified() => interval.reset(),
        }

        let mut current = source.take().unwrap_or_else(&make_source);
        let joined = tokio::task::spawn_blocking(move || {
            let result = current.list_processes();
            (current, result)
        })
        .await;

        let result = match joined {
            Ok((returned, result)) => {
                source = Some(returned);
                result
            }
            Err(err) => {
                tracing::error!(%err, "snapshot worker panicked, rebuilding source");
                Err(EnumerationError::Worker(err.to_string()))
            }
        };

        if tx.send(Event::Snapshot(Box::new(result))).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    use tokio::time::timeout;

    use super::*;
    use crate::system::snapshot::LiveProcess;

    const PERIOD: Duration = Duration::from_millis(100);

    /// Counts calls and the deepest overlap seen. Panics on the calls listed
    /// in `panic_on`, counted across every rebuilt instance.
    #[derive(Clone, Default)]
    struct ScriptedSource {
        calls: Arc<AtomicUsize>,
        in_flight: Arc<AtomicUsize>,
        max_in_flight: Arc<AtomicUsize>,
        panic_on: Vec<usize>,
        work: Duration,
    }

    impl ProcessSource for ScriptedSource {
        fn list_processes(&mut self) -> Result<ProcessSnapshot, EnumerationError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            let depth = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(depth, Ordering::SeqCst);
            if !self.work.is_zero() {
                std::thread::sleep(self.work);
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.panic_on.contains(&call) {
                panic!("enumeration {call} blew up");
            }
            Ok(ProcessSnapshot::new(
                Instant::now(),
                1,
                vec![LiveProcess::new(call as u32, "scripted")],
            ))
        }
    }

    struct Harness {
        rx: mpsc::UnboundedReceiver<Event>,
        refresh: Arc<Notify>,
        task: tokio::task::JoinHandle<()>,
    }

    fn start(source: ScriptedSource, period: Duration) -> Harness {
        let (tx, rx) = mpsc::unbounded_channel();
        let refresh = Arc::new(Notify::new());
        let task = tokio::spawn(run_snapshots(
            move || source.clone(),
            period,
            refresh.clone(),
            tx,
        ));
        Harness { rx, refresh, task }
    }

    async fn next_snapshot(rx: &mut mpsc::UnboundedReceiver<Event>) -> SnapshotResult {
        match rx.recv().await {
            Some(Event::Snapshot(result)) => *result,
            other => panic!("expected a snapshot, got {other:?}"),
        }
    }

    #[test]
    fn interval_delays_missed_ticks() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        rt.block_on(async {
            let interval = snapshot_interval(PERIOD);
            assert_eq!(interval.missed_tick_behavior(), MissedTickBehavior::Delay);
            assert_eq!(interval.period(), PERIOD);
        });
    }

    #[tokio::test(start_paused = true)]
    async fn worker_panic_is_reported_and_ticks_continue() {
        let source = ScriptedSource {
            panic_on: vec![1],
            ..ScriptedSource::default()
        };
        let calls = source.calls.clone();
        let mut h = start(source, PERIOD);

        assert!(matches!(
            next_snapshot(&mut h.rx).await,
            Err(EnumerationError::Worker(_))
        ));
        let second = next_snapshot(&mut h.rx).await.expect("rebuilt source enumerates");
        assert!(second.contains(2));
        assert!(next_snapshot(&mut h.rx).await.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(!h.task.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_are_paced_and_never_overlap() {
        let source = ScriptedSource {
            work: Duration::from_millis(5),
            ..ScriptedSource::default()
        };
        let max_in_flight = source.max_in_flight.clone();
        let mut h = start(source, PERIOD);

        let mut arrivals = Vec::new();
        for _ in 0..5 {
            assert!(next_snapshot(&mut h.rx).await.is_ok());
            arrivals.push(tokio::time::Instant::now());
        }

        assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);
        for pair in arrivals.windows(2) {
            assert!(pair[1] - pair[0] >= PERIOD);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_requests_coalesce() {
        let source = ScriptedSource {
            work: Duration::from_millis(50),
            ..ScriptedSource::default()
        };
        let calls = source.calls.clone();
        let mut h = start(source, Duration::from_secs(3600));

        // Burst of requests while the first enumeration is still running
        while calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        h.refresh.notify_one();
        h.refresh.notify_one();
        h.refresh.notify_one();

        assert!(next_snapshot(&mut h.rx).await.is_ok());
        assert!(next_snapshot(&mut h.rx).await.is_ok());

        // Nothing else is due until a full period after the refresh
        let quiet = timeout(Duration::from_secs(600), h.rx.recv()).await;
        assert!(quiet.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn task_exits_when_receiver_is_dropped() {
        let h = start(ScriptedSource::default(), PERIOD);
        drop(h.rx);

        let finished = timeout(Duration::from_secs(5), h.task).await;
        assert!(matches!(finished, Ok(Ok(()))));
    }
}

// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Continuous synchronisation of the listing with the photo directory.
//!
//! Three threads cooperate:
//!
//! * A **poller** snapshots the directory every poll interval and reports
//!   image files that appeared, disappeared or were modified.
//! * The **coordinator** (the calling thread) debounces those reports, and
//!   when the directory has been quiet for the debounce delay it queues a
//!   reconcile job tagged with a new generation number.
//! * A single **reconcile worker** runs jobs one at a time. Queued jobs are
//!   collapsed to the newest, and a pass only writes the listing if no newer
//!   job was queued while it was running, so the latest state always wins.

use std::{
    collections::BTreeMap,
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
        mpsc::{self, Receiver, RecvTimeoutError, Sender},
    },
    thread,
    time::{Duration, Instant, SystemTime},
};

use anyhow::{Context, Result, bail};
use tracing::{debug, error, info, warn};

use crate::{
    config::{AppConfig, WatchStrategy},
    sync::{Synchroniser, reconcile::is_image_file, scan::snapshot_directory},
};

/// How long the coordinator blocks when no change is pending.
const IDLE_WAIT: Duration = Duration::from_secs(1);

type Snapshot = BTreeMap<String, Option<SystemTime>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WatchEvent {
    /// An image file was created, deleted or modified.
    Changed(String),
    /// The directory could not be read. Polling carries on regardless.
    ScanFailed(String),
}

/// What happened to a single reconcile pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PassOutcome {
    Written,
    Unchanged,
    Superseded,
    Failed,
}

/// Delays action until events stop arriving for a while.
#[derive(Debug)]
pub(crate) struct Debouncer {
    delay: Duration,
    last_event: Option<Instant>,
}

impl Debouncer {
    pub(crate) fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_event: None,
        }
    }

    pub(crate) fn record(&mut self, now: Instant) {
        self.last_event = Some(now);
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.last_event.is_some()
    }

    /// Time left before a pending event is due, if there is one.
    pub(crate) fn remaining(&self, now: Instant) -> Option<Duration> {
        self.last_event
            .map(|last| (last + self.delay).saturating_duration_since(now))
    }

    /// Returns `true` once, when the quiet period after the last event has
    /// elapsed.
    pub(crate) fn take(&mut self, now: Instant) -> bool {
        match self.remaining(now) {
            Some(remaining) if remaining.is_zero() => {
                self.last_event = None;
                true
            }
            _ => false,
        }
    }
}

/// Monotonic job numbering shared between the coordinator and the worker.
#[derive(Debug, Default)]
pub(crate) struct Generations {
    latest: AtomicU64,
}

impl Generations {
    /// Starts a new generation, superseding every earlier one.
    pub(crate) fn begin(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == generation
    }
}

/// Runs the initial synchronisation and then keeps the listing in step with
/// the photo directory until the process is stopped.
///
/// # Errors
///
/// Fails straight away if the photo directory cannot be read at start-up.
/// Later read failures are logged and polling continues.
pub(crate) fn watch(config: &AppConfig, strategy: WatchStrategy) -> Result<()> {
    let synchroniser = Arc::new(Synchroniser::new(config));
    let dir = synchroniser.photos_dir().clone();

    let initial = snapshot_directory(&dir)
        .with_context(|| format!("Cannot watch {}", dir.display()))?;

    synchroniser
        .run(strategy)
        .context("Initial synchronisation failed")?;

    info!(
        "Watching {} for changes ({:?} strategy), press Ctrl+C to stop",
        dir.display(),
        strategy
    );

    let (event_tx, event_rx) = mpsc::channel();
    let poll_interval = Duration::from_millis(config.poll_interval_ms.max(1));
    spawn_poller(dir, poll_interval, initial, event_tx);

    let generations = Arc::new(Generations::default());
    let (job_tx, job_rx) = mpsc::channel();
    spawn_reconciler(synchroniser, strategy, Arc::clone(&generations), job_rx);

    let debounce = Duration::from_millis(config.debounce_ms);
    coordinate(&event_rx, &job_tx, &generations, debounce)?;

    bail!("Directory poller stopped unexpectedly")
}

/// Image files that differ between two snapshots.
pub(crate) fn diff_snapshots(before: &Snapshot, after: &Snapshot) -> Vec<String> {
    let removed = before.keys().filter(|name| !after.contains_key(*name));
    let added_or_modified = after
        .iter()
        .filter(|(name, modified)| before.get(name.as_str()) != Some(*modified))
        .map(|(name, _)| name);

    removed
        .chain(added_or_modified)
        .filter(|name| is_image_file(name))
        .cloned()
        .collect()
}

fn spawn_poller(
    dir: PathBuf,
    interval: Duration,
    initial: Snapshot,
    event_tx: Sender<WatchEvent>,
) {
    thread::spawn(move || {
        let mut previous = initial;
        let mut failing = false;

        loop {
            thread::sleep(interval);

            match snapshot_directory(&dir) {
                Ok(current) => {
                    if failing {
                        info!("{} is readable again", dir.display());
                        failing = false;
                    }
                    for name in diff_snapshots(&previous, &current) {
                        if event_tx.send(WatchEvent::Changed(name)).is_err() {
                            return;
                        }
                    }
                    previous = current;
                }
                Err(e) => {
                    // Report once per outage, not once per poll.
                    if !failing && event_tx.send(WatchEvent::ScanFailed(e.to_string())).is_err() {
                        return;
                    }
                    failing = true;
                }
            }
        }
    });
}

/// Turns change events into debounced reconcile jobs.
///
/// Returns once the event channel is closed, after dispatching any job that
/// was still pending.
fn coordinate(
    event_rx: &Receiver<WatchEvent>,
    job_tx: &Sender<u64>,
    generations: &Generations,
    delay: Duration,
) -> Result<()> {
    let mut debouncer = Debouncer::new(delay);

    loop {
        let timeout = debouncer.remaining(Instant::now()).unwrap_or(IDLE_WAIT);

        match event_rx.recv_timeout(timeout) {
            Ok(WatchEvent::Changed(name)) => {
                info!("Detected change: {}", name);
                debouncer.record(Instant::now());
            }
            Ok(WatchEvent::ScanFailed(message)) => {
                warn!("Cannot scan photo directory: {}", message);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                if debouncer.is_pending() {
                    dispatch(job_tx, generations)?;
                }
                return Ok(());
            }
        }

        if debouncer.take(Instant::now()) {
            dispatch(job_tx, generations)?;
        }
    }
}

fn dispatch(job_tx: &Sender<u64>, generations: &Generations) -> Result<()> {
    let generation = generations.begin();
    debug!("Queueing reconcile pass {}", generation);
    job_tx
        .send(generation)
        .context("Reconcile worker stopped")
}

fn spawn_reconciler(
    synchroniser: Arc<Synchroniser>,
    strategy: WatchStrategy,
    generations: Arc<Generations>,
    job_rx: Receiver<u64>,
) {
    thread::spawn(move || {
        while let Ok(mut generation) = job_rx.recv() {
            // Anything queued behind this job makes it obsolete.
            while let Ok(newer) = job_rx.try_recv() {
                generation = newer;
            }
            reconcile_pass(&synchroniser, strategy, &generations, generation);
        }
    });
}

/// Runs one reconcile pass, writing the result only if `generation` is still
/// the latest.
pub(crate) fn reconcile_pass(
    synchroniser: &Synchroniser,
    strategy: WatchStrategy,
    generations: &Generations,
    generation: u64,
) -> PassOutcome {
    let reconciliation = match synchroniser.prepare(strategy) {
        Ok(reconciliation) => reconciliation,
        Err(e) => {
            warn!("Reconcile pass {} failed: {}", generation, e);
            return PassOutcome::Failed;
        }
    };

    if !generations.is_current(generation) {
        debug!("Discarding superseded reconcile pass {}", generation);
        return PassOutcome::Superseded;
    }

    match synchroniser.commit(&reconciliation) {
        Ok(true) => {
            for path in &reconciliation.added {
                info!("Added {}", path);
            }
            for path in &reconciliation.removed {
                info!("Removed {}", path);
            }
            PassOutcome::Written
        }
        Ok(false) => PassOutcome::Unchanged,
        Err(e) => {
            error!("Reconcile pass {} failed: {}", generation, e);
            PassOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn snapshot(entries: &[(&str, u64)]) -> Snapshot {
        entries
            .iter()
            .map(|&(name, secs)| {
                let modified = SystemTime::UNIX_EPOCH + Duration::from_secs(secs);
                (name.to_string(), Some(modified))
            })
            .collect()
    }

    #[test]
    fn diff_reports_image_changes_only() {
        let before = snapshot(&[("a.jpg", 1), ("b.png", 1), ("gone.gif", 1), ("notes.txt", 1)]);
        let after = snapshot(&[("a.jpg", 1), ("b.png", 2), ("new.webp", 3), ("notes.txt", 9)]);

        let mut changed = diff_snapshots(&before, &after);
        changed.sort();

        assert_eq!(changed, ["b.png", "gone.gif", "new.webp"]);
        assert!(diff_snapshots(&after, &after).is_empty());
    }

    #[test]
    fn debouncer_waits_for_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        assert!(!debouncer.take(start));
        assert_eq!(debouncer.remaining(start), None);

        debouncer.record(start);
        debouncer.record(start + Duration::from_millis(300));

        assert!(!debouncer.take(start + Duration::from_millis(700)));
        assert_eq!(
            debouncer.remaining(start + Duration::from_millis(700)),
            Some(Duration::from_millis(100))
        );
        assert!(debouncer.take(start + Duration::from_millis(800)));

        // Fires once per burst.
        assert!(!debouncer.take(start + Duration::from_millis(900)));
    }

    #[test]
    fn only_latest_generation_is_current() {
        let generations = Generations::default();

        let first = generations.begin();
        assert!(generations.is_current(first));

        let second = generations.begin();
        assert!(second > first);
        assert!(!generations.is_current(first));
        assert!(generations.is_current(second));
    }

    #[test]
    fn burst_of_changes_queues_one_job() {
        let (event_tx, event_rx) = mpsc::channel();
        let (job_tx, job_rx) = mpsc::channel();
        let generations = Generations::default();

        for name in ["a.jpg", "b.jpg", "c.jpg"] {
            event_tx.send(WatchEvent::Changed(name.to_string())).unwrap();
        }
        event_tx
            .send(WatchEvent::ScanFailed("denied".to_string()))
            .unwrap();
        drop(event_tx);

        coordinate(&event_rx, &job_tx, &generations, Duration::from_secs(10)).unwrap();

        assert_eq!(job_rx.try_iter().collect::<Vec<_>>(), [1]);
    }

    fn fixture() -> (TempDir, Synchroniser) {
        let dir = TempDir::new().unwrap();
        let photos = dir.path().join("photos");
        fs::create_dir(&photos).unwrap();
        fs::write(photos.join("c_2016.jpg"), b"c").unwrap();

        let config = AppConfig {
            photos_dir: photos.to_string_lossy().into_owned(),
            listing_file: dir.path().join("data.js").to_string_lossy().into_owned(),
            ..AppConfig::default()
        };
        let synchroniser = Synchroniser::new(&config);

        (dir, synchroniser)
    }

    #[test]
    fn superseded_pass_does_not_write() {
        let (dir, synchroniser) = fixture();
        let generations = Generations::default();

        let stale = generations.begin();
        let latest = generations.begin();

        let outcome = reconcile_pass(&synchroniser, WatchStrategy::Full, &generations, stale);
        assert_eq!(outcome, PassOutcome::Superseded);
        assert!(!dir.path().join("data.js").exists());

        let outcome = reconcile_pass(&synchroniser, WatchStrategy::Full, &generations, latest);
        assert_eq!(outcome, PassOutcome::Written);
        let text = fs::read_to_string(dir.path().join("data.js")).unwrap();
        assert!(text.contains("photos/c_2016.jpg"));

        let outcome = reconcile_pass(&synchroniser, WatchStrategy::Full, &generations, latest);
        assert_eq!(outcome, PassOutcome::Unchanged);
    }

    #[test]
    fn missing_directory_fails_the_pass() {
        let (dir, synchroniser) = fixture();
        fs::remove_dir_all(dir.path().join("photos")).unwrap();
        let generations = Generations::default();
        let generation = generations.begin();

        let outcome =
            reconcile_pass(&synchroniser, WatchStrategy::Incremental, &generations, generation);

        assert_eq!(outcome, PassOutcome::Failed);
        assert!(!dir.path().join("data.js").exists());
    }
}

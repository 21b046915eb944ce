//! # Progress — Atomic Search Progress Counters
//!
//! Thread-safe progress tracking shared between the search workers and the
//! background status reporter. Workers publish in batches, so the atomics see
//! one update per few thousand candidates rather than one per candidate.
//!
//! ## Background Reporter
//!
//! A dedicated thread logs tested count, found count, rate (candidates/sec)
//! and elapsed time at a fixed interval. It polls the `shutdown` flag in
//! short slices so `stop()` + `join()` returns promptly.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

const SHUTDOWN_POLL: Duration = Duration::from_millis(200);

pub struct Progress {
    pub tested: AtomicU64,
    pub found: AtomicU64,
    start: Instant,
    shutdown: AtomicBool,
}

impl Progress {
    pub fn new() -> Arc<Self> {
        Arc::new(Progress {
            tested: AtomicU64::new(0),
            found: AtomicU64::new(0),
            start: Instant::now(),
            shutdown: AtomicBool::new(false),
        })
    }

    pub fn start_reporter(self: &Arc<Self>, interval: Duration) -> thread::JoinHandle<()> {
        let progress = Arc::clone(self);
        thread::spawn(move || {
            // None: the next report lies past what Instant can represent.
            let mut next = Instant::now().checked_add(interval);
            while !progress.shutdown.load(Ordering::Relaxed) {
                thread::sleep(SHUTDOWN_POLL.min(interval));
                if let Some(due) = next.filter(|due| Instant::now() >= *due) {
                    progress.print_status();
                    next = due.checked_add(interval);
                }
            }
        })
    }

    pub fn record(&self, tested: u64, found: u64) {
        if tested > 0 {
            self.tested.fetch_add(tested, Ordering::Relaxed);
        }
        if found > 0 {
            self.found.fetch_add(found, Ordering::Relaxed);
        }
    }

    pub fn print_status(&self) {
        let elapsed = self.start.elapsed();
        let tested = self.tested.load(Ordering::Relaxed);
        let found = self.found.load(Ordering::Relaxed);
        let rate = if elapsed.as_secs() > 0 {
            tested as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };
        let h = elapsed.as_secs() / 3600;
        let m = (elapsed.as_secs() % 3600) / 60;
        let s = elapsed.as_secs() % 60;
        info!(
            tested,
            rate = format_args!("{:.2}", rate),
            found,
            elapsed = format_args!("{:02}:{:02}:{:02}", h, m, s),
            "search progress"
        );
    }

    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

//! Elapsed-time counter for the workout being logged
//!
//! Elapsed time is measured against the clock: each run segment records its
//! start instant and is banked when the timer pauses. A background task, when
//! a tokio runtime is available, only publishes the whole-second count once
//! per tick to [`SessionTimer::subscribe`] watchers. Losing that task never
//! stops the count.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{interval_at, Instant};
use tracing::debug;

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Default)]
struct Clock {
    banked: Duration,
    running_since: Option<Instant>,
}

impl Clock {
    fn elapsed(&self) -> Duration {
        let current = self.running_since.map(|since| since.elapsed()).unwrap_or_default();
        self.banked + current
    }
}

#[derive(Debug)]
struct Shared {
    clock: Mutex<Clock>,
    ticks: watch::Sender<u64>,
}

impl Shared {
    fn clock(&self) -> MutexGuard<'_, Clock> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Pausable wall-clock stopwatch with a one-second tick feed
#[derive(Debug)]
pub struct SessionTimer {
    shared: Arc<Shared>,
    shutdown_tx: Option<mpsc::Sender<()>>,
}

impl SessionTimer {
    /// A timer that is already running
    pub fn started() -> Self {
        let (ticks, _) = watch::channel(0);
        let mut timer = Self {
            shared: Arc::new(Shared {
                clock: Mutex::new(Clock::default()),
                ticks,
            }),
            shutdown_tx: None,
        };
        timer.resume();
        timer
    }

    /// Start counting again; no-op while running
    pub fn resume(&mut self) {
        {
            let mut clock = self.shared.clock();
            if clock.running_since.is_some() {
                return;
            }
            clock.running_since = Some(Instant::now());
        }
        self.spawn_ticker();
    }

    fn spawn_ticker(&mut self) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!("No async runtime, workout timer runs without tick updates");
            return;
        };

        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let shared = Arc::clone(&self.shared);

        handle.spawn(async move {
            let mut interval = interval_at(Instant::now() + TICK, TICK);
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.recv() => {
                        debug!("Workout timer ticker stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        let secs = shared.clock().elapsed().as_secs();
                        shared.ticks.send_replace(secs);
                    }
                }
            }
        });

        self.shutdown_tx = Some(shutdown_tx);
    }

    /// Stop counting without resetting
    pub fn pause(&mut self) {
        self.shutdown_tx = None;
        let secs = {
            let mut clock = self.shared.clock();
            let Some(since) = clock.running_since.take() else {
                return;
            };
            clock.banked += since.elapsed();
            clock.banked.as_secs()
        };
        self.shared.ticks.send_replace(secs);
    }

    pub fn is_running(&self) -> bool {
        self.shared.clock().running_since.is_some()
    }

    /// Whole seconds counted so far
    pub fn elapsed_secs(&self) -> u64 {
        self.shared.clock().elapsed().as_secs()
    }

    /// Receives the whole-second count on every tick and on pause
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.ticks.subscribe()
    }

    /// Stop for good and return the final count
    pub fn stop(mut self) -> u64 {
        self.pause();
        self.elapsed_secs()
    }
}

//! Injected time and scheduling capabilities.
//!
//! The engine never reads the system clock or spawns timers directly; it
//! depends on the [`TimeSource`] and [`Scheduler`] traits. Production code
//! uses [`SystemTimeSource`] and [`TokioScheduler`]; tests and embedding
//! hosts can substitute [`FixedTimeSource`] and [`ManualScheduler`] to
//! drive the engine deterministically.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;

use crate::common::UnixSeconds;

/// A callback invoked on every tick of a periodic driver.
pub type PeriodicCallback = Box<dyn FnMut() + Send>;

/// Provides the current real-world time in whole UNIX seconds.
pub trait TimeSource: Send + Sync {
    fn now_unix(&self) -> UnixSeconds;
}

/// Schedules named periodic callbacks on behalf of the engine.
///
/// A handle identifies one driver; scheduling an existing handle replaces
/// it. Implementations must not overlap invocations of the same handle's
/// callback.
pub trait Scheduler: Send + Sync {
    /// Starts invoking `callback` every `period` under the given handle.
    fn schedule_periodic(&self, handle: &str, period: Duration, callback: PeriodicCallback);

    /// Stops the driver with the given handle.
    ///
    /// Returns `true` if a driver was found and cancelled.
    fn cancel_periodic(&self, handle: &str) -> bool;
}

/// Reads the real clock through `chrono`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_unix(&self) -> UnixSeconds {
        Utc::now().timestamp()
    }
}

/// A manually set time source for deterministic tests.
#[derive(Debug)]
pub struct FixedTimeSource {
    now: AtomicI64,
}

impl FixedTimeSource {
    /// Creates a time source frozen at `start`.
    pub fn new(start: UnixSeconds) -> Self {
        Self { now: AtomicI64::new(start) }
    }

    /// Jumps to an absolute timestamp.
    pub fn set(&self, timestamp: UnixSeconds) {
        self.now.store(timestamp, Ordering::Relaxed);
    }

    /// Moves the clock forward (or backward) by `seconds`.
    pub fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::Relaxed);
    }
}

impl TimeSource for FixedTimeSource {
    fn now_unix(&self) -> UnixSeconds {
        self.now.load(Ordering::Relaxed)
    }
}

/// Runs periodic drivers as spawned tokio interval tasks.
///
/// Each handle owns one task; the first tick fires one full period after
/// scheduling. Cancelling aborts the task, and dropping the scheduler
/// aborts every remaining task.
#[derive(Debug, Default)]
pub struct TokioScheduler {
    tasks: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_periodic(&self, handle: &str, period: Duration, mut callback: PeriodicCallback) {
        let task = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut ticker = tokio::time::interval_at(start, period);
            loop {
                ticker.tick().await;
                callback();
            }
        });
        let mut tasks = self.tasks.lock().expect("scheduler task table mutex poisoned");
        if let Some(previous) = tasks.insert(handle.to_string(), task) {
            previous.abort();
        }
    }

    fn cancel_periodic(&self, handle: &str) -> bool {
        let mut tasks = self.tasks.lock().expect("scheduler task table mutex poisoned");
        match tasks.remove(handle) {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        if let Ok(mut tasks) = self.tasks.lock() {
            for (_, task) in tasks.drain() {
                task.abort();
            }
        }
    }
}

/// A lifecycle event recorded by [`ManualScheduler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerEvent {
    Scheduled { handle: String, period: Duration },
    Cancelled { handle: String },
}

struct ManualEntry {
    period: Duration,
    callback: Arc<Mutex<PeriodicCallback>>,
}

/// A scheduler that only ticks when told to.
///
/// Registered callbacks sit idle until [`ManualScheduler::fire`] invokes
/// them, and every schedule and effective cancellation is recorded, so
/// tests can assert both driver lifecycles and dispatch behavior without
/// any runtime.
#[derive(Default)]
pub struct ManualScheduler {
    entries: Mutex<HashMap<String, ManualEntry>>,
    events: Mutex<Vec<SchedulerEvent>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invokes the callback registered under `handle` once.
    ///
    /// Returns `false` if no driver with that handle is active.
    pub fn fire(&self, handle: &str) -> bool {
        let callback = {
            let entries = self.entries.lock().expect("manual scheduler entries mutex poisoned");
            entries.get(handle).map(|entry| entry.callback.clone())
        };
        match callback {
            Some(callback) => {
                let mut callback =
                    callback.lock().expect("manual scheduler callback mutex poisoned");
                (*callback)();
                true
            }
            None => false,
        }
    }

    /// True while a driver with the given handle is active.
    pub fn is_scheduled(&self, handle: &str) -> bool {
        self.entries
            .lock()
            .expect("manual scheduler entries mutex poisoned")
            .contains_key(handle)
    }

    /// Returns the period the given handle was scheduled with.
    pub fn period_of(&self, handle: &str) -> Option<Duration> {
        self.entries
            .lock()
            .expect("manual scheduler entries mutex poisoned")
            .get(handle)
            .map(|entry| entry.period)
    }

    /// Returns the active handles in sorted order.
    pub fn active_handles(&self) -> Vec<String> {
        let mut handles: Vec<String> = self
            .entries
            .lock()
            .expect("manual scheduler entries mutex poisoned")
            .keys()
            .cloned()
            .collect();
        handles.sort();
        handles
    }

    /// Returns every schedule/cancel call recorded so far, in order.
    pub fn events(&self) -> Vec<SchedulerEvent> {
        self.events
            .lock()
            .expect("manual scheduler events mutex poisoned")
            .clone()
    }

    fn record(&self, event: SchedulerEvent) {
        self.events
            .lock()
            .expect("manual scheduler events mutex poisoned")
            .push(event);
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_periodic(&self, handle: &str, period: Duration, callback: PeriodicCallback) {
        self.record(SchedulerEvent::Scheduled { handle: handle.to_string(), period });
        let entry = ManualEntry { period, callback: Arc::new(Mutex::new(callback)) };
        self.entries
            .lock()
            .expect("manual scheduler entries mutex poisoned")
            .insert(handle.to_string(), entry);
    }

    fn cancel_periodic(&self, handle: &str) -> bool {
        let removed = self
            .entries
            .lock()
            .expect("manual scheduler entries mutex poisoned")
            .remove(handle)
            .is_some();
        if removed {
            self.record(SchedulerEvent::Cancelled { handle: handle.to_string() });
        }
        removed
    }
}

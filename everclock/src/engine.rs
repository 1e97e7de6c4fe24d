//! The stateful world clock that orchestrates conversion, caching, and
//! subscriber dispatch.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use tracing::{debug, info, trace};

use crate::common::{UnixSeconds, UpdateKind};
use crate::config::ClockConfig;
use crate::constants::{WorldCalendar, CALENDAR};
use crate::convert;
use crate::errors::{ClockError, ClockResult};
use crate::snapshot::{ClockSnapshot, DateSnapshot, MoonSnapshot};
use crate::time::{Scheduler, SystemTimeSource, TimeSource, TokioScheduler};

/// Callback invoked with clock and date together.
pub type CalendarCallback = Box<dyn FnMut(ClockSnapshot, DateSnapshot) + Send + Sync>;
/// Callback invoked with the clock reading only.
pub type ClockCallback = Box<dyn FnMut(ClockSnapshot) + Send + Sync>;
/// Callback invoked with the calendar date only.
pub type DateCallback = Box<dyn FnMut(DateSnapshot) + Send + Sync>;
/// Callback invoked with the moon descriptor only.
pub type MoonCallback = Box<dyn FnMut(MoonSnapshot) + Send + Sync>;

// Explicit timestamp arguments must be 10-digit UNIX values.
const TIMESTAMP_MIN: UnixSeconds = 1_000_000_000;
const TIMESTAMP_MAX: UnixSeconds = 9_999_999_999;

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(0);
static SHARED: OnceLock<WorldClock> = OnceLock::new();

#[derive(Default)]
struct CacheState {
    clock: Option<ClockSnapshot>,
    date: Option<DateSnapshot>,
    moon: Option<MoonSnapshot>,
    last_hour: Option<u8>,
    date_stale: bool,
}

#[derive(Default)]
struct SubscriberRegistry {
    calendar: HashMap<String, CalendarCallback>,
    clock: HashMap<String, ClockCallback>,
    date: HashMap<String, DateCallback>,
    moon: HashMap<String, MoonCallback>,
}

impl SubscriberRegistry {
    /// Population across the three categories sharing the calendar driver.
    fn calendar_population(&self) -> usize {
        self.calendar.len() + self.clock.len() + self.date.len()
    }
}

/// The stateful world clock.
///
/// A `WorldClock` owns the cached snapshots, the day-rollover flag, and the
/// subscriber registry. It is designed to be cloned cheaply: clones share
/// state and behave as handles to the same instance. Construct one with
/// [`WorldClock::new`] or obtain the process-wide instance via
/// [`WorldClock::shared`].
///
/// Registering the first calendar, clock, or date subscriber schedules one
/// shared periodic driver on the injected [`Scheduler`]; removing the last
/// of the three cancels it. Moon subscribers drive an independent handle
/// with a much longer period.
///
/// Subscriber callbacks run while the registry is locked: a callback may
/// query the clock freely but must not register or remove subscribers on
/// the same instance.
#[derive(Clone)]
pub struct WorldClock {
    config: Arc<ClockConfig>,
    time_source: Arc<dyn TimeSource>,
    scheduler: Arc<dyn Scheduler>,
    cache: Arc<Mutex<CacheState>>,
    subscribers: Arc<Mutex<SubscriberRegistry>>,
    instance_id: u64,
}

// Construction and accessors.
impl WorldClock {
    /// Creates a clock with the system time source and the tokio scheduler.
    pub fn new(config: ClockConfig) -> Self {
        Self {
            config: Arc::new(config),
            time_source: Arc::new(SystemTimeSource),
            scheduler: Arc::new(TokioScheduler::new()),
            cache: Arc::new(Mutex::new(CacheState::default())),
            subscribers: Arc::new(Mutex::new(SubscriberRegistry::default())),
            instance_id: NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Replaces the time source. Intended for tests and embedding hosts.
    pub fn with_time_source(mut self, time_source: Arc<dyn TimeSource>) -> Self {
        self.time_source = time_source;
        self
    }

    /// Replaces the scheduler. Intended for tests and embedding hosts.
    pub fn with_scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Returns a handle to the lazily created process-wide instance.
    pub fn shared() -> WorldClock {
        SHARED.get_or_init(|| WorldClock::new(ClockConfig::default())).clone()
    }

    /// The configuration this instance was created with.
    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    /// The calendar table all conversions use.
    pub fn calendar(&self) -> &'static WorldCalendar {
        &CALENDAR
    }

    /// The handle under which the shared clock/date driver is scheduled.
    pub fn calendar_handle(&self) -> String {
        format!("everclock-{}-calendar", self.instance_id)
    }

    /// The handle under which the moon driver is scheduled.
    pub fn moon_handle(&self) -> String {
        format!("everclock-{}-moon", self.instance_id)
    }
}

// Queries.
impl WorldClock {
    /// Computes the current clock reading.
    ///
    /// Always recomputes from the time source. Crossing in-game midnight
    /// since the previous reading marks the cached date stale, which is how
    /// the next [`WorldClock::date`] call knows to recompute.
    pub fn clock(&self) -> ClockSnapshot {
        let now = self.time_source.now_unix();
        let snapshot = convert::clock_at(&CALENDAR, now);
        let mut cache = self.cache.lock().expect("cache mutex poisoned");
        if snapshot.hour == 0 && cache.last_hour.map_or(true, |hour| hour != 0) {
            cache.date_stale = true;
            debug!("Day rollover detected; date cache marked stale.");
        }
        cache.last_hour = Some(snapshot.hour);
        cache.clock = Some(snapshot);
        snapshot
    }

    /// Computes the clock reading at an explicit timestamp.
    ///
    /// Pure with respect to instance state: neither the cache nor the
    /// rollover tracking of the live clock is touched.
    ///
    /// # Errors
    /// `InvalidTimestamp` if `timestamp` is not a 10-digit UNIX value.
    pub fn clock_at(&self, timestamp: UnixSeconds) -> ClockResult<ClockSnapshot> {
        Ok(convert::clock_at(&CALENDAR, validate_timestamp(timestamp)?))
    }

    /// Returns the current calendar date.
    ///
    /// The cached date is reused until a day rollover (or the absence of
    /// any cached value) forces a recomputation.
    pub fn date(&self) -> DateSnapshot {
        let mut cache = self.cache.lock().expect("cache mutex poisoned");
        if let (Some(snapshot), false) = (cache.date, cache.date_stale) {
            return snapshot;
        }
        let now = self.time_source.now_unix();
        let snapshot = convert::date_at(&CALENDAR, now);
        cache.date = Some(snapshot);
        cache.date_stale = false;
        debug!("Date recomputed as {}.", snapshot);
        snapshot
    }

    /// Computes the calendar date at an explicit timestamp.
    ///
    /// Pure with respect to instance state, like [`WorldClock::clock_at`].
    ///
    /// # Errors
    /// `InvalidTimestamp` if `timestamp` is not a 10-digit UNIX value.
    pub fn date_at(&self, timestamp: UnixSeconds) -> ClockResult<DateSnapshot> {
        Ok(convert::date_at(&CALENDAR, validate_timestamp(timestamp)?))
    }

    /// Computes the current moon descriptor. Always recomputes.
    pub fn moon(&self) -> MoonSnapshot {
        let now = self.time_source.now_unix();
        let snapshot = convert::moon_at(&CALENDAR, now);
        let mut cache = self.cache.lock().expect("cache mutex poisoned");
        cache.moon = Some(snapshot);
        snapshot
    }

    /// Computes the moon descriptor at an explicit timestamp.
    ///
    /// # Errors
    /// `InvalidTimestamp` if `timestamp` is not a 10-digit UNIX value.
    pub fn moon_at(&self, timestamp: UnixSeconds) -> ClockResult<MoonSnapshot> {
        Ok(convert::moon_at(&CALENDAR, validate_timestamp(timestamp)?))
    }
}

// Subscription management.
impl WorldClock {
    /// Registers a subscriber receiving clock and date together on every
    /// tick of the shared driver.
    ///
    /// # Arguments
    /// * `key` - Non-empty identity, unique among calendar subscribers.
    /// * `callback` - Invoked with the fresh clock and date snapshots.
    ///
    /// # Errors
    /// `InvalidSubscriberKey` for an empty key, `DuplicateSubscriber` if
    /// the key is already registered in this category.
    pub fn on_calendar(
        &self,
        key: impl Into<String>,
        callback: impl FnMut(ClockSnapshot, DateSnapshot) + Send + Sync + 'static,
    ) -> ClockResult<()> {
        let key = key.into();
        let mut subscribers = self.subscribers.lock().expect("subscriber registry mutex poisoned");
        check_key(&key, UpdateKind::Calendar, subscribers.calendar.contains_key(&key))?;
        let first = subscribers.calendar_population() == 0;
        subscribers.calendar.insert(key.clone(), Box::new(callback));
        debug!("Subscriber '{}' registered for {} updates.", key, UpdateKind::Calendar);
        if first {
            self.start_calendar_driver();
        }
        Ok(())
    }

    /// Registers a subscriber receiving only the clock reading.
    pub fn on_clock(
        &self,
        key: impl Into<String>,
        callback: impl FnMut(ClockSnapshot) + Send + Sync + 'static,
    ) -> ClockResult<()> {
        let key = key.into();
        let mut subscribers = self.subscribers.lock().expect("subscriber registry mutex poisoned");
        check_key(&key, UpdateKind::Clock, subscribers.clock.contains_key(&key))?;
        let first = subscribers.calendar_population() == 0;
        subscribers.clock.insert(key.clone(), Box::new(callback));
        debug!("Subscriber '{}' registered for {} updates.", key, UpdateKind::Clock);
        if first {
            self.start_calendar_driver();
        }
        Ok(())
    }

    /// Registers a subscriber receiving only the calendar date.
    pub fn on_date(
        &self,
        key: impl Into<String>,
        callback: impl FnMut(DateSnapshot) + Send + Sync + 'static,
    ) -> ClockResult<()> {
        let key = key.into();
        let mut subscribers = self.subscribers.lock().expect("subscriber registry mutex poisoned");
        check_key(&key, UpdateKind::Date, subscribers.date.contains_key(&key))?;
        let first = subscribers.calendar_population() == 0;
        subscribers.date.insert(key.clone(), Box::new(callback));
        debug!("Subscriber '{}' registered for {} updates.", key, UpdateKind::Date);
        if first {
            self.start_calendar_driver();
        }
        Ok(())
    }

    /// Registers a subscriber receiving the moon descriptor.
    ///
    /// The new subscriber is immediately invoked once with the current
    /// descriptor, so it holds a value before the first driver tick.
    pub fn on_moon(
        &self,
        key: impl Into<String>,
        callback: impl FnMut(MoonSnapshot) + Send + Sync + 'static,
    ) -> ClockResult<()> {
        let key = key.into();
        let mut subscribers = self.subscribers.lock().expect("subscriber registry mutex poisoned");
        check_key(&key, UpdateKind::Moon, subscribers.moon.contains_key(&key))?;
        let first = subscribers.moon.is_empty();
        let mut callback: MoonCallback = Box::new(callback);
        callback(self.moon());
        subscribers.moon.insert(key.clone(), callback);
        debug!("Subscriber '{}' registered for {} updates.", key, UpdateKind::Moon);
        if first {
            self.start_moon_driver();
        }
        Ok(())
    }

    /// Removes a calendar subscriber.
    ///
    /// # Errors
    /// `SubscriberNotFound` if no such key is registered in this category.
    pub fn remove_calendar(&self, key: &str) -> ClockResult<()> {
        let mut subscribers = self.subscribers.lock().expect("subscriber registry mutex poisoned");
        if subscribers.calendar.remove(key).is_none() {
            return Err(ClockError::SubscriberNotFound {
                key: key.to_string(),
                kind: UpdateKind::Calendar,
            });
        }
        debug!("Subscriber '{}' removed from {} updates.", key, UpdateKind::Calendar);
        if subscribers.calendar_population() == 0 {
            self.stop_calendar_driver();
        }
        Ok(())
    }

    /// Removes a clock subscriber.
    pub fn remove_clock(&self, key: &str) -> ClockResult<()> {
        let mut subscribers = self.subscribers.lock().expect("subscriber registry mutex poisoned");
        if subscribers.clock.remove(key).is_none() {
            return Err(ClockError::SubscriberNotFound {
                key: key.to_string(),
                kind: UpdateKind::Clock,
            });
        }
        debug!("Subscriber '{}' removed from {} updates.", key, UpdateKind::Clock);
        if subscribers.calendar_population() == 0 {
            self.stop_calendar_driver();
        }
        Ok(())
    }

    /// Removes a date subscriber.
    pub fn remove_date(&self, key: &str) -> ClockResult<()> {
        let mut subscribers = self.subscribers.lock().expect("subscriber registry mutex poisoned");
        if subscribers.date.remove(key).is_none() {
            return Err(ClockError::SubscriberNotFound {
                key: key.to_string(),
                kind: UpdateKind::Date,
            });
        }
        debug!("Subscriber '{}' removed from {} updates.", key, UpdateKind::Date);
        if subscribers.calendar_population() == 0 {
            self.stop_calendar_driver();
        }
        Ok(())
    }

    /// Removes a moon subscriber.
    pub fn remove_moon(&self, key: &str) -> ClockResult<()> {
        let mut subscribers = self.subscribers.lock().expect("subscriber registry mutex poisoned");
        if subscribers.moon.remove(key).is_none() {
            return Err(ClockError::SubscriberNotFound {
                key: key.to_string(),
                kind: UpdateKind::Moon,
            });
        }
        debug!("Subscriber '{}' removed from {} updates.", key, UpdateKind::Moon);
        if subscribers.moon.is_empty() {
            self.stop_moon_driver();
        }
        Ok(())
    }
}

// Driver lifecycle and dispatch.
impl WorldClock {
    fn start_calendar_driver(&self) {
        let handle = self.calendar_handle();
        let period = Duration::from_millis(self.config.update_interval_ms);
        let clock = self.clone();
        self.scheduler
            .schedule_periodic(&handle, period, Box::new(move || clock.dispatch_calendar()));
        info!("Calendar driver '{}' scheduled every {}ms.", handle, self.config.update_interval_ms);
    }

    fn stop_calendar_driver(&self) {
        let handle = self.calendar_handle();
        if self.scheduler.cancel_periodic(&handle) {
            info!("Calendar driver '{}' cancelled.", handle);
        }
    }

    fn start_moon_driver(&self) {
        let handle = self.moon_handle();
        let period = Duration::from_millis(self.config.moon_update_interval_ms);
        let clock = self.clone();
        self.scheduler
            .schedule_periodic(&handle, period, Box::new(move || clock.dispatch_moon()));
        info!("Moon driver '{}' scheduled every {}ms.", handle, self.config.moon_update_interval_ms);
    }

    fn stop_moon_driver(&self) {
        let handle = self.moon_handle();
        if self.scheduler.cancel_periodic(&handle) {
            info!("Moon driver '{}' cancelled.", handle);
        }
    }

    fn dispatch_calendar(&self) {
        let clock = self.clock();
        let date = self.date();
        let mut subscribers = self.subscribers.lock().expect("subscriber registry mutex poisoned");
        trace!(
            "Dispatching calendar tick to {} subscriber(s).",
            subscribers.calendar_population()
        );
        for callback in subscribers.calendar.values_mut() {
            callback(clock, date);
        }
        for callback in subscribers.clock.values_mut() {
            callback(clock);
        }
        for callback in subscribers.date.values_mut() {
            callback(date);
        }
    }

    fn dispatch_moon(&self) {
        let moon = self.moon();
        let mut subscribers = self.subscribers.lock().expect("subscriber registry mutex poisoned");
        trace!("Dispatching moon tick to {} subscriber(s).", subscribers.moon.len());
        for callback in subscribers.moon.values_mut() {
            callback(moon);
        }
    }
}

fn check_key(key: &str, kind: UpdateKind, already_present: bool) -> ClockResult<()> {
    if key.is_empty() {
        return Err(ClockError::InvalidSubscriberKey);
    }
    if already_present {
        return Err(ClockError::DuplicateSubscriber { key: key.to_string(), kind });
    }
    Ok(())
}

fn validate_timestamp(timestamp: UnixSeconds) -> ClockResult<UnixSeconds> {
    if (TIMESTAMP_MIN..=TIMESTAMP_MAX).contains(&timestamp) {
        Ok(timestamp)
    } else {
        Err(ClockError::InvalidTimestamp(timestamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{FixedTimeSource, ManualScheduler};

    #[test]
    fn explicit_timestamps_must_have_ten_digits() {
        let clock = WorldClock::new(ClockConfig::default());
        assert_eq!(
            clock.clock_at(999_999_999).unwrap_err(),
            ClockError::InvalidTimestamp(999_999_999)
        );
        assert_eq!(
            clock.date_at(10_000_000_000).unwrap_err(),
            ClockError::InvalidTimestamp(10_000_000_000)
        );
        assert_eq!(clock.moon_at(-5).unwrap_err(), ClockError::InvalidTimestamp(-5));
        assert!(clock.clock_at(1_000_000_000).is_ok());
        assert!(clock.clock_at(9_999_999_999).is_ok());
    }

    #[test]
    fn shared_instance_is_process_wide() {
        let first = WorldClock::shared();
        let second = WorldClock::shared();
        assert!(Arc::ptr_eq(&first.cache, &second.cache));
        assert_eq!(first.calendar_handle(), second.calendar_handle());
    }

    #[test]
    fn instances_get_distinct_driver_handles() {
        let first = WorldClock::new(ClockConfig::default());
        let second = WorldClock::new(ClockConfig::default());
        assert_ne!(first.calendar_handle(), second.calendar_handle());
        assert_ne!(first.moon_handle(), second.moon_handle());
        assert!(first.calendar_handle().starts_with("everclock-"));
        assert!(first.moon_handle().ends_with("-moon"));
    }

    #[test]
    fn injected_time_source_drives_the_readings() {
        let time = Arc::new(FixedTimeSource::new(CALENDAR.clock_epoch + 3_000));
        let clock = WorldClock::new(ClockConfig::default())
            .with_time_source(time.clone())
            .with_scheduler(Arc::new(ManualScheduler::new()));
        let reading = clock.clock();
        assert_eq!((reading.hour, reading.minute), (2, 30));
        time.advance(CALENDAR.hour_seconds);
        assert_eq!(clock.clock().hour, 3);
    }
}

//! Defines the configuration structure for clock instances.
//!
//! Designed to be deserialized from a configuration file (e.g. a TOML file)
//! using `serde`, so update cadence can be tuned without touching code.

use serde::Deserialize;

/// Per-instance settings for a [`crate::engine::WorldClock`].
#[derive(Debug, Clone, Deserialize)]
pub struct ClockConfig {
    /// Milliseconds between updates delivered to calendar, clock, and date
    /// subscribers.
    #[serde(default = "default_update_interval_ms")]
    pub update_interval_ms: u64,

    /// Milliseconds between updates delivered to moon subscribers. The moon
    /// moves slowly, so this interval is much longer than the main one.
    #[serde(default = "default_moon_update_interval_ms")]
    pub moon_update_interval_ms: u64,
}

// --- Default value functions for serde ---

fn default_update_interval_ms() -> u64 {
    200
}

fn default_moon_update_interval_ms() -> u64 {
    36_000_000
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: default_update_interval_ms(),
            moon_update_interval_ms: default_moon_update_interval_ms(),
        }
    }
}

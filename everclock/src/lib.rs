//! # Everclock
//!
//! An event-driven in-game calendar engine for Rust.
//!
//! Everclock maps real-world UNIX time onto the clock, calendar, and moon
//! of a fantasy game world, and notifies subscribers as those values
//! change. It is designed to be a library that a game host embeds to keep
//! HUDs, schedulers, and chat commands in sync with world time.
//!
//! ## Core Concepts
//!
//! - **WorldCalendar**: an immutable `const` table of epochs, spans, and
//!   the moon-phase boundaries. Every conversion in the process reads the
//!   same calendar.
//! - **Pure Converters**: `clock_at`, `date_at`, and `moon_at` turn any
//!   UNIX timestamp into a snapshot, with no instance state involved.
//! - **WorldClock**: a cloneable handle owning the cached snapshots, the
//!   day-rollover flag, and the subscriber registry. It decides when the
//!   converters run and who hears about it.
//! - **Injected Capabilities**: the engine reads time through a
//!   [`time::TimeSource`] and drives subscribers through a
//!   [`time::Scheduler`], so tests (and unusual hosts) can substitute
//!   deterministic implementations.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use everclock::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // 1. Create a clock with the default update cadence.
//!     let clock = WorldClock::new(ClockConfig::default());
//!
//!     // 2. Ask for the current world time directly...
//!     println!("It is {} on {}", clock.clock(), clock.date());
//!
//!     // 3. ...or subscribe and let the driver push updates.
//!     clock.on_calendar("hud", |time, date| {
//!         println!("{} {}", time, date);
//!     })?;
//!
//!     // 4. The driver ticks until the last subscriber leaves.
//!     tokio::signal::ctrl_c().await?;
//!     clock.remove_calendar("hud")?;
//!     Ok(())
//! }
//! ```

pub const ENGINE_NAME: &str = "Everclock Engine";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Declare all the modules in the crate.
pub mod command;
pub mod common;
pub mod config;
pub mod constants;
pub mod convert;
pub mod engine;
pub mod errors;
pub mod snapshot;
pub mod time;

/// A prelude module for easy importing of the most common Everclock types.
pub mod prelude {
    pub use crate::command::Command;
    pub use crate::common::{UnixSeconds, UpdateKind};
    pub use crate::config::ClockConfig;
    pub use crate::constants::{WorldCalendar, CALENDAR};
    pub use crate::engine::WorldClock;
    pub use crate::errors::{ClockError, ClockResult};
    pub use crate::snapshot::{
        ClockSnapshot, DateSnapshot, DaySegment, MoonPhase, MoonSnapshot,
    };
}

//! The immutable numeric calendar of the game world.
//!
//! Every converter formula depends on the exact values in this table and on
//! their mutual consistency. The table is exposed as a single `const` value:
//! it cannot be assigned through, so every clock instance in the process
//! observes the same calendar.

use crate::snapshot::MoonPhase;

/// Month names in calendar order. Month numbers are 1-based.
pub const MONTH_NAMES: [&str; 12] = [
    "Frosthold",
    "Embermarch",
    "Thawrise",
    "Seedtide",
    "Blossomreach",
    "Highsun",
    "Goldenfall",
    "Harvestgleam",
    "Duskwither",
    "Palemoor",
    "Deepfrost",
    "Starvigil",
];

/// Weekday names. Index matches `DateSnapshot::weekday` (0-based).
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Soulrest",
    "Forgeday",
    "Seaday",
    "Windday",
    "Thornday",
    "Hearthday",
    "Marketday",
];

/// The numeric parameters of the in-game calendar.
///
/// Clock and calendar were calibrated independently, which is why
/// `clock_epoch` and `date_epoch` differ; they are congruent modulo
/// `day_seconds` so that clock midnight and date boundaries agree.
#[derive(Debug, Clone, Copy)]
pub struct WorldCalendar {
    /// Real seconds per in-game day (three game days per real day).
    pub day_seconds: i64,
    /// Real seconds of the 22:00-05:00 night span.
    pub night_seconds: i64,
    /// Real seconds per in-game hour.
    pub hour_seconds: i64,
    /// Real instant of in-game midnight on clock day zero.
    pub clock_epoch: i64,
    /// Real instant of the first day of the calendar.
    pub date_epoch: i64,
    /// Era at `date_epoch`. Eras do not advance within the engine's horizon.
    pub start_era: i32,
    /// Year at `date_epoch`.
    pub start_year: i64,
    /// 0-based weekday index of `date_epoch`.
    pub start_weekday: i64,
    /// Days per month, in calendar order.
    pub month_lengths: [i64; 12],
    /// Days per year, the sum of `month_lengths`.
    pub year_days: i64,
    /// Real instant of a reference new moon.
    pub moon_epoch: i64,
    /// Real seconds of a full synodic cycle.
    pub moon_cycle_seconds: i64,
    /// The synodic cycle expressed in in-game days.
    pub moon_cycle_days: f64,
    /// Real seconds of one of the eight named phases.
    pub phase_seconds: f64,
    /// One named phase expressed in in-game days.
    pub phase_days: f64,
    /// Named phases with their cumulative end fractions of the cycle.
    ///
    /// Each phase straddles its canonical instant, so the ends fall on odd
    /// sixteenths and the last entry stays below 1.0.
    pub phase_bounds: [(MoonPhase, f64); 8],
}

/// The calendar of the game world.
pub const CALENDAR: WorldCalendar = WorldCalendar {
    day_seconds: 28_800,
    night_seconds: 8_400,
    hour_seconds: 1_200,
    clock_epoch: 1_448_236_800,
    date_epoch: 1_577_836_800,
    start_era: 2,
    start_year: 582,
    start_weekday: 3,
    month_lengths: [31, 30, 29, 31, 30, 29, 31, 30, 29, 31, 30, 29],
    year_days: 360,
    moon_epoch: 1_579_426_800,
    moon_cycle_seconds: 849_600,
    moon_cycle_days: 29.5,
    phase_seconds: 106_200.0,
    phase_days: 3.6875,
    phase_bounds: [
        (MoonPhase::New, 0.0625),
        (MoonPhase::WaxingCrescent, 0.1875),
        (MoonPhase::FirstQuarter, 0.3125),
        (MoonPhase::WaxingGibbous, 0.4375),
        (MoonPhase::Full, 0.5625),
        (MoonPhase::WaningGibbous, 0.6875),
        (MoonPhase::ThirdQuarter, 0.8125),
        (MoonPhase::WaningCrescent, 0.9375),
    ],
};

impl WorldCalendar {
    /// Returns the name of a 1-based month number, clamped into range.
    pub fn month_name(&self, month: u8) -> &'static str {
        let index = usize::from(month.saturating_sub(1)).min(MONTH_NAMES.len() - 1);
        MONTH_NAMES[index]
    }

    /// Returns the name of a 0-based weekday index, clamped into range.
    pub fn weekday_name(&self, weekday: u8) -> &'static str {
        let index = usize::from(weekday).min(WEEKDAY_NAMES.len() - 1);
        WEEKDAY_NAMES[index]
    }

    /// Returns the cumulative end fraction of the given phase.
    pub fn phase_end(&self, phase: MoonPhase) -> f64 {
        self.phase_bounds
            .iter()
            .find(|(candidate, _)| *candidate == phase)
            .map(|(_, end)| *end)
            .unwrap_or(1.0)
    }
}

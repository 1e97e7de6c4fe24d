//! Defines the computed snapshot types returned by the converters.
//!
//! Snapshots are small `Copy` values: the engine caches the last computed
//! ones and hands copies to subscribers, so nothing here is ever shared
//! mutably. Serialized field names use camelCase for host consumption.

use std::fmt;

use serde::Serialize;

use crate::constants::CALENDAR;

/// An in-game wall-clock reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockSnapshot {
    /// Hour of the in-game day, `0..24`.
    pub hour: u8,
    /// Minute of the hour, `0..60`.
    pub minute: u8,
    /// Second of the minute, `0..60`.
    pub second: u8,
}

impl ClockSnapshot {
    /// Returns the named span of the day this reading falls in.
    pub fn segment(&self) -> DaySegment {
        DaySegment::from_hour(self.hour)
    }

    /// True during the 22:00-05:00 night span.
    pub fn is_night(&self) -> bool {
        matches!(self.segment(), DaySegment::Night)
    }
}

impl fmt::Display for ClockSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

/// A named span of the in-game day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DaySegment {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DaySegment {
    /// Maps an hour of the day onto its segment.
    pub fn from_hour(hour: u8) -> Self {
        match hour {
            5..=11 => DaySegment::Morning,
            12..=17 => DaySegment::Afternoon,
            18..=21 => DaySegment::Evening,
            _ => DaySegment::Night,
        }
    }

    /// Returns the display name of this segment.
    pub fn display_name(&self) -> &'static str {
        match self {
            DaySegment::Morning => "Morning",
            DaySegment::Afternoon => "Afternoon",
            DaySegment::Evening => "Evening",
            DaySegment::Night => "Night",
        }
    }
}

impl fmt::Display for DaySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// An in-game calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateSnapshot {
    /// Era of the date. Constant over the engine's horizon.
    pub era: i32,
    /// Year within the era. Grows without bound.
    pub year: i64,
    /// Month of the year, 1-based.
    pub month: u8,
    /// Day of the month, 1-based.
    pub day: u8,
    /// Weekday index, `0..7`.
    pub weekday: u8,
}

impl fmt::Display for DateSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} {}, Year {} (Era {})",
            CALENDAR.weekday_name(self.weekday),
            self.day,
            CALENDAR.month_name(self.month),
            self.year,
            self.era
        )
    }
}

/// One of the eight named moon phases, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MoonPhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    ThirdQuarter,
    WaningCrescent,
}

impl MoonPhase {
    /// Returns the wire token for this phase, matching its serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            MoonPhase::New => "new",
            MoonPhase::WaxingCrescent => "waxingCrescent",
            MoonPhase::FirstQuarter => "firstQuarter",
            MoonPhase::WaxingGibbous => "waxingGibbous",
            MoonPhase::Full => "full",
            MoonPhase::WaningGibbous => "waningGibbous",
            MoonPhase::ThirdQuarter => "thirdQuarter",
            MoonPhase::WaningCrescent => "waningCrescent",
        }
    }

    /// Returns the human-readable label for this phase.
    pub fn label(&self) -> &'static str {
        match self {
            MoonPhase::New => "New Moon",
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::Full => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::ThirdQuarter => "Third Quarter",
            MoonPhase::WaningCrescent => "Waning Crescent",
        }
    }
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A full description of the moon at one instant.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoonSnapshot {
    /// Position within the synodic cycle, `[0, 1)`. 0 is a new moon.
    pub phase_fraction: f64,
    /// The named phase containing `phase_fraction`.
    pub phase: MoonPhase,
    /// True while the lit fraction is still growing.
    pub is_waxing: bool,
    /// Cycle fraction elapsed inside the current phase, `[0, 1/8)`.
    pub fraction_within_phase: f64,
    /// Real seconds until the next phase begins.
    pub seconds_to_next_phase: f64,
    /// In-game days until the next phase begins.
    pub days_to_next_phase: f64,
    /// Real seconds until the full phase ends, wrapping forward past it.
    pub seconds_to_full_moon: f64,
    /// In-game days until the full phase ends.
    pub days_to_full_moon: f64,
    /// Lit fraction of the disc, `[0, 1]`. Peaks at mid-cycle.
    pub illuminated_fraction: f64,
}

impl MoonSnapshot {
    /// Returns the illuminated percentage, truncated to a whole number.
    pub fn illuminated_percent(&self) -> u32 {
        (self.illuminated_fraction * 100.0).floor() as u32
    }
}

impl fmt::Display for MoonSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let trend = if self.is_waxing { "waxing" } else { "waning" };
        write!(
            f,
            "{}, {}% illuminated ({})",
            self.phase.label(),
            self.illuminated_percent(),
            trend
        )
    }
}

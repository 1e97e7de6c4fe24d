//! The pure timestamp converters at the heart of the engine.
//!
//! Each function maps a real-world UNIX timestamp onto one in-game snapshot
//! and is total over `i64`: timestamps before an epoch are valid and
//! represent pre-epoch history. Euclidean division keeps day and cycle
//! positions non-negative on that side. Nothing here touches instance
//! state; caching and rollover tracking live in [`crate::engine`].

use crate::common::UnixSeconds;
use crate::constants::WorldCalendar;
use crate::snapshot::{ClockSnapshot, DateSnapshot, MoonPhase, MoonSnapshot};

/// Computes the in-game wall-clock reading at `timestamp`.
pub fn clock_at(cal: &WorldCalendar, timestamp: UnixSeconds) -> ClockSnapshot {
    let into_day = timestamp.wrapping_sub(cal.clock_epoch).rem_euclid(cal.day_seconds);
    let fractional_hours = 24.0 * into_day as f64 / cal.day_seconds as f64;
    let hour = fractional_hours.floor();
    let fractional_minutes = (fractional_hours - hour) * 60.0;
    let minute = fractional_minutes.floor();
    let second = ((fractional_minutes - minute) * 60.0).floor();
    ClockSnapshot {
        hour: hour as u8,
        minute: minute as u8,
        second: second as u8,
    }
}

/// Computes the in-game calendar date at `timestamp`.
pub fn date_at(cal: &WorldCalendar, timestamp: UnixSeconds) -> DateSnapshot {
    let elapsed = timestamp.wrapping_sub(cal.date_epoch);
    let days_past = elapsed.div_euclid(cal.day_seconds);
    let weekday = (days_past + cal.start_weekday).rem_euclid(7) as u8;

    let years_past = days_past.div_euclid(cal.year_days);
    let mut days = days_past - years_past * cal.year_days;
    let year = cal.start_year + years_past;

    let mut month: u8 = 1;
    for length in cal.month_lengths.iter() {
        // A remainder equal to the month's length belongs to the next month.
        if days < *length {
            break;
        }
        days -= *length;
        month += 1;
    }

    DateSnapshot {
        era: cal.start_era,
        year,
        month,
        day: (days + 1) as u8,
        weekday,
    }
}

/// Computes the moon descriptor at `timestamp`.
pub fn moon_at(cal: &WorldCalendar, timestamp: UnixSeconds) -> MoonSnapshot {
    let into_cycle = timestamp.wrapping_sub(cal.moon_epoch).rem_euclid(cal.moon_cycle_seconds);
    let cycle_seconds = cal.moon_cycle_seconds as f64;
    let phase_fraction = into_cycle as f64 / cycle_seconds;

    let phase = phase_of(cal, phase_fraction);
    let is_waxing = phase_fraction <= cal.phase_end(MoonPhase::WaxingGibbous);

    let phase_span = 1.0 / 8.0;
    let fraction_within_phase = phase_fraction % phase_span;
    let seconds_to_next_phase = (phase_span - fraction_within_phase) * cycle_seconds;
    let days_to_next_phase = seconds_to_next_phase / cal.day_seconds as f64;

    let full_end = cal.phase_end(MoonPhase::Full);
    let mut seconds_to_full_moon = (full_end - phase_fraction) * cycle_seconds;
    if phase_fraction > full_end {
        seconds_to_full_moon += cycle_seconds;
    }
    let days_to_full_moon = seconds_to_full_moon / cal.day_seconds as f64;

    let illuminated_fraction = if phase_fraction <= 0.5 {
        2.0 * phase_fraction
    } else {
        1.0 - 2.0 * (phase_fraction - 0.5)
    };

    MoonSnapshot {
        phase_fraction,
        phase,
        is_waxing,
        fraction_within_phase,
        seconds_to_next_phase,
        days_to_next_phase,
        seconds_to_full_moon,
        days_to_full_moon,
        illuminated_fraction,
    }
}

/// Picks the first phase whose end fraction exceeds `phase_fraction`.
fn phase_of(cal: &WorldCalendar, phase_fraction: f64) -> MoonPhase {
    for (phase, end) in cal.phase_bounds.iter() {
        if phase_fraction < *end {
            return *phase;
        }
    }
    // Floating point can land in the sliver above the last bound.
    MoonPhase::WaningCrescent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::CALENDAR;

    const DAY: i64 = CALENDAR.day_seconds;

    #[test]
    fn clock_components_stay_in_range() {
        let samples = [
            CALENDAR.clock_epoch,
            CALENDAR.clock_epoch - 1,
            CALENDAR.clock_epoch + 12_345,
            0,
            -86_400,
            1_579_645_663,
            9_999_999_999,
        ];
        for ts in samples {
            let snapshot = clock_at(&CALENDAR, ts);
            assert!(snapshot.hour < 24, "hour out of range at {}", ts);
            assert!(snapshot.minute < 60, "minute out of range at {}", ts);
            assert!(snapshot.second < 60, "second out of range at {}", ts);
        }
    }

    #[test]
    fn clock_repeats_every_game_day() {
        let base = CALENDAR.clock_epoch + 5_000;
        for k in [-3_i64, -1, 1, 2, 400] {
            assert_eq!(clock_at(&CALENDAR, base), clock_at(&CALENDAR, base + k * DAY));
        }
    }

    #[test]
    fn clock_reads_midnight_on_exact_day_multiples() {
        let ts = CALENDAR.clock_epoch + 100 * DAY;
        let expected = ClockSnapshot { hour: 0, minute: 0, second: 0 };
        assert_eq!(clock_at(&CALENDAR, ts), expected);
    }

    #[test]
    fn clock_subdivides_the_day() {
        // 3000 real seconds is 2.5 game hours.
        let snapshot = clock_at(&CALENDAR, CALENDAR.clock_epoch + 3_000);
        assert_eq!(snapshot, ClockSnapshot { hour: 2, minute: 30, second: 0 });
        // 900 real seconds is 45 game minutes.
        let snapshot = clock_at(&CALENDAR, CALENDAR.clock_epoch + 900);
        assert_eq!(snapshot, ClockSnapshot { hour: 0, minute: 45, second: 0 });
    }

    #[test]
    fn clock_wraps_positive_before_the_epoch() {
        // Half a game hour before midnight of day zero.
        let snapshot = clock_at(&CALENDAR, CALENDAR.clock_epoch - 600);
        assert_eq!(snapshot, ClockSnapshot { hour: 23, minute: 30, second: 0 });
    }

    #[test]
    fn date_matches_the_reference_day() {
        let ts = CALENDAR.date_epoch + 93 * DAY;
        let expected = DateSnapshot { era: 2, year: 582, month: 4, day: 4, weekday: 5 };
        assert_eq!(date_at(&CALENDAR, ts), expected);
    }

    #[test]
    fn date_starts_at_the_epoch() {
        let expected = DateSnapshot { era: 2, year: 582, month: 1, day: 1, weekday: 3 };
        assert_eq!(date_at(&CALENDAR, CALENDAR.date_epoch), expected);
    }

    #[test]
    fn full_months_roll_into_the_next() {
        // Exactly 31 elapsed days lands on the first day of month two.
        let snapshot = date_at(&CALENDAR, CALENDAR.date_epoch + 31 * DAY);
        assert_eq!((snapshot.month, snapshot.day), (2, 1));
    }

    #[test]
    fn dates_before_the_epoch_count_backwards() {
        let snapshot = date_at(&CALENDAR, CALENDAR.date_epoch - 1);
        let expected = DateSnapshot { era: 2, year: 581, month: 12, day: 29, weekday: 2 };
        assert_eq!(snapshot, expected);
    }

    #[test]
    fn years_advance_after_a_full_walk() {
        let ts = CALENDAR.date_epoch + (CALENDAR.year_days + 59) * DAY;
        let expected = DateSnapshot { era: 2, year: 583, month: 2, day: 29, weekday: 2 };
        assert_eq!(date_at(&CALENDAR, ts), expected);
    }

    #[test]
    fn moon_matches_the_reference_fixture() {
        let snapshot = moon_at(&CALENDAR, 1_579_645_663);
        assert_eq!(snapshot.phase, MoonPhase::FirstQuarter);
        assert_eq!((snapshot.illuminated_fraction * 100.0).floor() as u32, 51);
        assert!(snapshot.is_waxing);
    }

    #[test]
    fn moon_cycle_starts_new_and_peaks_full() {
        let new = moon_at(&CALENDAR, CALENDAR.moon_epoch);
        assert_eq!(new.phase, MoonPhase::New);
        assert_eq!(new.phase_fraction, 0.0);
        assert_eq!(new.illuminated_fraction, 0.0);
        assert!(new.is_waxing);

        let half = CALENDAR.moon_epoch + CALENDAR.moon_cycle_seconds / 2;
        let full = moon_at(&CALENDAR, half);
        assert_eq!(full.phase, MoonPhase::Full);
        assert_eq!(full.illuminated_fraction, 1.0);
        assert!(!full.is_waxing);
    }

    #[test]
    fn phases_follow_the_cycle_order() {
        let expected = [
            MoonPhase::New,
            MoonPhase::WaxingCrescent,
            MoonPhase::FirstQuarter,
            MoonPhase::WaxingGibbous,
            MoonPhase::Full,
            MoonPhase::WaningGibbous,
            MoonPhase::ThirdQuarter,
            MoonPhase::WaningCrescent,
        ];
        for (k, phase) in expected.iter().enumerate() {
            let ts = CALENDAR.moon_epoch + k as i64 * CALENDAR.moon_cycle_seconds / 8;
            assert_eq!(moon_at(&CALENDAR, ts).phase, *phase, "at phase index {}", k);
        }
    }

    #[test]
    fn the_top_sliver_clamps_to_waning_crescent() {
        let snapshot = moon_at(&CALENDAR, CALENDAR.moon_epoch - 1);
        assert_eq!(snapshot.phase, MoonPhase::WaningCrescent);
        assert!(!snapshot.is_waxing);
        assert!(snapshot.phase_fraction > 0.9375);
    }

    #[test]
    fn countdowns_at_a_quarter_cycle() {
        let ts = CALENDAR.moon_epoch + CALENDAR.moon_cycle_seconds / 4;
        let snapshot = moon_at(&CALENDAR, ts);
        assert_eq!(snapshot.fraction_within_phase, 0.0);
        assert_eq!(snapshot.seconds_to_next_phase, CALENDAR.phase_seconds);
        assert_eq!(snapshot.days_to_next_phase, CALENDAR.phase_days);
        assert_eq!(snapshot.seconds_to_full_moon, 265_500.0);
        assert_eq!(snapshot.days_to_full_moon, 9.21875);
    }

    #[test]
    fn past_full_the_countdown_wraps_forward() {
        let ts = CALENDAR.moon_epoch + 3 * CALENDAR.moon_cycle_seconds / 4;
        let snapshot = moon_at(&CALENDAR, ts);
        assert_eq!(snapshot.seconds_to_full_moon, 690_300.0);
        assert!(snapshot.seconds_to_full_moon < CALENDAR.moon_cycle_seconds as f64);
    }

    #[test]
    fn illumination_changes_slowly_between_samples() {
        let mut previous = moon_at(&CALENDAR, CALENDAR.moon_epoch).illuminated_fraction;
        let mut ts = CALENDAR.moon_epoch + 3_000;
        let end = CALENDAR.moon_epoch + CALENDAR.moon_cycle_seconds + 3_000;
        while ts <= end {
            let current = moon_at(&CALENDAR, ts).illuminated_fraction;
            assert!((current - previous).abs() < 0.05, "jump at {}", ts);
            previous = current;
            ts += 3_000;
        }
    }

    #[test]
    fn converters_accept_pre_epoch_history() {
        let clock = clock_at(&CALENDAR, -1);
        assert!(clock.hour < 24);

        let date = date_at(&CALENDAR, 0);
        assert!(date.year < CALENDAR.start_year);
        assert!((1..=12).contains(&date.month));
        assert!(date.weekday < 7);

        let moon = moon_at(&CALENDAR, -1_000);
        assert!((0.0..1.0).contains(&moon.phase_fraction));
    }
}

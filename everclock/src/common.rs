//! Contains common, primitive types shared across the Everclock engine.

use std::fmt;

/// Whole seconds since the real-world UNIX epoch.
///
/// Signed so that instants before an in-game epoch remain representable;
/// the converters are defined over the full range.
pub type UnixSeconds = i64;

/// The four subscription categories an update can target.
///
/// `Calendar` delivers clock and date together; the other three deliver a
/// single snapshot kind. Calendar, clock, and date subscribers share one
/// periodic driver, while moon subscribers have their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateKind {
    Calendar,
    Clock,
    Date,
    Moon,
}

impl UpdateKind {
    /// Returns the lowercase name used in logs, errors, and driver handles.
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateKind::Calendar => "calendar",
            UpdateKind::Clock => "clock",
            UpdateKind::Date => "date",
            UpdateKind::Moon => "moon",
        }
    }
}

impl fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

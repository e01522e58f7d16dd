//! Transition points and weekly instants.

use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Timelike};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The freshness a cache entry must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FreshnessState {
    /// Serving stale data is acceptable
    #[cfg_attr(feature = "serde", serde(rename = "stale"))]
    StaleAllowed,
    /// Data must be up to date
    #[cfg_attr(feature = "serde", serde(rename = "up-to-date"))]
    MustBeFresh,
}

/// A moment in the week at minute resolution.
///
/// Ordering is lexicographic on (day of week, hour, minute), with Monday = 1
/// and Sunday = 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeeklyInstant {
    day_of_week: u8,
    hour: u8,
    minute: u8,
}

impl WeeklyInstant {
    /// Create a weekly instant from its parts
    pub fn new(day_of_week: u8, hour: u8, minute: u8) -> Self {
        Self {
            day_of_week,
            hour,
            minute,
        }
    }

    /// Project a full timestamp onto the week. Seconds and below are dropped.
    pub fn of<T: Datelike + Timelike>(moment: &T) -> Self {
        Self {
            day_of_week: moment.weekday().number_from_monday() as u8,
            hour: moment.hour() as u8,
            minute: moment.minute() as u8,
        }
    }

    /// ISO day of the week, Monday = 1
    pub fn day_of_week(&self) -> u8 {
        self.day_of_week
    }

    /// Hour of the day
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Minute of the hour
    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl<Tz: TimeZone> From<&DateTime<Tz>> for WeeklyInstant {
    fn from(moment: &DateTime<Tz>) -> Self {
        Self::of(moment)
    }
}

impl From<&NaiveDateTime> for WeeklyInstant {
    fn from(moment: &NaiveDateTime) -> Self {
        Self::of(moment)
    }
}

impl fmt::Display for WeeklyInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "day {} {:02}:{:02}",
            self.day_of_week, self.hour, self.minute
        )
    }
}

/// A weekly recurring instant at which the desired freshness changes.
///
/// Values are taken as given; a point with an hour of 25 still sorts, but
/// can never be placed on a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TransitionPoint {
    day_of_week: u8,
    hour: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    minute: u8,
    state: FreshnessState,
}

impl TransitionPoint {
    /// Create a new transition point
    pub fn new(day_of_week: u8, hour: u8, minute: u8, state: FreshnessState) -> Self {
        Self {
            day_of_week,
            hour,
            minute,
            state,
        }
    }

    /// ISO day of the week, Monday = 1
    pub fn day_of_week(&self) -> u8 {
        self.day_of_week
    }

    /// Hour of the day
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Minute of the hour
    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// The state that becomes active at this point
    pub fn state(&self) -> FreshnessState {
        self.state
    }

    /// Position of this point within the week
    pub fn at(&self) -> WeeklyInstant {
        WeeklyInstant::new(self.day_of_week, self.hour, self.minute)
    }

    /// Whether this point lies before `instant` in the week, or on the same minute.
    pub fn precedes_or_matches(&self, instant: impl Into<WeeklyInstant>) -> bool {
        self.at() <= instant.into()
    }
}

//! Weekly freshness schedule.
//!
//! A [`WeeklySchedule`] is a set of [`TransitionPoint`]s that repeat every
//! week. The points are kept in ascending weekly order at all times, so the
//! lookups are a binary search plus a circular walk.

use crate::transition::{FreshnessState, TransitionPoint, WeeklyInstant};
use crate::{Result, SchedulerError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A recurring weekly schedule of stale-allowed and must-be-fresh windows.
///
/// Points sharing the same day, hour and minute keep their insertion order;
/// the one added last decides the state at that minute.
///
/// # Examples
///
/// ```rust
/// use cache_scheduler::{days, FreshnessState, WeeklySchedule};
/// use chrono::{TimeZone, Utc};
///
/// let schedule = WeeklySchedule::new()
///     .add_fresh_from(days::MON, 8, 0)
///     .add_stale_from(days::MON, 17, 30);
///
/// // 2019-02-18 is a Monday
/// let morning = Utc.with_ymd_and_hms(2019, 2, 18, 9, 0, 0).unwrap();
/// assert_eq!(schedule.desired_state(&morning), Ok(FreshnessState::MustBeFresh));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "Vec<TransitionPoint>", into = "Vec<TransitionPoint>")
)]
pub struct WeeklySchedule {
    points: Vec<TransitionPoint>,
}

impl WeeklySchedule {
    /// Create an empty schedule
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow stale data from the given weekly moment onwards
    pub fn add_stale_from(self, day_of_week: u8, hour: u8, minute: u8) -> Self {
        self.add_point(TransitionPoint::new(
            day_of_week,
            hour,
            minute,
            FreshnessState::StaleAllowed,
        ))
    }

    /// Require up-to-date data from the given weekly moment onwards
    pub fn add_fresh_from(self, day_of_week: u8, hour: u8, minute: u8) -> Self {
        self.add_point(TransitionPoint::new(
            day_of_week,
            hour,
            minute,
            FreshnessState::MustBeFresh,
        ))
    }

    /// Add an already constructed transition point
    pub fn add_point(mut self, point: TransitionPoint) -> Self {
        self.insert(point);
        self
    }

    fn insert(&mut self, point: TransitionPoint) {
        let at = point.at();
        let index = self.points.partition_point(|p| p.at() <= at);
        self.points.insert(index, point);
    }

    /// Check if the schedule has no transition points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of transition points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Transition points in ascending weekly order
    pub fn points(&self) -> impl Iterator<Item = &TransitionPoint> {
        self.points.iter()
    }

    /// Number of leading points that precede or match `instant`.
    fn passed(&self, instant: WeeklyInstant) -> usize {
        self.points.partition_point(|p| p.precedes_or_matches(instant))
    }

    /// The freshness state in effect at `instant`.
    ///
    /// This is the state of the last point at or before `instant`. Before the
    /// first point of the week the state set by the week's last point still
    /// holds.
    pub fn desired_state(&self, instant: impl Into<WeeklyInstant>) -> Result<FreshnessState> {
        let instant = instant.into();
        let passed = self.passed(instant);

        let current = match passed {
            0 => self.points.last(),
            n => self.points.get(n - 1),
        };

        current
            .map(TransitionPoint::state)
            .ok_or(SchedulerError::EmptySchedule)
    }

    /// The next point switching to [`FreshnessState::MustBeFresh`] strictly after `instant`.
    ///
    /// When no such point remains this week, the first must-be-fresh point of
    /// the week is returned, standing for its occurrence next week.
    pub fn next_fresh_transition(
        &self,
        instant: impl Into<WeeklyInstant>,
    ) -> Result<&TransitionPoint> {
        if self.is_empty() {
            return Err(SchedulerError::EmptySchedule);
        }

        let (passed, upcoming) = self.points.split_at(self.passed(instant.into()));

        upcoming
            .iter()
            .chain(passed)
            .find(|p| p.state() == FreshnessState::MustBeFresh)
            .ok_or(SchedulerError::NoFreshTransition)
    }
}

impl FromIterator<TransitionPoint> for WeeklySchedule {
    fn from_iter<I: IntoIterator<Item = TransitionPoint>>(iter: I) -> Self {
        let mut schedule = Self::new();
        for point in iter {
            schedule.insert(point);
        }
        schedule
    }
}

impl From<Vec<TransitionPoint>> for WeeklySchedule {
    fn from(points: Vec<TransitionPoint>) -> Self {
        points.into_iter().collect()
    }
}

impl From<WeeklySchedule> for Vec<TransitionPoint> {
    fn from(schedule: WeeklySchedule) -> Self {
        schedule.points
    }
}

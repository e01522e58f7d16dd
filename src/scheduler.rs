//! TTL calculation from a weekly schedule.

use crate::transition::{FreshnessState, TransitionPoint, WeeklyInstant};
use crate::{Clock, Jitter, NoJitter, Result, SchedulerBuilder, SchedulerError, WeeklySchedule};
use chrono::{DateTime, Days, TimeZone};

/// How a TTL was arrived at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TtlOutcome {
    /// Data must be fresh right now, so the default TTL applies
    UpToDate {
        /// The default TTL
        ttl: i64,
    },
    /// Stale data is allowed until the next must-be-fresh transition
    UntilNextFresh {
        /// Seconds until the transition plus the deviation
        ttl: i64,
        /// Seconds from now until the transition
        seconds_to_transition: i64,
        /// Deviation added by the jitter source
        deviation: i64,
        /// The transition the entry expires at
        transition: TransitionPoint,
    },
    /// Resolving the schedule failed at runtime and the default TTL was used
    Fallback {
        /// The default TTL
        ttl: i64,
        /// What went wrong
        cause: SchedulerError,
    },
}

impl TtlOutcome {
    /// The TTL in seconds
    pub fn ttl(&self) -> i64 {
        match self {
            TtlOutcome::UpToDate { ttl }
            | TtlOutcome::UntilNextFresh { ttl, .. }
            | TtlOutcome::Fallback { ttl, .. } => *ttl,
        }
    }

    /// Whether the default TTL was used because of a runtime failure
    pub fn is_fallback(&self) -> bool {
        matches!(self, TtlOutcome::Fallback { .. })
    }
}

/// Computes cache TTLs that expire exactly when data must be fresh again.
///
/// While the schedule allows stale data, the TTL runs until the next
/// must-be-fresh transition. While data must be fresh, the default TTL is
/// used unchanged.
///
/// # Examples
///
/// ```rust
/// use cache_scheduler::{days, FixedClock, Scheduler, WeeklySchedule};
/// use chrono::{TimeZone, Utc};
///
/// let schedule = WeeklySchedule::new()
///     .add_fresh_from(days::TUE, 9, 15)
///     .add_stale_from(days::TUE, 17, 0);
///
/// // Monday 2019-02-18, 20:00
/// let clock = FixedClock::new(Utc.with_ymd_and_hms(2019, 2, 18, 20, 0, 0).unwrap());
/// let scheduler = Scheduler::builder(clock).schedule(schedule).build();
///
/// assert_eq!(scheduler.calculate_ttl(3600, None), Ok(47_700));
/// ```
#[derive(Debug, Clone)]
pub struct Scheduler<C, J = NoJitter>
where
    C: Clock,
    J: Jitter,
{
    clock: C,
    schedule: Option<WeeklySchedule>,
    expiration_spread: J,
}

impl<C> Scheduler<C>
where
    C: Clock,
{
    /// Create a scheduler without a default schedule or jitter
    pub fn new(clock: C) -> Self {
        SchedulerBuilder::new(clock).build()
    }

    /// Start building a scheduler
    pub fn builder(clock: C) -> SchedulerBuilder<C> {
        SchedulerBuilder::new(clock)
    }
}

impl<C, J> Scheduler<C, J>
where
    C: Clock,
    J: Jitter,
{
    pub(crate) fn from_parts(
        clock: C,
        schedule: Option<WeeklySchedule>,
        expiration_spread: J,
    ) -> Self {
        Self {
            clock,
            schedule,
            expiration_spread,
        }
    }

    /// The schedule used when none is passed per call
    pub fn schedule(&self) -> Option<&WeeklySchedule> {
        self.schedule.as_ref()
    }

    /// Replace the default schedule
    pub fn set_schedule(&mut self, schedule: WeeklySchedule) {
        self.schedule = Some(schedule);
    }

    /// The jitter source
    pub fn expiration_spread(&self) -> &J {
        &self.expiration_spread
    }

    /// Calculate the TTL, in seconds, for an entry cached now.
    ///
    /// `schedule` overrides the configured default schedule for this call.
    ///
    /// # Returns
    ///
    /// Returns [`SchedulerError::NoScheduleProvided`] when there is no schedule
    /// at all and [`SchedulerError::EmptySchedule`] when it has no transition
    /// points. Any other failure yields `default_ttl`. The result may be
    /// negative when the deviation outweighs the time left.
    pub fn calculate_ttl(
        &self,
        default_ttl: i64,
        schedule: Option<&WeeklySchedule>,
    ) -> Result<i64> {
        self.evaluate(default_ttl, schedule).map(|outcome| outcome.ttl())
    }

    /// Like [`calculate_ttl`](Self::calculate_ttl), but reports which path produced the TTL.
    pub fn evaluate(
        &self,
        default_ttl: i64,
        schedule: Option<&WeeklySchedule>,
    ) -> Result<TtlOutcome> {
        let schedule = schedule
            .or(self.schedule.as_ref())
            .ok_or(SchedulerError::NoScheduleProvided)?;

        if schedule.is_empty() {
            return Err(SchedulerError::EmptySchedule);
        }

        match self.resolve(default_ttl, schedule) {
            Ok(outcome) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(ttl = outcome.ttl(), ?outcome, "resolved scheduled ttl");
                Ok(outcome)
            }
            Err(cause) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %cause, default_ttl, "falling back to default ttl");
                Ok(TtlOutcome::Fallback {
                    ttl: default_ttl,
                    cause,
                })
            }
        }
    }

    fn resolve(&self, default_ttl: i64, schedule: &WeeklySchedule) -> Result<TtlOutcome> {
        let now = self.clock.current_instant()?;

        if schedule.desired_state(&now)? == FreshnessState::MustBeFresh {
            return Ok(TtlOutcome::UpToDate { ttl: default_ttl });
        }

        let transition = *schedule.next_fresh_transition(&now)?;
        let seconds_to_transition = seconds_until(&now, &transition)?;
        let deviation = self.expiration_spread.determine_deviation();

        Ok(TtlOutcome::UntilNextFresh {
            ttl: seconds_to_transition.saturating_add(deviation),
            seconds_to_transition,
            deviation,
            transition,
        })
    }
}

/// Whole seconds from `now` until the next weekly occurrence of `point`.
///
/// A point on today's weekday that does not lie strictly after `now` occurs
/// again in seven days.
pub(crate) fn seconds_until<Tz: TimeZone>(
    now: &DateTime<Tz>,
    point: &TransitionPoint,
) -> Result<i64> {
    if !(1..=7).contains(&point.day_of_week()) {
        return Err(SchedulerError::invalid_transition(format!(
            "day of week {} is outside 1..=7",
            point.day_of_week()
        )));
    }

    let today = WeeklyInstant::of(now);
    let mut days_ahead = (7 + point.day_of_week() - today.day_of_week()) % 7;
    if days_ahead == 0 && point.precedes_or_matches(today) {
        days_ahead = 7;
    }

    let target = now
        .date_naive()
        .checked_add_days(Days::new(days_ahead.into()))
        .and_then(|date| date.and_hms_opt(point.hour().into(), point.minute().into(), 0))
        .ok_or_else(|| {
            SchedulerError::invalid_transition(format!("cannot place {}", point.at()))
        })?;

    let target = now
        .timezone()
        .from_local_datetime(&target)
        .earliest()
        .ok_or_else(|| {
            SchedulerError::invalid_transition(format!("{} does not exist in local time", target))
        })?;

    Ok(target.timestamp() - now.timestamp())
}

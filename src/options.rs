//! Construction-time configuration for the scheduler
//!
//! This module provides the `SchedulerBuilder` that configures how a
//! [`Scheduler`] resolves TTLs.

use crate::{Clock, Jitter, NoJitter, Scheduler, WeeklySchedule};

/// Builder for [`Scheduler`] to make construction more ergonomic
pub struct SchedulerBuilder<C, J = NoJitter>
where
    C: Clock,
    J: Jitter,
{
    clock: C,
    schedule: Option<WeeklySchedule>,
    expiration_spread: J,
}

impl<C> SchedulerBuilder<C>
where
    C: Clock,
{
    /// Create a new builder with the required clock
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            schedule: None,
            expiration_spread: NoJitter,
        }
    }
}

impl<C, J> SchedulerBuilder<C, J>
where
    C: Clock,
    J: Jitter,
{
    /// Set the schedule used when none is passed per call
    pub fn schedule(mut self, schedule: WeeklySchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Set the jitter source applied to TTLs computed from the schedule
    pub fn expiration_spread<S: Jitter>(self, expiration_spread: S) -> SchedulerBuilder<C, S> {
        SchedulerBuilder {
            clock: self.clock,
            schedule: self.schedule,
            expiration_spread,
        }
    }

    /// Build the final `Scheduler`
    pub fn build(self) -> Scheduler<C, J> {
        Scheduler::from_parts(self.clock, self.schedule, self.expiration_spread)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{days, ExpirationSpread, FixedClock};
    use chrono::{TimeZone, Utc};

    fn clock() -> FixedClock<Utc> {
        FixedClock::new(Utc.with_ymd_and_hms(2019, 2, 20, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_scheduler_builder() {
        let schedule = WeeklySchedule::new()
            .add_fresh_from(days::MON, 8, 0)
            .add_stale_from(days::FRI, 17, 30);

        let scheduler = SchedulerBuilder::new(clock())
            .schedule(schedule.clone())
            .expiration_spread(ExpirationSpread::minutes(9))
            .build();

        assert_eq!(scheduler.schedule(), Some(&schedule));
        assert_eq!(scheduler.expiration_spread().spread(), 540);
    }

    #[test]
    fn test_scheduler_builder_minimal() {
        let scheduler = SchedulerBuilder::new(clock()).build();

        assert!(scheduler.schedule().is_none());
        assert_eq!(scheduler.expiration_spread().determine_deviation(), 0);
    }
}

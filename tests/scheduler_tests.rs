use assert_matches::assert_matches;
use cache_scheduler::spread::jitter;
use cache_scheduler::{
    days::*, Clock, ExpirationSpread, FixedClock, FixedDeviation, Result, Scheduler,
    SchedulerError, TtlOutcome, WeeklyInstant, WeeklySchedule,
};
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Europe::Amsterdam;
use chrono_tz::Tz;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const DEFAULT_TTL: i64 = 3600;

struct BrokenClock;

impl Clock for BrokenClock {
    type Tz = Utc;

    fn current_instant(&self) -> Result<DateTime<Utc>> {
        Err(SchedulerError::clock_read("clock unavailable"))
    }
}

// February 2019: the 18th is a Monday
fn clock_at(day: u32, hour: u32, minute: u32) -> FixedClock<Utc> {
    FixedClock::new(Utc.with_ymd_and_hms(2019, 2, day, hour, minute, 0).unwrap())
}

fn business_hours() -> WeeklySchedule {
    let mut schedule = WeeklySchedule::new();
    for day in MON..=FRI {
        schedule = schedule.add_fresh_from(day, 8, 0).add_stale_from(day, 17, 30);
    }
    schedule
}

fn amsterdam_clock_at(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
) -> FixedClock<Tz> {
    FixedClock::new(Amsterdam.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap())
}

/// Stale until the only must-be-fresh transition, then fresh for the rest of the day.
fn fresh_from(day: u8, hour: u8, minute: u8) -> WeeklySchedule {
    WeeklySchedule::new()
        .add_fresh_from(day, hour, minute)
        .add_stale_from(day, 23, 59)
}

#[test]
fn test_no_schedule_provided() {
    let scheduler = Scheduler::new(clock_at(20, 12, 0));

    assert_matches!(
        scheduler.calculate_ttl(DEFAULT_TTL, None),
        Err(SchedulerError::NoScheduleProvided)
    );
}

#[test]
fn test_empty_schedule() {
    let scheduler = Scheduler::builder(clock_at(20, 12, 0))
        .schedule(WeeklySchedule::new())
        .build();

    assert_matches!(
        scheduler.calculate_ttl(DEFAULT_TTL, None),
        Err(SchedulerError::EmptySchedule)
    );
}

#[test]
fn test_empty_override_is_rejected_even_with_default_schedule() {
    let scheduler = Scheduler::builder(clock_at(20, 12, 0))
        .schedule(business_hours())
        .build();

    assert_matches!(
        scheduler.calculate_ttl(DEFAULT_TTL, Some(&WeeklySchedule::new())),
        Err(SchedulerError::EmptySchedule)
    );
}

#[test]
fn test_configuration_errors_are_checked_before_the_clock() {
    let scheduler = Scheduler::new(BrokenClock);

    assert_matches!(
        scheduler.calculate_ttl(DEFAULT_TTL, None),
        Err(SchedulerError::NoScheduleProvided)
    );
}

#[test]
fn test_clock_failure_falls_back_to_default_ttl() {
    let scheduler = Scheduler::builder(BrokenClock)
        .schedule(business_hours())
        .build();

    assert_eq!(scheduler.calculate_ttl(DEFAULT_TTL, None), Ok(DEFAULT_TTL));
    assert_matches!(
        scheduler.evaluate(DEFAULT_TTL, None),
        Ok(TtlOutcome::Fallback {
            ttl: DEFAULT_TTL,
            cause: SchedulerError::ClockRead(_),
        })
    );
}

#[test]
fn test_up_to_date_returns_default_ttl() {
    // Wednesday noon
    let scheduler = Scheduler::builder(clock_at(20, 12, 0))
        .schedule(business_hours())
        .expiration_spread(FixedDeviation(-540))
        .build();

    assert_eq!(scheduler.calculate_ttl(DEFAULT_TTL, None), Ok(DEFAULT_TTL));
    assert_eq!(
        scheduler.evaluate(DEFAULT_TTL, None),
        Ok(TtlOutcome::UpToDate { ttl: DEFAULT_TTL })
    );
}

#[test]
fn test_stale_ttl_runs_until_next_fresh_transition() {
    let cases = [
        ("monday evening to tuesday morning", clock_at(18, 20, 0), TUE, 47_700),
        ("tuesday morning to tuesday morning", clock_at(19, 7, 0), TUE, 8_100),
        ("friday evening to monday morning", clock_at(22, 20, 0), MON, 220_500),
        ("saturday afternoon to monday morning", clock_at(23, 15, 0), MON, 152_100),
        ("monday midnight to monday morning", clock_at(18, 0, 0), MON, 33_300),
    ];

    for (name, clock, day, expected) in cases {
        let scheduler = Scheduler::builder(clock).schedule(fresh_from(day, 9, 15)).build();
        assert_eq!(scheduler.calculate_ttl(DEFAULT_TTL, None), Ok(expected), "{}", name);
    }
}

#[test]
fn test_stale_outcome_reports_transition() {
    let scheduler = Scheduler::builder(clock_at(22, 20, 0))
        .schedule(business_hours())
        .build();

    let outcome = scheduler.evaluate(DEFAULT_TTL, None).unwrap();
    assert_matches!(
        outcome,
        TtlOutcome::UntilNextFresh {
            ttl: 216_000,
            seconds_to_transition: 216_000,
            deviation: 0,
            transition,
        } if transition.at() == WeeklyInstant::new(MON, 8, 0)
    );
}

#[test]
fn test_schedule_override_wins_over_default() {
    let scheduler = Scheduler::builder(clock_at(18, 20, 0))
        .schedule(business_hours())
        .build();

    let override_schedule = fresh_from(TUE, 9, 15);
    assert_eq!(
        scheduler.calculate_ttl(DEFAULT_TTL, Some(&override_schedule)),
        Ok(47_700)
    );
    assert_eq!(scheduler.calculate_ttl(DEFAULT_TTL, None), Ok(43_200));
}

#[test]
fn test_set_schedule_replaces_default() {
    let mut scheduler = Scheduler::new(clock_at(18, 20, 0));
    scheduler.set_schedule(fresh_from(TUE, 9, 15));

    assert_eq!(scheduler.calculate_ttl(DEFAULT_TTL, None), Ok(47_700));
}

#[test]
fn test_fixed_deviation_is_added() {
    let scheduler = Scheduler::builder(clock_at(18, 2, 0))
        .schedule(fresh_from(MON, 8, 0))
        .expiration_spread(FixedDeviation(-540))
        .build();

    assert_eq!(scheduler.calculate_ttl(DEFAULT_TTL, None), Ok(21_060));
}

#[test]
fn test_deviation_may_make_ttl_negative() {
    let scheduler = Scheduler::builder(clock_at(18, 7, 59))
        .schedule(fresh_from(MON, 8, 0))
        .expiration_spread(FixedDeviation(-540))
        .build();

    assert_eq!(scheduler.calculate_ttl(DEFAULT_TTL, None), Ok(-480));
}

#[test]
fn test_expiration_spread_stays_within_bounds() {
    let scheduler = Scheduler::builder(clock_at(18, 2, 0))
        .schedule(fresh_from(MON, 8, 0))
        .expiration_spread(ExpirationSpread::seconds(540))
        .build();

    let gap = 21_600;
    for _ in 0..500 {
        let ttl = scheduler.calculate_ttl(DEFAULT_TTL, None).unwrap();
        assert!((gap - 540..=gap + 540).contains(&ttl), "ttl {} out of bounds", ttl);
    }
}

#[test]
fn test_jitter_only_consulted_for_stale_ttls() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let scheduler = Scheduler::builder(clock_at(20, 12, 0))
        .schedule(business_hours())
        .expiration_spread(jitter(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            0
        }))
        .build();

    assert_eq!(scheduler.calculate_ttl(DEFAULT_TTL, None), Ok(DEFAULT_TTL));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let thursday = fresh_from(THU, 8, 0);
    assert_eq!(scheduler.calculate_ttl(DEFAULT_TTL, Some(&thursday)), Ok(72_000));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_schedule_without_fresh_transition_falls_back() {
    let scheduler = Scheduler::builder(clock_at(20, 12, 0))
        .schedule(WeeklySchedule::new().add_stale_from(MON, 0, 0))
        .build();

    assert_matches!(
        scheduler.evaluate(DEFAULT_TTL, None),
        Ok(TtlOutcome::Fallback {
            ttl: DEFAULT_TTL,
            cause: SchedulerError::NoFreshTransition,
        })
    );
}

#[test]
fn test_unplaceable_transition_falls_back() {
    let scheduler = Scheduler::builder(clock_at(20, 12, 0))
        .schedule(WeeklySchedule::new().add_fresh_from(THU, 25, 0).add_stale_from(MON, 0, 0))
        .build();

    assert_matches!(
        scheduler.evaluate(DEFAULT_TTL, None),
        Ok(TtlOutcome::Fallback {
            cause: SchedulerError::InvalidTransition(_),
            ..
        })
    );
}

#[test]
fn test_transition_in_dst_gap_falls_back() {
    // 2019-03-31 02:00 jumps to 03:00 in Amsterdam
    let scheduler = Scheduler::builder(amsterdam_clock_at(2019, 3, 31, 1, 0))
        .schedule(fresh_from(SUN, 2, 30))
        .build();

    assert_matches!(
        scheduler.evaluate(DEFAULT_TTL, None),
        Ok(TtlOutcome::Fallback {
            ttl: DEFAULT_TTL,
            cause: SchedulerError::InvalidTransition(_),
        })
    );
}

#[test]
fn test_transition_in_dst_overlap_uses_earliest_occurrence() {
    // 2019-10-27 03:00 falls back to 02:00 in Amsterdam, so 02:30 happens twice
    let scheduler = Scheduler::builder(amsterdam_clock_at(2019, 10, 27, 0, 0))
        .schedule(fresh_from(SUN, 2, 30))
        .build();

    assert_matches!(
        scheduler.evaluate(DEFAULT_TTL, None),
        Ok(TtlOutcome::UntilNextFresh {
            ttl: 9_000,
            seconds_to_transition: 9_000,
            ..
        })
    );
}

#[test]
fn test_ttl_across_dst_change_counts_elapsed_seconds() {
    let cases = [
        ("spring forward, one hour shorter", amsterdam_clock_at(2019, 3, 30, 12, 0), 154_800),
        ("fall back, one hour longer", amsterdam_clock_at(2019, 10, 26, 12, 0), 162_000),
    ];

    for (name, clock, expected) in cases {
        let scheduler = Scheduler::builder(clock).schedule(fresh_from(MON, 8, 0)).build();
        assert_eq!(scheduler.calculate_ttl(DEFAULT_TTL, None), Ok(expected), "{}", name);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_lookups_share_one_scheduler() {
    let scheduler = Arc::new(
        Scheduler::builder(clock_at(22, 20, 0))
            .schedule(business_hours())
            .build(),
    );

    let mut handles = Vec::new();
    for _ in 0..16 {
        let scheduler = scheduler.clone();
        handles.push(tokio::spawn(async move {
            scheduler.calculate_ttl(DEFAULT_TTL, None)
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), Ok(216_000));
    }
}

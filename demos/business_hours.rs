use cache_scheduler::{
    days, ExpirationSpread, FixedClock, Scheduler, SystemClock, TtlOutcome, WeeklySchedule,
};
use chrono::{TimeZone, Utc};
use tracing_subscriber::EnvFilter;

fn business_hours() -> WeeklySchedule {
    let mut schedule = WeeklySchedule::new();
    for day in days::MON..=days::FRI {
        schedule = schedule
            .add_fresh_from(day, 8, 0)
            .add_stale_from(day, 17, 30);
    }
    schedule
}

fn describe(outcome: &TtlOutcome) {
    match outcome {
        TtlOutcome::UpToDate { ttl } => {
            println!("Business hours, default TTL: {}s", ttl);
        }
        TtlOutcome::UntilNextFresh {
            ttl,
            seconds_to_transition,
            deviation,
            transition,
        } => {
            println!(
                "Stale allowed until {} ({}s, deviation {}s): TTL {}s",
                transition.at(),
                seconds_to_transition,
                deviation,
                ttl
            );
        }
        TtlOutcome::Fallback { ttl, cause } => {
            println!("Schedule unavailable ({}), default TTL: {}s", cause, ttl);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Right now ===");

    let scheduler = Scheduler::builder(SystemClock)
        .schedule(business_hours())
        .expiration_spread(ExpirationSpread::minutes(9))
        .build();
    describe(&scheduler.evaluate(3600, None)?);

    println!("\n=== Fixed moments ===");

    // February 2019: the 18th is a Monday
    for (day, hour) in [(18, 12), (18, 20), (22, 20), (24, 16)] {
        let now = Utc.with_ymd_and_hms(2019, 2, day, hour, 0, 0).single().ok_or("invalid date")?;
        let scheduler = Scheduler::builder(FixedClock::new(now))
            .schedule(business_hours())
            .build();

        print!("{}: ", now.format("%A %H:%M"));
        describe(&scheduler.evaluate(3600, None)?);
    }

    Ok(())
}

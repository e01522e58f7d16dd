#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Cache Scheduler
//!
//! Compute cache TTLs from a recurring weekly schedule, so that an entry
//! expires exactly when its data has to be up to date again instead of after
//! a fixed TTL that ignores business hours.
//!
//! A [`WeeklySchedule`] holds transition points such as "from Monday 08:00
//! data must be fresh" and "from Monday 17:30 stale data is fine". While
//! stale data is allowed, the [`Scheduler`] hands out a TTL that runs until
//! the next must-be-fresh transition. While data must be fresh, it hands out
//! the default TTL.
//!
//! ## Features
//!
//! - `serde` (default): Enable (de)serialization of schedules
//! - `tracing`: Enable tracing support
//!
//! ## Quick Start
//!
//! ```rust
//! use cache_scheduler::{days, ExpirationSpread, Scheduler, SystemClock, WeeklySchedule};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut schedule = WeeklySchedule::new();
//!     for day in days::MON..=days::FRI {
//!         schedule = schedule
//!             .add_fresh_from(day, 8, 0)
//!             .add_stale_from(day, 17, 30);
//!     }
//!
//!     let scheduler = Scheduler::builder(SystemClock)
//!         .schedule(schedule)
//!         .expiration_spread(ExpirationSpread::minutes(9))
//!         .build();
//!
//!     let ttl = scheduler.calculate_ttl(3600, None)?;
//!     println!("Cache for {} seconds", ttl);
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod error;
pub mod options;
pub mod schedule;
pub mod scheduler;
pub mod spread;
pub mod transition;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Result, SchedulerError};
pub use options::SchedulerBuilder;
pub use schedule::WeeklySchedule;
pub use scheduler::{Scheduler, TtlOutcome};
pub use spread::{ExpirationSpread, FixedDeviation, Jitter, NoJitter};
pub use transition::{FreshnessState, TransitionPoint, WeeklyInstant};

/// ISO days of the week, Monday = 1 through Sunday = 7.
pub mod days {
    /// Monday
    pub const MON: u8 = 1;
    /// Tuesday
    pub const TUE: u8 = 2;
    /// Wednesday
    pub const WED: u8 = 3;
    /// Thursday
    pub const THU: u8 = 4;
    /// Friday
    pub const FRI: u8 = 5;
    /// Saturday
    pub const SAT: u8 = 6;
    /// Sunday
    pub const SUN: u8 = 7;
}

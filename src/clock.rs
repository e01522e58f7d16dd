//! Clock trait and implementations
//!
//! The scheduler never reads the system time directly. It asks a [`Clock`],
//! so tests and simulations can pin the current instant.

use crate::{Result, SchedulerError};
use chrono::{DateTime, Local, TimeZone, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current wall-clock instant.
///
/// The time zone of the returned instant is the one schedule transitions are
/// interpreted in.
pub trait Clock: Send + Sync {
    /// Time zone the clock reports in
    type Tz: TimeZone;

    /// Read the current instant
    ///
    /// # Returns
    ///
    /// Returns the current date and time, or [`SchedulerError::ClockRead`]
    /// if it cannot be determined.
    fn current_instant(&self) -> Result<DateTime<Self::Tz>>;
}

/// Clock backed by the operating system, reporting local time.
///
/// # Examples
///
/// ```rust
/// use cache_scheduler::{Clock, SystemClock};
///
/// let now = SystemClock.current_instant()?;
/// # Ok::<(), cache_scheduler::SchedulerError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Tz = Local;

    fn current_instant(&self) -> Result<DateTime<Local>> {
        let now = SystemTime::now();

        // Local::now() would panic on a clock set before the epoch
        now.duration_since(UNIX_EPOCH)
            .map_err(|e| SchedulerError::clock_read(e.to_string()))?;

        Ok(DateTime::<Utc>::from(now).with_timezone(&Local))
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone)]
pub struct FixedClock<Tz: TimeZone> {
    instant: DateTime<Tz>,
}

impl<Tz: TimeZone> FixedClock<Tz> {
    /// Create a clock that always reports `instant`
    pub fn new(instant: DateTime<Tz>) -> Self {
        Self { instant }
    }

    /// The instant this clock reports
    pub fn instant(&self) -> &DateTime<Tz> {
        &self.instant
    }
}

impl<Tz> Clock for FixedClock<Tz>
where
    Tz: TimeZone + Send + Sync,
    Tz::Offset: Send + Sync,
{
    type Tz = Tz;

    fn current_instant(&self) -> Result<DateTime<Tz>> {
        Ok(self.instant.clone())
    }
}

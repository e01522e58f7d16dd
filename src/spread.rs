//! Expiration jitter for computed TTLs.

use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng};

/// Trait for producing a deviation, in seconds, added to a computed TTL.
///
/// Spreading expirations keeps entries that were cached in the same stale
/// window from all expiring at the exact same second.
pub trait Jitter: Send + Sync {
    /// Produce the deviation to add to the TTL.
    fn determine_deviation(&self) -> i64;
}

/// A jitter source that never deviates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl Jitter for NoJitter {
    fn determine_deviation(&self) -> i64 {
        0
    }
}

/// A jitter source that always returns the same deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDeviation(pub i64);

impl Jitter for FixedDeviation {
    fn determine_deviation(&self) -> i64 {
        self.0
    }
}

/// A uniformly distributed deviation in `[-spread, spread]` seconds.
///
/// # Examples
///
/// ```rust
/// use cache_scheduler::{ExpirationSpread, Jitter};
///
/// let spread = ExpirationSpread::minutes(9);
/// let deviation = spread.determine_deviation();
/// assert!((-540..=540).contains(&deviation));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationSpread {
    spread: i64,
}

impl ExpirationSpread {
    /// Spread expirations by up to `seconds` in either direction
    pub fn seconds(seconds: i64) -> Self {
        Self {
            spread: seconds.saturating_abs(),
        }
    }

    /// Spread expirations by up to `minutes` in either direction
    pub fn minutes(minutes: i64) -> Self {
        Self::seconds(minutes.saturating_mul(60))
    }

    /// Spread expirations by up to `hours` in either direction
    pub fn hours(hours: i64) -> Self {
        Self::seconds(hours.saturating_mul(3600))
    }

    /// The maximum deviation in seconds
    pub fn spread(&self) -> i64 {
        self.spread
    }
}

impl Jitter for ExpirationSpread {
    fn determine_deviation(&self) -> i64 {
        match StdRng::from_rng(OsRng) {
            Ok(mut rng) => rng.gen_range(-self.spread..=self.spread),
            Err(_) => 0,
        }
    }
}

/// A function-based jitter source that can be used with closures.
pub struct FunctionJitter<F> {
    func: F,
}

impl<F> FunctionJitter<F> {
    /// Create a new function jitter source.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Jitter for FunctionJitter<F>
where
    F: Fn() -> i64 + Send + Sync,
{
    fn determine_deviation(&self) -> i64 {
        (self.func)()
    }
}

/// Helper function to create a jitter source from a closure.
///
/// # Examples
///
/// ```rust
/// use cache_scheduler::{Jitter, spread::jitter};
///
/// let always_early = jitter(|| -30);
/// assert_eq!(always_early.determine_deviation(), -30);
/// ```
pub fn jitter<F>(func: F) -> FunctionJitter<F>
where
    F: Fn() -> i64 + Send + Sync,
{
    FunctionJitter::new(func)
}

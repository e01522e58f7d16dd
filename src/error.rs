//! Error types for cache scheduling operations.

use thiserror::Error;

/// Result type alias for cache scheduling operations.
pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Errors that can occur while resolving a scheduled TTL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// No schedule was passed in and none was configured on the scheduler
    #[error("No schedule provided")]
    NoScheduleProvided,

    /// The schedule holds no transition points, so no state can be determined
    #[error("Schedule contains no transition points")]
    EmptySchedule,

    /// The schedule never requires up-to-date data
    #[error("Schedule contains no must-be-fresh transition")]
    NoFreshTransition,

    /// Error when the current date and time cannot be read
    #[error("Unable to read current date and time: {0}")]
    ClockRead(String),

    /// A transition point cannot be placed on the calendar
    #[error("Invalid transition point: {0}")]
    InvalidTransition(String),
}

impl SchedulerError {
    /// Create a new clock read error
    pub fn clock_read<S: Into<String>>(msg: S) -> Self {
        SchedulerError::ClockRead(msg.into())
    }

    /// Create a new invalid transition error
    pub fn invalid_transition<S: Into<String>>(msg: S) -> Self {
        SchedulerError::InvalidTransition(msg.into())
    }

    /// Whether this error is a caller mistake that must be surfaced.
    ///
    /// Everything else is a runtime failure that the [`Scheduler`](crate::Scheduler)
    /// downgrades to the default TTL.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            SchedulerError::NoScheduleProvided | SchedulerError::EmptySchedule
        )
    }
}

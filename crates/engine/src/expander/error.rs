//! Unparseable-schedule error.

/// Why a schedule could not be expanded.
///
/// Always recoverable: the owning job is reported and skipped, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("expected 5 fields (minute hour day-of-month month day-of-week), got {found}")]
    FieldCount { found: usize },

    #[error("invalid cron expression '{schedule}': {message}")]
    Cron { schedule: String, message: String },
}

impl ScheduleError {
    /// Re-attribute a parse failure of a derived expression to the schedule it came from.
    pub(crate) fn for_schedule(self, schedule: &str) -> Self {
        match self {
            ScheduleError::Cron { message, .. } => ScheduleError::Cron {
                schedule: schedule.to_string(),
                message,
            },
            other => other,
        }
    }
}

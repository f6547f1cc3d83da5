//! Schedule Expander: cron expression -> occupied minute slots.
//!
//! Trigger instants are enumerated with the `cron` crate over one reference
//! day; each trigger covers `max(1, ceil(duration / 60))` minutes when duration
//! is reflected. Unparseable schedules are recoverable: they expand to nothing
//! and are reported as a [`ScheduleWarning`].

mod core;
pub(crate) mod cron;
mod error;

#[cfg(test)]
mod tests;

use tracing::warn;

use cronspread_core::{duration_minutes, Job, ScheduleWarning, Slot};

pub use self::core::ScheduleExpander;
pub use self::cron::ReferenceDay;
pub use self::error::ScheduleError;

/// Expand one schedule into the ordered list of slots it occupies.
///
/// Without `reflect_duration` every trigger covers exactly one minute.
/// Duplicates appear when an occurrence runs into the next trigger.
pub fn expand(
    schedule: &str,
    duration_seconds: Option<f64>,
    reflect_duration: bool,
    day: ReferenceDay,
) -> Result<Vec<Slot>, ScheduleError> {
    let duration = if reflect_duration {
        duration_minutes(duration_seconds)
    } else {
        1
    };
    ScheduleExpander::new(day)
        .coverage(schedule, duration)
        .map(|slots| slots.to_vec())
}

/// Log an unparseable schedule and turn it into a warning record.
pub(crate) fn schedule_warning(job: &Job, error: &ScheduleError) -> ScheduleWarning {
    warn!(
        job = %job.name,
        schedule = %job.schedule,
        error = %error,
        "skipping job with invalid cron expression"
    );
    ScheduleWarning {
        job_name: job.name.clone(),
        schedule: job.schedule.clone(),
        reason: error.to_string(),
    }
}

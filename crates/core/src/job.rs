//! Job records as they enter and leave the engine.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::grid::MINUTES_PER_DAY;

/// A periodic job declaration.
///
/// Field names on the wire follow the job-list files the tool has always read:
/// `estimation` for the duration in seconds and `keepTime` for the pin flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Human label. Not guaranteed to be unique within a batch.
    pub name: String,
    /// 5-field cron expression: minute, hour, day-of-month, month, day-of-week.
    pub schedule: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Estimated run time in seconds.
    #[serde(
        default,
        rename = "estimation",
        alias = "durationSeconds",
        alias = "duration_seconds",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_seconds: Option<f64>,
    /// Pinned jobs are never moved by an optimizer.
    #[serde(
        default,
        rename = "keepTime",
        alias = "pinned",
        skip_serializing_if = "is_false"
    )]
    pub pinned: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Job {
    pub fn new(name: impl Into<String>, schedule: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schedule: schedule.into(),
            description: None,
            duration_seconds: None,
            pinned: false,
        }
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }

    /// Minutes covered by one occurrence: `max(1, ceil(seconds / 60))`.
    ///
    /// Missing, zero, negative or NaN estimations count as a single minute.
    /// The result never exceeds one day.
    pub fn duration_minutes(&self) -> usize {
        duration_minutes(self.duration_seconds)
    }
}

/// See [`Job::duration_minutes`].
pub fn duration_minutes(seconds: Option<f64>) -> usize {
    match seconds {
        Some(secs) if secs > 0.0 => ((secs / 60.0).ceil() as usize).clamp(1, MINUTES_PER_DAY),
        _ => 1,
    }
}

/// Reject a batch in which any job lacks a name or a schedule.
///
/// Partial batches cannot be optimized safely, so the first offending record
/// fails the whole call.
pub fn validate_jobs(jobs: &[Job]) -> Result<()> {
    for (index, job) in jobs.iter().enumerate() {
        if job.name.trim().is_empty() {
            return Err(CoreError::MissingField {
                index,
                field: "name",
            });
        }
        if job.schedule.trim().is_empty() {
            return Err(CoreError::MissingField {
                index,
                field: "schedule",
            });
        }
    }
    Ok(())
}

/// A job in the suggestion output, carrying its previous schedule when moved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedJob {
    pub name: String,
    pub schedule: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        rename = "oldSchedule",
        skip_serializing_if = "Option::is_none"
    )]
    pub old_schedule: Option<String>,
}

/// Pair an original batch with its revision, position by position.
pub fn suggestion_output(original: &[Job], revised: &[Job]) -> Vec<SuggestedJob> {
    revised
        .iter()
        .enumerate()
        .map(|(index, job)| {
            let before = original.get(index);
            let description = job
                .description
                .clone()
                .or_else(|| before.and_then(|b| b.description.clone()));
            let old_schedule = before
                .filter(|b| b.schedule != job.schedule)
                .map(|b| b.schedule.clone());
            SuggestedJob {
                name: job.name.clone(),
                schedule: job.schedule.clone(),
                description,
                old_schedule,
            }
        })
        .collect()
}

/// A recoverable problem with a single job's schedule.
///
/// The job is left out of occupancy and optimization; its schedule string is
/// passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleWarning {
    pub job_name: String,
    pub schedule: String,
    pub reason: String,
}

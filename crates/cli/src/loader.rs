//! Job-list loading: YAML, JSON and crontab text into validated [`Job`] batches.

use std::fs;
use std::path::Path;

use tracing::debug;

use cronspread_core::{validate_jobs, CoreError, Job};

use crate::cli::InputFormat;

/// Errors that can occur while reading a job list.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse/deserialization error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parse/deserialization error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Neither a job array nor an object with a `jobs` array.
    #[error("Invalid {0} format: expected a list of jobs or an object with a `jobs` list")]
    InvalidShape(&'static str),

    /// The batch parsed but is not usable as a whole.
    #[error("Rejected job list: {0}")]
    Rejected(#[from] CoreError),
}

pub type Result<T> = std::result::Result<T, LoadError>;

/// Read and validate a job list from disk.
pub fn load_jobs(path: &Path, format: InputFormat) -> Result<Vec<Job>> {
    let content = fs::read_to_string(path)?;
    let jobs = parse_jobs(&content, format)?;
    debug!(path = %path.display(), count = jobs.len(), "loaded job list");
    Ok(jobs)
}

/// Parse and validate a job list held in memory.
pub fn parse_jobs(content: &str, format: InputFormat) -> Result<Vec<Job>> {
    let jobs = match format {
        InputFormat::Yaml => parse_yaml(content)?,
        InputFormat::Json => parse_json(content)?,
        InputFormat::Text => parse_crontab(content),
    };
    validate_jobs(&jobs)?;
    Ok(jobs)
}

/// Accept a bare list or an object carrying a `jobs` list.
fn parse_json(content: &str) -> Result<Vec<Job>> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let list = if value.is_array() {
        value
    } else {
        match value.get("jobs").filter(|jobs| jobs.is_array()) {
            Some(jobs) => jobs.clone(),
            None => return Err(LoadError::InvalidShape("JSON")),
        }
    };
    Ok(serde_json::from_value(list)?)
}

fn parse_yaml(content: &str) -> Result<Vec<Job>> {
    let value: serde_yaml::Value = serde_yaml::from_str(content)?;
    let list = if value.is_sequence() {
        value
    } else {
        match value.get("jobs").filter(|jobs| jobs.is_sequence()) {
            Some(jobs) => jobs.clone(),
            None => return Err(LoadError::InvalidShape("YAML")),
        }
    };
    Ok(serde_yaml::from_value(list)?)
}

/// Parse crontab lines: `<5 schedule fields> <command> [# description]`.
///
/// Blank lines, comments and lines with fewer than five fields are skipped.
/// The command becomes the job name, or `job-<line index>` when absent.
pub fn parse_crontab(content: &str) -> Vec<Job> {
    content
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return None;
            }
            let parts: Vec<&str> = trimmed.split_whitespace().collect();
            if parts.len() < 5 {
                return None;
            }
            let schedule = parts[..5].join(" ");
            let rest = parts[5..].join(" ");
            let (command, comment) = match rest.split_once('#') {
                Some((command, comment)) => (command, Some(comment.trim())),
                None => (rest.as_str(), None),
            };
            let name = match command.trim() {
                "" => format!("job-{index}"),
                command => command.to_string(),
            };
            let mut job = Job::new(name, schedule);
            if let Some(description) = comment.filter(|c| !c.is_empty()) {
                job = job.with_description(description);
            }
            Some(job)
        })
        .collect()
}

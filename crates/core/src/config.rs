use std::env;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CoreError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

/// Parse an env var, falling back to `default` (with a warning) when it does not parse.
fn env_parsed<T, E>(key: &str, default: T) -> T
where
    T: FromStr<Err = E>,
    E: fmt::Display,
{
    match env_opt(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(e) => {
                warn!(key, value = %raw, error = %e, "ignoring unparseable setting");
                default
            }
        },
        None => default,
    }
}

// ── Optimizer selection ───────────────────────────────────────

/// Which schedule optimizer to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerKind {
    /// Spread `*/S` jobs across offsets of their shared step.
    #[default]
    Offset,
    /// Greedy phase reassignment across every movable job.
    Greedy,
}

impl OptimizerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizerKind::Offset => "offset",
            OptimizerKind::Greedy => "greedy",
        }
    }
}

impl fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptimizerKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "offset" => Ok(OptimizerKind::Offset),
            "greedy" => Ok(OptimizerKind::Greedy),
            other => Err(CoreError::InvalidConfig {
                key: "optimizer".to_string(),
                value: other.to_string(),
                reason: "expected 'offset' or 'greedy'".to_string(),
            }),
        }
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Day whose trigger instants are expanded into slots.
    pub reference_date: NaiveDate,
    /// Spread each occurrence over its estimated duration when building heatmaps.
    pub reflect_duration: bool,
    pub optimizer: OptimizerKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_date: Utc::now().date_naive(),
            reflect_duration: false,
            optimizer: OptimizerKind::default(),
        }
    }
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    ///
    /// - `CRONSPREAD_REFERENCE_DATE`: `YYYY-MM-DD`, defaults to today (UTC)
    /// - `CRONSPREAD_REFLECT_DURATION`: `true` / `false`
    /// - `CRONSPREAD_OPTIMIZER`: `offset` / `greedy`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            reference_date: env_parsed("CRONSPREAD_REFERENCE_DATE", defaults.reference_date),
            reflect_duration: env_parsed("CRONSPREAD_REFLECT_DURATION", defaults.reflect_duration),
            optimizer: env_parsed("CRONSPREAD_OPTIMIZER", defaults.optimizer),
        }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  reference_date:   {}", self.reference_date);
        tracing::info!("  reflect_duration: {}", self.reflect_duration);
        tracing::info!("  optimizer:        {}", self.optimizer);
    }
}

//! Density Accumulator: folds every job's expanded slots into one occupancy grid.

use serde::{Deserialize, Serialize};

use cronspread_core::{
    ContributionGrid, ContributionStatus, IntensityGrid, Job, OccupancyGrid, ScheduleWarning,
    MINUTES_PER_DAY,
};

use crate::expander::{schedule_warning, ReferenceDay, ScheduleExpander};
use crate::normalize::normalize;

/// What to accumulate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccumulateOptions {
    /// Cover each occurrence's estimated duration instead of only its trigger minute.
    pub reflect_duration: bool,
    /// Record which jobs contribute to every slot.
    pub collect_contributions: bool,
}

/// Raw accumulation result.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulation {
    pub raw: OccupancyGrid,
    pub contributions: Option<ContributionGrid>,
    pub max_value: u32,
    pub warnings: Vec<ScheduleWarning>,
}

/// Everything a heatmap renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapData {
    /// Occupancy rescaled to `0..=9`.
    pub normalized: IntensityGrid,
    pub raw: OccupancyGrid,
    pub contributions: ContributionGrid,
    pub max_value: u32,
    /// Smallest non-zero occupancy.
    pub min_value: u32,
    #[serde(default)]
    pub warnings: Vec<ScheduleWarning>,
}

/// Expand every job and fold its occurrences into a fresh grid.
///
/// The trigger minute of each occurrence is tagged `starting`, the minutes
/// after it `continuing`. Jobs with unparseable schedules add nothing and are
/// reported in `warnings`.
pub fn accumulate(jobs: &[Job], day: ReferenceDay, options: AccumulateOptions) -> Accumulation {
    let mut expander = ScheduleExpander::new(day);
    let mut raw = OccupancyGrid::new();
    let mut contributions = options.collect_contributions.then(ContributionGrid::new);
    let mut warnings = Vec::new();

    for job in jobs {
        let starts = match expander.starts(&job.schedule) {
            Ok(starts) => starts,
            Err(e) => {
                warnings.push(schedule_warning(job, &e));
                continue;
            }
        };
        let duration = if options.reflect_duration {
            job.duration_minutes()
        } else {
            1
        };

        for &start in starts.iter() {
            let end = (start + duration).min(MINUTES_PER_DAY);
            for slot in start..end {
                raw.add_slots(&[slot]);
                if let Some(grid) = contributions.as_mut() {
                    let status = if slot == start {
                        ContributionStatus::Starting
                    } else {
                        ContributionStatus::Continuing
                    };
                    grid.push(slot, &job.name, status);
                }
            }
        }
    }

    let max_value = raw.max_value();
    Accumulation {
        raw,
        contributions,
        max_value,
        warnings,
    }
}

/// Build the full heatmap, contributions included.
pub fn build_heatmap(jobs: &[Job], day: ReferenceDay, reflect_duration: bool) -> HeatmapData {
    let Accumulation {
        raw,
        contributions,
        max_value,
        warnings,
    } = accumulate(
        jobs,
        day,
        AccumulateOptions {
            reflect_duration,
            collect_contributions: true,
        },
    );
    HeatmapData {
        normalized: normalize(&raw, max_value),
        min_value: raw.min_nonzero(),
        contributions: contributions.unwrap_or_default(),
        raw,
        max_value,
        warnings,
    }
}

/// Only the normalized grid.
pub fn build_matrix(jobs: &[Job], day: ReferenceDay, reflect_duration: bool) -> IntensityGrid {
    let acc = accumulate(
        jobs,
        day,
        AccumulateOptions {
            reflect_duration,
            collect_contributions: false,
        },
    );
    normalize(&acc.raw, acc.max_value)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use cronspread_core::{slot_of, Contribution};

    use super::*;

    fn day() -> ReferenceDay {
        ReferenceDay::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    #[test]
    fn matrix_considers_duration() {
        let jobs = vec![
            Job::new("a", "0 0 * * *"),
            Job::new("b", "0 * * * *").with_duration(120.0),
        ];
        let matrix = build_matrix(&jobs, day(), true);
        assert_eq!(matrix.get(slot_of(0, 0)), 9);
        assert_eq!(matrix.get(slot_of(0, 1)), 5);
        assert_eq!(matrix.get(slot_of(0, 2)), 0);
    }

    #[test]
    fn collects_contributions_in_job_order() {
        let jobs = vec![Job::new("a", "0 0 * * *"), Job::new("b", "0 0 * * *")];
        let heatmap = build_heatmap(&jobs, day(), false);
        assert_eq!(heatmap.raw.get(0), 2);
        assert_eq!(heatmap.max_value, 2);
        assert_eq!(heatmap.min_value, 2);
        assert_eq!(
            heatmap.contributions.at(0),
            &[
                Contribution {
                    name: "a".into(),
                    status: ContributionStatus::Starting
                },
                Contribution {
                    name: "b".into(),
                    status: ContributionStatus::Starting
                },
            ]
        );
    }

    #[test]
    fn marks_continuing_minutes() {
        let jobs = vec![Job::new("long", "0 0 * * *").with_duration(180.0)];
        let heatmap = build_heatmap(&jobs, day(), true);
        assert_eq!(heatmap.contributions.at(0)[0].status, ContributionStatus::Starting);
        assert_eq!(heatmap.contributions.at(1)[0].status, ContributionStatus::Continuing);
        assert_eq!(heatmap.contributions.at(2)[0].status, ContributionStatus::Continuing);
        assert!(heatmap.contributions.at(3).is_empty());
    }

    #[test]
    fn without_reflection_durations_are_ignored() {
        let jobs = vec![Job::new("long", "0 0 * * *").with_duration(180.0)];
        let heatmap = build_heatmap(&jobs, day(), false);
        assert_eq!(heatmap.raw.total(), 1);
    }

    #[test]
    fn invalid_schedule_is_a_warning() {
        let jobs = vec![
            Job::new("bad", "not-a-valid-cron"),
            Job::new("good", "*/30 * * * *"),
        ];
        let acc = accumulate(&jobs, day(), AccumulateOptions::default());
        assert_eq!(acc.raw.total(), 48);
        assert!(acc.contributions.is_none());
        assert_eq!(acc.warnings.len(), 1);
        assert_eq!(acc.warnings[0].job_name, "bad");
        assert_eq!(acc.warnings[0].schedule, "not-a-valid-cron");
    }

    #[test]
    fn empty_batch_is_an_empty_grid() {
        let heatmap = build_heatmap(&[], day(), true);
        assert_eq!(heatmap.max_value, 0);
        assert_eq!(heatmap.min_value, 0);
        assert!(heatmap.normalized.levels().iter().all(|&l| l == 0));
    }
}

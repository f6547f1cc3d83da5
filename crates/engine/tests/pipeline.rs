//! End-to-end checks: job list -> heatmap -> suggestion -> heatmap.

use chrono::NaiveDate;

use cronspread_core::{suggestion_output, Job, OptimizerKind, MAX_INTENSITY, MINUTES_PER_DAY};
use cronspread_engine::{build_heatmap, build_matrix, optimizer_for, ReferenceDay};

fn day() -> ReferenceDay {
    ReferenceDay::new(NaiveDate::from_ymd_opt(2024, 3, 12).unwrap())
}

fn crowded() -> Vec<Job> {
    vec![
        Job::new("backup", "0 2 * * *").with_duration(1800.0),
        Job::new("sync-a", "*/15 * * * *").with_duration(60.0),
        Job::new("sync-b", "*/15 * * * *").with_duration(60.0),
        Job::new("sync-c", "*/15 * * * *").with_duration(60.0),
        Job::new("report", "0 */4 * * *").with_duration(300.0),
        Job::new("cleanup", "0 2 * * *").with_duration(600.0).pinned(),
        Job::new("typo", "*/15 * * *"),
    ]
}

#[test]
fn heatmap_peaks_at_max_intensity() {
    let heatmap = build_heatmap(&crowded(), day(), true);
    let peak = heatmap.normalized.levels().iter().copied().max().unwrap();
    assert_eq!(peak, MAX_INTENSITY);
    assert!(heatmap.min_value >= 1);
    assert!(heatmap.min_value <= heatmap.max_value);
    assert_eq!(heatmap.warnings.len(), 1);
    assert_eq!(heatmap.warnings[0].job_name, "typo");
}

#[test]
fn empty_batch_has_blank_heatmap() {
    let matrix = build_matrix(&[], day(), true);
    assert_eq!(matrix.levels().len(), MINUTES_PER_DAY);
    assert!(matrix.levels().iter().all(|&l| l == 0));
}

#[test]
fn suggestions_lower_the_peak() {
    let jobs = crowded();
    let before = build_heatmap(&jobs, day(), true);
    for kind in [OptimizerKind::Offset, OptimizerKind::Greedy] {
        let suggestion = optimizer_for(kind, day()).optimize(&jobs);
        let after = build_heatmap(&suggestion.jobs, day(), true);
        assert!(after.max_value <= before.max_value, "{kind}");
        assert_eq!(after.raw.total(), before.raw.total(), "{kind}");
    }
}

#[test]
fn suggestion_output_marks_only_changes() {
    let jobs = crowded();
    let suggestion = optimizer_for(OptimizerKind::Greedy, day()).optimize(&jobs);
    let output = suggestion_output(&jobs, &suggestion.jobs);
    assert_eq!(output.len(), jobs.len());

    let cleanup = &output[5];
    assert_eq!(cleanup.schedule, "0 2 * * *");
    assert_eq!(cleanup.old_schedule, None);

    let typo = &output[6];
    assert_eq!(typo.schedule, "*/15 * * *");
    assert_eq!(typo.old_schedule, None);

    for (entry, original) in output.iter().zip(&jobs) {
        match &entry.old_schedule {
            Some(old) => {
                assert_eq!(old, &original.schedule);
                assert_ne!(entry.schedule, original.schedule);
            }
            None => assert_eq!(entry.schedule, original.schedule),
        }
    }
}

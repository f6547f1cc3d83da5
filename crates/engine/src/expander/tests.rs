//! Tests for the schedule expander.

use chrono::NaiveDate;

use super::cron::{expand_triggers, normalize_cron, translate_day_of_week};
use super::*;

/// 2024-01-01 is a Monday.
fn monday() -> ReferenceDay {
    ReferenceDay::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
}

/// 2024-03-12 is a Tuesday.
fn tuesday_the_12th() -> ReferenceDay {
    ReferenceDay::new(NaiveDate::from_ymd_opt(2024, 3, 12).unwrap())
}

fn slots(schedule: &str) -> Vec<Slot> {
    expand(schedule, None, false, monday()).unwrap()
}

// ── normalization ─────────────────────────────────────────────────────

#[test]
fn normalize_prepends_seconds() {
    assert_eq!(normalize_cron("*/15 * * * *").unwrap(), "0 */15 * * * *");
    assert_eq!(normalize_cron("  30 2 1 * *  ").unwrap(), "0 30 2 1 * *");
}

#[test]
fn normalize_rejects_wrong_field_count() {
    assert_eq!(
        normalize_cron("* * * *"),
        Err(ScheduleError::FieldCount { found: 4 })
    );
    assert_eq!(
        normalize_cron("0 * * * * *"),
        Err(ScheduleError::FieldCount { found: 6 })
    );
}

#[test]
fn day_of_week_translation() {
    assert_eq!(translate_day_of_week("*"), "*");
    assert_eq!(translate_day_of_week("1-5"), "2,3,4,5,6");
    assert_eq!(translate_day_of_week("0,7"), "1");
    assert_eq!(translate_day_of_week("*/2"), "1,3,5,7");
    assert_eq!(translate_day_of_week("5-7"), "1,6,7");
    assert_eq!(translate_day_of_week("Mon-Fri"), "Mon-Fri");
    assert_eq!(translate_day_of_week("9"), "9");
}

// ── expansion ─────────────────────────────────────────────────────────

#[test]
fn midnight_and_last_minute_are_inside_the_window() {
    assert_eq!(slots("0 0 * * *"), vec![0]);
    assert_eq!(slots("59 23 * * *"), vec![1439]);
}

#[test]
fn step_minutes_fill_every_hour() {
    let s = slots("*/15 * * * *");
    assert_eq!(s.len(), 96);
    assert_eq!(&s[..3], &[0, 15, 30]);
    assert_eq!(*s.last().unwrap(), 23 * 60 + 45);
}

#[test]
fn duration_is_only_applied_when_reflected() {
    let plain = expand("0 * * * *", Some(120.0), false, monday()).unwrap();
    assert_eq!(plain.len(), 24);

    let reflected = expand("0 * * * *", Some(120.0), true, monday()).unwrap();
    assert_eq!(reflected.len(), 48);
    assert_eq!(&reflected[..4], &[0, 1, 60, 61]);
}

#[test]
fn spillover_past_midnight_is_dropped() {
    let s = expand("59 23 * * *", Some(300.0), true, monday()).unwrap();
    assert_eq!(s, vec![1439]);
}

#[test]
fn overlapping_occurrences_produce_duplicates() {
    let s = expand("*/2 * * * *", Some(180.0), true, monday()).unwrap();
    assert_eq!(s.iter().filter(|&&slot| slot == 2).count(), 2);
    // 720 triggers x 3 minutes, minus the one minute past 23:59.
    assert_eq!(s.len(), 720 * 3 - 1);
}

#[test]
fn hour_ranges_with_steps() {
    let s = slots("0 1-23/2 * * *");
    assert_eq!(s.len(), 12);
    assert_eq!(s[0], 60);
    assert_eq!(s[1], 180);
}

#[test]
fn explicit_lists_and_ranges() {
    assert_eq!(slots("0,30 9-10 * * *"), vec![540, 570, 600, 630]);
}

#[test]
fn day_fields_filter_the_reference_day() {
    assert_eq!(slots("0 9 * * 1"), vec![540]);
    assert_eq!(slots("0 9 * * 1-5"), vec![540]);
    assert!(slots("0 9 * * 0").is_empty());
    assert!(slots("0 9 * * 7").is_empty());
    assert!(slots("0 9 * * 2-6").is_empty());
    assert_eq!(slots("0 9 * * Mon"), vec![540]);
    assert_eq!(slots("0 0 1 1 *"), vec![0]);
    assert!(slots("0 0 2 * *").is_empty());
    assert!(slots("0 0 * 2 *").is_empty());
}

#[test]
fn restricted_day_fields_match_either_day() {
    let day = tuesday_the_12th();
    // Day-of-month matches, day-of-week does not.
    assert_eq!(expand("0 9 12 * 1", None, false, day).unwrap(), vec![540]);
    // Day-of-week matches, day-of-month does not.
    assert_eq!(expand("0 9 1 * 2", None, false, day).unwrap(), vec![540]);
    // Both match: no duplicate triggers.
    assert_eq!(expand("0 9 12 * 2", None, false, day).unwrap(), vec![540]);
    assert!(expand("0 9 13 * 3", None, false, day).unwrap().is_empty());
}

#[test]
fn restricted_day_fields_on_the_fast_path() {
    let day = tuesday_the_12th();
    assert_eq!(expand("*/30 9 12 * 1", None, false, day).unwrap(), vec![540, 570]);
    assert_eq!(expand("15 9-10 1 * Tue", None, false, day).unwrap(), vec![555, 615]);

    let mut expander = ScheduleExpander::new(day);
    for schedule in ["*/30 9 12 * 1", "0 */6 1,15 * 2", "7 8 12 3 0"] {
        let fast = expander.starts(schedule).unwrap().to_vec();
        let full = expand_triggers(schedule, day).unwrap();
        assert_eq!(fast, full, "schedule {schedule}");
    }
}

#[test]
fn starred_day_steps_do_not_widen_the_match() {
    let day = tuesday_the_12th();
    // `*/2` day-of-month counts as unrestricted, so both fields must match.
    assert!(expand("0 9 */2 * 2", None, false, day).unwrap().is_empty());
    assert_eq!(expand("0 9 2/2 * 2", None, false, day).unwrap(), vec![540]);
}

#[test]
fn fast_path_matches_full_expansion() {
    let mut expander = ScheduleExpander::new(monday());
    for schedule in ["5/20 3 * * *", "*/7 */4 * * *", "42 1-23/2 * * 1-5", "0 * * * 0"] {
        let fast = expander.starts(schedule).unwrap().to_vec();
        let full = expand_triggers(schedule, monday()).unwrap();
        assert_eq!(fast, full, "schedule {schedule}");
    }
}

#[test]
fn invalid_schedules_are_errors_not_panics() {
    let day = monday();
    assert_eq!(
        expand("not-a-valid-cron", None, false, day),
        Err(ScheduleError::FieldCount { found: 1 })
    );
    assert!(matches!(
        expand("61 * * * *", None, false, day),
        Err(ScheduleError::Cron { .. })
    ));
    assert!(matches!(
        expand("*/5 25 * * *", None, false, day),
        Err(ScheduleError::Cron { .. })
    ));
}

#[test]
fn fast_path_errors_name_the_original_schedule() {
    let err = expand("*/5 * * * banana", None, false, monday()).unwrap_err();
    match err {
        ScheduleError::Cron { schedule, .. } => assert_eq!(schedule, "*/5 * * * banana"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn minute_steps_of_an_hour_or_more_follow_the_cron_parser() {
    let day = monday();
    let mut expander = ScheduleExpander::new(day);
    for schedule in ["*/90 * * * *", "5/75 3 * * *"] {
        let fast = expander.starts(schedule).map(|s| s.to_vec());
        let full = expand_triggers(schedule, day);
        assert_eq!(fast, full, "schedule {schedule}");
    }
    assert!(matches!(
        expand("*/90 * * * *", None, false, day),
        Err(ScheduleError::Cron { .. })
    ));
}

#[test]
fn last_and_nth_weekday_forms_are_unsupported() {
    for schedule in ["0 0 * * 5L", "0 0 * * 1#2"] {
        assert!(
            matches!(
                expand(schedule, None, false, monday()),
                Err(ScheduleError::Cron { .. })
            ),
            "schedule {schedule}"
        );
    }
}

#[test]
fn cache_returns_identical_results() {
    let mut expander = ScheduleExpander::new(monday());
    let first = expander.coverage("*/10 * * * *", 3).unwrap();
    let second = expander.coverage("*/10 * * * *", 3).unwrap();
    assert!(std::rc::Rc::ptr_eq(&first, &second));
    assert_eq!(first.len(), 144 * 3);
}

//! Cron normalization and trigger enumeration over the reference day.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use cron::Schedule;

use cronspread_core::{slot_of, Slot};

use super::error::ScheduleError;

/// The single day over which schedules are expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReferenceDay {
    date: NaiveDate,
}

impl ReferenceDay {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    /// Today's date in UTC.
    pub fn today() -> Self {
        Self::new(Utc::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Trigger window: one minute before midnight through 23:59:59.999.
    ///
    /// Iteration is exclusive of the lower bound, so the pre-midnight start is
    /// what lets a 00:00 trigger be seen.
    pub(crate) fn window(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let midnight = Utc.from_utc_datetime(&self.date.and_time(NaiveTime::MIN));
        (
            midnight - Duration::minutes(1),
            midnight + Duration::days(1) - Duration::milliseconds(1),
        )
    }
}

impl From<NaiveDate> for ReferenceDay {
    fn from(date: NaiveDate) -> Self {
        Self::new(date)
    }
}

/// Normalize a 5-field cron expression to the 6-field form the `cron` crate expects.
///
/// A `0` seconds field is prepended and numeric day-of-week items are rewritten
/// from standard numbering (0 or 7 = Sunday) into the crate's ordinals
/// (1 = Sunday).
pub(crate) fn normalize_cron(expr: &str) -> Result<String, ScheduleError> {
    let fields: Vec<&str> = expr.split_whitespace().collect();
    if fields.len() != 5 {
        return Err(ScheduleError::FieldCount {
            found: fields.len(),
        });
    }
    Ok(format!(
        "0 {} {} {} {} {}",
        fields[0],
        fields[1],
        fields[2],
        fields[3],
        translate_day_of_week(fields[4])
    ))
}

/// Rewrite numeric day-of-week items into `cron` crate ordinals.
///
/// Items the rewrite does not understand (names, malformed text) pass through
/// verbatim so the crate's parser reports them.
pub(crate) fn translate_day_of_week(field: &str) -> String {
    if field == "*" || field == "?" {
        return field.to_string();
    }

    let mut days = BTreeSet::new();
    let mut verbatim = Vec::new();
    for item in field.split(',') {
        match expand_weekday_item(item) {
            Some(expanded) => days.extend(expanded),
            None => verbatim.push(item.to_string()),
        }
    }

    days.into_iter()
        .map(|day| (day + 1).to_string())
        .chain(verbatim)
        .collect::<Vec<_>>()
        .join(",")
}

/// Expand one `N`, `N-M`, `*/S`, `N/S` or `N-M/S` item into standard weekdays `0..=6`.
fn expand_weekday_item(item: &str) -> Option<Vec<u32>> {
    let (range, step) = match item.split_once('/') {
        Some((range, step)) => (range, Some(parse_digits(step)?)),
        None => (item, None),
    };
    if step == Some(0) {
        return None;
    }

    let (start, end) = if range == "*" {
        (0, 6)
    } else if let Some((a, b)) = range.split_once('-') {
        (parse_digits(a)?, parse_digits(b)?)
    } else {
        let value = parse_digits(range)?;
        // `N/S` runs from N to Saturday.
        match step {
            Some(_) => (value, 6),
            None => (value, value),
        }
    };
    if start > end || end > 7 {
        return None;
    }

    let step = step.unwrap_or(1) as usize;
    Some((start..=end).step_by(step).map(|day| day % 7).collect())
}

fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Minute-of-day of every trigger of a 5-field expression on the reference day, ascending.
///
/// When both day-of-month and day-of-week are restricted, a day matches if
/// either field does. The `cron` crate requires both, so each day field is
/// expanded on its own and the triggers are merged.
pub(crate) fn expand_triggers(expr: &str, day: ReferenceDay) -> Result<Vec<Slot>, ScheduleError> {
    let fields: Vec<&str> = expr.split_whitespace().collect();
    if fields.len() != 5 || !(restricted(fields[2]) && restricted(fields[4])) {
        return triggers_of(expr, expr, day);
    }

    let by_month_day = format!("{} {} {} {} *", fields[0], fields[1], fields[2], fields[3]);
    let by_week_day = format!("{} {} * {} {}", fields[0], fields[1], fields[3], fields[4]);
    let mut slots: BTreeSet<Slot> = triggers_of(&by_month_day, expr, day)?.into_iter().collect();
    slots.extend(triggers_of(&by_week_day, expr, day)?);
    Ok(slots.into_iter().collect())
}

/// A day field is restricted unless it is `?` or starts with `*`.
fn restricted(field: &str) -> bool {
    field != "?" && !field.starts_with('*')
}

/// Triggers of `expr`, with parse errors attributed to `original`.
fn triggers_of(expr: &str, original: &str, day: ReferenceDay) -> Result<Vec<Slot>, ScheduleError> {
    let normalized = normalize_cron(expr)?;
    let schedule = Schedule::from_str(&normalized).map_err(|e| ScheduleError::Cron {
        schedule: original.to_string(),
        message: e.to_string(),
    })?;

    let (start, end) = day.window();
    Ok(schedule
        .after(&start)
        .take_while(|t| *t <= end)
        .map(|t| slot_of(t.hour() as usize, t.minute() as usize))
        .collect())
}

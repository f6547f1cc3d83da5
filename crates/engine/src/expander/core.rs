//! [`ScheduleExpander`]: memoized schedule-to-slot expansion for one call.

use std::collections::HashMap;
use std::rc::Rc;

use cronspread_core::{slot_of, Slot, MINUTES_PER_DAY, MINUTES_PER_HOUR};

use super::cron::{expand_triggers, ReferenceDay};
use super::error::ScheduleError;

type Cached<T> = Result<Rc<[T]>, ScheduleError>;

/// Expands cron expressions into minute-of-day slots on a fixed reference day.
///
/// Results are memoized by schedule string (and duration for coverage). An
/// expander is meant to live for exactly one accumulator or optimizer call; it
/// holds no state that matters for correctness.
pub struct ScheduleExpander {
    day: ReferenceDay,
    /// Active hours keyed by the four fields after the minute field.
    hours: HashMap<String, Cached<usize>>,
    /// Trigger slots keyed by schedule.
    starts: HashMap<String, Cached<Slot>>,
    /// Covered slots keyed by (schedule, duration in minutes).
    coverage: HashMap<(String, usize), Cached<Slot>>,
}

impl ScheduleExpander {
    pub fn new(day: ReferenceDay) -> Self {
        Self {
            day,
            hours: HashMap::new(),
            starts: HashMap::new(),
            coverage: HashMap::new(),
        }
    }

    pub fn day(&self) -> ReferenceDay {
        self.day
    }

    /// Trigger minutes of `schedule`, ascending and distinct.
    pub fn starts(&mut self, schedule: &str) -> Result<Rc<[Slot]>, ScheduleError> {
        if let Some(hit) = self.starts.get(schedule) {
            return hit.clone();
        }
        let computed: Cached<Slot> = self.compute_starts(schedule).map(Rc::from);
        self.starts.insert(schedule.to_string(), computed.clone());
        computed
    }

    /// Every minute covered by `schedule` when each occurrence lasts
    /// `duration` minutes. Minutes past 23:59 are dropped, not wrapped.
    pub fn coverage(&mut self, schedule: &str, duration: usize) -> Result<Rc<[Slot]>, ScheduleError> {
        let key = (schedule.to_string(), duration);
        if let Some(hit) = self.coverage.get(&key) {
            return hit.clone();
        }
        let computed: Cached<Slot> = self.starts(schedule).map(|starts| {
            starts
                .iter()
                .flat_map(|&start| start..(start + duration.max(1)).min(MINUTES_PER_DAY))
                .collect::<Vec<_>>()
                .into()
        });
        self.coverage.insert(key, computed.clone());
        computed
    }

    fn compute_starts(&mut self, schedule: &str) -> Result<Vec<Slot>, ScheduleError> {
        let fields: Vec<&str> = schedule.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(ScheduleError::FieldCount {
                found: fields.len(),
            });
        }

        // Minute fields that are a plain value or a step only shift the
        // trigger within each active hour, so the hours can be shared.
        if let Some(minutes) = simple_minutes(fields[0]) {
            let rest = fields[1..].join(" ");
            let hours = self
                .active_hours(&rest)
                .map_err(|e| e.for_schedule(schedule))?;
            return Ok(hours
                .iter()
                .flat_map(|&hour| minutes.iter().map(move |&minute| slot_of(hour, minute)))
                .collect());
        }

        expand_triggers(schedule, self.day)
    }

    fn active_hours(&mut self, rest: &str) -> Result<Rc<[usize]>, ScheduleError> {
        if let Some(hit) = self.hours.get(rest) {
            return hit.clone();
        }
        let computed: Cached<usize> = expand_triggers(&format!("0 {rest}"), self.day).map(|slots| {
            slots
                .into_iter()
                .map(|slot| slot / MINUTES_PER_HOUR)
                .collect::<Vec<_>>()
                .into()
        });
        self.hours.insert(rest.to_string(), computed.clone());
        computed
    }
}

/// Minutes selected by an `N`, `*/S` or `N/S` minute field; `None` for anything else.
fn simple_minutes(field: &str) -> Option<Vec<usize>> {
    let number = |s: &str| -> Option<usize> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse().ok()
    };

    match field.split_once('/') {
        Some((offset, step)) => {
            let offset = if offset == "*" { 0 } else { number(offset)? };
            let step = number(step)?;
            // Steps of an hour or more are left to the cron parser, which may reject them.
            if step == 0 || step >= MINUTES_PER_HOUR || offset >= MINUTES_PER_HOUR {
                return None;
            }
            Some((offset..MINUTES_PER_HOUR).step_by(step).collect())
        }
        None => {
            let minute = number(field)?;
            (minute < MINUTES_PER_HOUR).then(|| vec![minute])
        }
    }
}

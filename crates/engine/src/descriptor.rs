//! Schedule pattern classification for the optimizers.
//!
//! Each job's minute and hour fields are classified once into a
//! [`ScheduleDescriptor`]. The descriptor decides which alternative phases are
//! legal and which group the job competes in.

use cronspread_core::{HOURS_PER_DAY, MINUTES_PER_DAY, MINUTES_PER_HOUR};

const MAX_MINUTE: u32 = 59;
const MAX_HOUR: u32 = 23;

/// Pattern shape of a schedule's minute/hour fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleDescriptor {
    /// Anything the optimizers will not reinterpret.
    Fixed,
    /// `N/S` or `*/S` minutes; `rest` is the remaining four fields.
    MinuteStep {
        offset: u32,
        step: u32,
        rest: String,
    },
    /// A single minute on a stepped hour field (`*/S`, `N/S` or `A-B/S`),
    /// normalized to `base/step` with `base < step`.
    HourStep {
        minute: u32,
        base: u32,
        step: u32,
        hour_field: String,
        tail: String,
    },
    /// A single minute at a single hour.
    Daily { minute: u32, hour: u32, tail: String },
}

/// Jobs with equal keys compete for distinct phases.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    MinuteStep { step: u32, rest: String },
    HourStep { step: u32, tail: String },
    Daily { tail: String },
}

/// One legal placement for a movable job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub phase: u32,
    pub schedule: String,
}

impl ScheduleDescriptor {
    pub fn classify(schedule: &str) -> Self {
        let parts: Vec<&str> = schedule.split_whitespace().collect();
        let [minute, hour, tail @ ..] = parts.as_slice() else {
            return ScheduleDescriptor::Fixed;
        };
        if parts.len() != 5 {
            return ScheduleDescriptor::Fixed;
        }
        let tail = tail.join(" ");

        if let Some((offset, step)) = parse_step(minute, MAX_MINUTE) {
            return ScheduleDescriptor::MinuteStep {
                offset,
                step,
                rest: format!("{hour} {tail}"),
            };
        }

        let Some(minute) = parse_number(minute, MAX_MINUTE) else {
            return ScheduleDescriptor::Fixed;
        };

        if let Some((base, step)) = parse_hour_step(hour) {
            if step as usize <= HOURS_PER_DAY && base < step {
                return ScheduleDescriptor::HourStep {
                    minute,
                    base,
                    step,
                    hour_field: hour.to_string(),
                    tail,
                };
            }
        }

        match parse_number(hour, MAX_HOUR) {
            Some(hour) => ScheduleDescriptor::Daily { minute, hour, tail },
            None => ScheduleDescriptor::Fixed,
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, ScheduleDescriptor::Fixed)
    }

    pub fn group_key(&self) -> Option<GroupKey> {
        match self {
            ScheduleDescriptor::Fixed => None,
            ScheduleDescriptor::MinuteStep { step, rest, .. } => Some(GroupKey::MinuteStep {
                step: *step,
                rest: rest.clone(),
            }),
            ScheduleDescriptor::HourStep { step, tail, .. } => Some(GroupKey::HourStep {
                step: *step,
                tail: tail.clone(),
            }),
            ScheduleDescriptor::Daily { tail, .. } => Some(GroupKey::Daily { tail: tail.clone() }),
        }
    }

    /// Current phase: offset within the step for minute steps, otherwise the
    /// minute of the (first) hour the job fires in.
    pub fn phase(&self) -> Option<u32> {
        match self {
            ScheduleDescriptor::Fixed => None,
            ScheduleDescriptor::MinuteStep { offset, step, .. } => Some(offset % step),
            ScheduleDescriptor::HourStep {
                minute, base, step, ..
            } => Some((base % step) * MINUTES_PER_HOUR as u32 + minute),
            ScheduleDescriptor::Daily { minute, hour, .. } => {
                Some(hour * MINUTES_PER_HOUR as u32 + minute)
            }
        }
    }

    /// Number of legal phases.
    pub fn domain_size(&self) -> usize {
        match self {
            ScheduleDescriptor::Fixed => 0,
            ScheduleDescriptor::MinuteStep { step, .. } => (*step as usize).min(MINUTES_PER_HOUR),
            ScheduleDescriptor::HourStep { step, .. } => *step as usize * MINUTES_PER_HOUR,
            ScheduleDescriptor::Daily { .. } => MINUTES_PER_DAY,
        }
    }

    /// Every legal placement, in ascending phase order.
    pub fn candidates(&self) -> Vec<Candidate> {
        match self {
            ScheduleDescriptor::Fixed => Vec::new(),
            ScheduleDescriptor::MinuteStep { step, rest, .. } => (0..*step)
                .take(MINUTES_PER_HOUR)
                .map(|offset| Candidate {
                    phase: offset,
                    schedule: format!("{offset}/{step} {rest}"),
                })
                .collect(),
            ScheduleDescriptor::HourStep {
                step,
                hour_field,
                tail,
                ..
            } => (0..*step)
                .flat_map(|base| {
                    let hours = format_hour_field(base, *step, hour_field);
                    (0..MINUTES_PER_HOUR as u32).map(move |minute| Candidate {
                        phase: base * MINUTES_PER_HOUR as u32 + minute,
                        schedule: format!("{minute} {hours} {tail}"),
                    })
                })
                .collect(),
            ScheduleDescriptor::Daily { tail, .. } => (0..HOURS_PER_DAY as u32)
                .flat_map(|hour| {
                    (0..MINUTES_PER_HOUR as u32).map(move |minute| Candidate {
                        phase: hour * MINUTES_PER_HOUR as u32 + minute,
                        schedule: format!("{minute} {hour} {tail}"),
                    })
                })
                .collect(),
        }
    }
}

// ── Field parsing ───────────────────────────────────────────────────

fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Plain value in `0..=max`.
fn parse_number(field: &str, max: u32) -> Option<u32> {
    parse_digits(field).filter(|&v| v <= max)
}

/// `*/S` or `N/S` with `N <= limit` and `S >= 1`; `*` counts as offset 0.
fn parse_step(field: &str, limit: u32) -> Option<(u32, u32)> {
    let (base, step) = field.split_once('/')?;
    let base = if base == "*" { 0 } else { parse_digits(base)? };
    let step = parse_digits(step)?;
    if step == 0 || base > limit {
        return None;
    }
    Some((base, step))
}

/// Hour step, accepting `A-B/S` and normalizing it to `A % S` as the base.
fn parse_hour_step(field: &str) -> Option<(u32, u32)> {
    if let Some(simple) = parse_step(field, MAX_HOUR) {
        return Some(simple);
    }
    let (range, step) = field.split_once('/')?;
    let (start, end) = range.split_once('-')?;
    let (start, end, step) = (parse_digits(start)?, parse_digits(end)?, parse_digits(step)?);
    if step == 0 || start > MAX_HOUR || end > MAX_HOUR || start > end {
        return None;
    }
    Some((start % step, step))
}

/// Render the hour field for a candidate base, keeping the job's own spelling
/// (`*`, `*/S`) where it still means the same thing.
fn format_hour_field(base: u32, step: u32, raw: &str) -> String {
    if base != 0 {
        return format!("{base}/{step}");
    }
    if step == 1 || matches!(raw, "*" | "*/1" | "0/1") {
        return "*".to_string();
    }
    if raw.starts_with("*/") {
        return format!("*/{step}");
    }
    format!("0/{step}")
}

//! Offset Optimizer: spreads `*/S` jobs that share a step and the remaining
//! fields across the offsets `0..min(S, 60)`.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use tracing::debug;

use cronspread_core::{Job, OccupancyGrid, MINUTES_PER_HOUR};

use super::{footprints, Placement, Suggestion};
use crate::expander::{ReferenceDay, ScheduleExpander};

/// `(step, remaining four fields)`.
type StepGroup = (u32, String);

pub fn suggest_spread(jobs: &[Job], day: ReferenceDay) -> Suggestion {
    let mut expander = ScheduleExpander::new(day);
    let (footprints, warnings) = footprints(jobs, &mut expander);

    let mut grid = OccupancyGrid::new();
    for footprint in footprints.iter().flatten() {
        grid.add_slots(&footprint.slots);
    }

    // Groups keep first-appearance order so results do not depend on hashing.
    let mut groups: IndexMap<StepGroup, Vec<usize>> = IndexMap::new();
    for (index, job) in jobs.iter().enumerate() {
        let occupied = footprints[index]
            .as_ref()
            .is_some_and(|f| f.occurrences > 0);
        if job.pinned || !occupied {
            continue;
        }
        if let Some(key) = unphased_step(&job.schedule) {
            groups.entry(key).or_default().push(index);
        }
    }

    let mut revised = jobs.to_vec();
    for ((step, rest), members) in &groups {
        for footprint in members.iter().filter_map(|&i| footprints[i].as_ref()) {
            grid.remove_slots(&footprint.slots);
        }

        let limit = (*step).min(MINUTES_PER_HOUR as u32);
        let mut used = BTreeSet::new();
        for (position, &index) in members.iter().enumerate() {
            let Some(current) = footprints[index].as_ref() else {
                continue;
            };
            let job = &jobs[index];
            let duration = job.duration_minutes();
            let guess = even_spread(position, members.len(), *step);

            let mut best: Option<(u64, Placement)> = None;
            'search: for delta in 0..limit {
                let below = guess.checked_sub(delta).filter(|_| delta > 0);
                for offset in std::iter::once(guess + delta).chain(below) {
                    if offset >= limit || used.contains(&offset) {
                        continue;
                    }
                    let schedule = format!("{offset}/{step} {rest}");
                    let Ok(slots) = expander.coverage(&schedule, duration) else {
                        continue;
                    };
                    if slots.len() != current.slots.len() {
                        continue;
                    }
                    let score = grid.score(&slots);
                    let better = best.as_ref().map_or(true, |(best_score, placement)| {
                        score < *best_score || (score == *best_score && offset < placement.phase)
                    });
                    if better {
                        best = Some((
                            score,
                            Placement {
                                phase: offset,
                                schedule,
                                slots,
                            },
                        ));
                        if score == 0 {
                            break 'search;
                        }
                    }
                }
            }

            match best {
                Some((score, placement)) => {
                    grid.add_slots(&placement.slots);
                    used.insert(placement.phase);
                    debug!(
                        job = %job.name,
                        from = %job.schedule,
                        to = %placement.schedule,
                        score,
                        "offset assigned"
                    );
                    revised[index].schedule = placement.schedule;
                }
                None => grid.add_slots(&current.slots),
            }
        }
    }

    Suggestion {
        jobs: revised,
        warnings,
    }
}

/// Seed offset for member `position` of `len`, evenly spaced over `[0, step)`.
fn even_spread(position: usize, len: usize, step: u32) -> u32 {
    if len <= 1 {
        return 0;
    }
    let spread = position as u64 * u64::from(step - 1) / (len as u64 - 1);
    spread as u32
}

/// `*/S` minute field with exactly four fields after it.
fn unphased_step(schedule: &str) -> Option<StepGroup> {
    let mut fields = schedule.split_whitespace();
    let step = fields.next()?.strip_prefix("*/")?;
    if !step.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let step: u32 = step.parse().ok().filter(|&s| s > 0)?;
    let rest: Vec<&str> = fields.collect();
    (rest.len() == 4).then(|| (step, rest.join(" ")))
}

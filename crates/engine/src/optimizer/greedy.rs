//! Aggressive Optimizer: classify every job, fold the fixed set into the grid,
//! then place movable jobs one by one on their least crowded legal phase.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use cronspread_core::{Job, OccupancyGrid};

use super::{footprints, Footprint, Placement, Suggestion};
use crate::descriptor::{GroupKey, ScheduleDescriptor};
use crate::expander::{ReferenceDay, ScheduleExpander};

/// Phases already taken within each group.
type UsedPhases = HashMap<GroupKey, BTreeSet<u32>>;

pub fn suggest_aggressive_spread(jobs: &[Job], day: ReferenceDay) -> Suggestion {
    let mut expander = ScheduleExpander::new(day);
    let (footprints, warnings) = footprints(jobs, &mut expander);
    let descriptors: Vec<ScheduleDescriptor> = jobs
        .iter()
        .map(|job| ScheduleDescriptor::classify(&job.schedule))
        .collect();

    let mut grid = OccupancyGrid::new();
    let mut used = UsedPhases::new();
    let mut movable = Vec::new();

    for (index, job) in jobs.iter().enumerate() {
        // Unparseable schedules take no part at all.
        let Some(footprint) = footprints[index].as_ref() else {
            continue;
        };
        let descriptor = &descriptors[index];
        if job.pinned || descriptor.is_fixed() || footprint.occurrences == 0 {
            grid.add_slots(&footprint.slots);
            reserve(&mut used, descriptor);
        } else {
            movable.push(index);
        }
    }

    // Longest first, then the most constrained, then stable by name/position.
    movable.sort_by(|&a, &b| {
        jobs[b]
            .duration_minutes()
            .cmp(&jobs[a].duration_minutes())
            .then_with(|| descriptors[a].domain_size().cmp(&descriptors[b].domain_size()))
            .then_with(|| occurrences(&footprints, a).cmp(&occurrences(&footprints, b)))
            .then_with(|| jobs[a].name.cmp(&jobs[b].name))
            .then_with(|| a.cmp(&b))
    });

    let mut revised = jobs.to_vec();
    for index in movable {
        let job = &jobs[index];
        let descriptor = &descriptors[index];
        let Some(current) = footprints[index].as_ref() else {
            continue;
        };
        let Some(key) = descriptor.group_key() else {
            grid.add_slots(&current.slots);
            continue;
        };

        let taken = used.get(&key);
        let duration = job.duration_minutes();
        let mut best: Option<(u64, bool, Placement)> = None;
        for candidate in descriptor.candidates() {
            let Ok(slots) = expander.coverage(&candidate.schedule, duration) else {
                continue;
            };
            if slots.len() != current.slots.len() {
                continue;
            }
            let score = grid.score(&slots);
            let penalized = taken.is_some_and(|phases| phases.contains(&candidate.phase));
            let better = best.as_ref().map_or(true, |(best_score, best_penalized, placement)| {
                (score, penalized, candidate.phase, candidate.schedule.as_str())
                    < (
                        *best_score,
                        *best_penalized,
                        placement.phase,
                        placement.schedule.as_str(),
                    )
            });
            if better {
                let settled = score == 0 && !penalized;
                best = Some((
                    score,
                    penalized,
                    Placement {
                        phase: candidate.phase,
                        schedule: candidate.schedule,
                        slots,
                    },
                ));
                if settled {
                    break;
                }
            }
        }

        let Some((score, _, placement)) = best else {
            grid.add_slots(&current.slots);
            continue;
        };
        grid.add_slots(&placement.slots);
        used.entry(key).or_default().insert(placement.phase);
        debug!(
            job = %job.name,
            from = %job.schedule,
            to = %placement.schedule,
            score,
            "phase assigned"
        );
        revised[index].schedule = placement.schedule;
    }

    Suggestion {
        jobs: revised,
        warnings,
    }
}

fn reserve(used: &mut UsedPhases, descriptor: &ScheduleDescriptor) {
    if let (Some(key), Some(phase)) = (descriptor.group_key(), descriptor.phase()) {
        used.entry(key).or_default().insert(phase);
    }
}

fn occurrences(footprints: &[Option<Footprint>], index: usize) -> usize {
    footprints[index].as_ref().map_or(0, |f| f.occurrences)
}

//! Schedule revision.
//!
//! Both optimizers take the same input and always return a complete job list
//! in input order. Jobs they cannot reinterpret are passed through untouched.

mod greedy;
mod offset;


use std::rc::Rc;

use tracing::info;

use cronspread_core::{Job, OptimizerKind, ScheduleWarning, Slot};

use crate::expander::{schedule_warning, ReferenceDay, ScheduleExpander};

pub use self::greedy::suggest_aggressive_spread;
pub use self::offset::suggest_spread;

/// Revised job list plus the schedules that could not be read.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub jobs: Vec<Job>,
    pub warnings: Vec<ScheduleWarning>,
}

impl Suggestion {
    /// Number of jobs whose schedule differs from `original` (paired by position).
    pub fn moved(&self, original: &[Job]) -> usize {
        self.jobs
            .iter()
            .zip(original)
            .filter(|(revised, original)| revised.schedule != original.schedule)
            .count()
    }
}

/// A schedule revision strategy.
pub trait Optimizer {
    fn name(&self) -> &'static str;

    fn optimize(&self, jobs: &[Job]) -> Suggestion;
}

/// Spreads unphased `*/S` jobs across the offsets of their shared step.
#[derive(Debug, Clone, Copy)]
pub struct OffsetOptimizer {
    day: ReferenceDay,
}

impl OffsetOptimizer {
    pub fn new(day: ReferenceDay) -> Self {
        Self { day }
    }
}

impl Optimizer for OffsetOptimizer {
    fn name(&self) -> &'static str {
        "offset"
    }

    fn optimize(&self, jobs: &[Job]) -> Suggestion {
        let suggestion = suggest_spread(jobs, self.day);
        log_outcome(self.name(), jobs, &suggestion);
        suggestion
    }
}

/// Greedily moves every movable job to its least crowded legal phase.
#[derive(Debug, Clone, Copy)]
pub struct GreedyOptimizer {
    day: ReferenceDay,
}

impl GreedyOptimizer {
    pub fn new(day: ReferenceDay) -> Self {
        Self { day }
    }
}

impl Optimizer for GreedyOptimizer {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn optimize(&self, jobs: &[Job]) -> Suggestion {
        let suggestion = suggest_aggressive_spread(jobs, self.day);
        log_outcome(self.name(), jobs, &suggestion);
        suggestion
    }
}

pub fn optimizer_for(kind: OptimizerKind, day: ReferenceDay) -> Box<dyn Optimizer> {
    match kind {
        OptimizerKind::Offset => Box::new(OffsetOptimizer::new(day)),
        OptimizerKind::Greedy => Box::new(GreedyOptimizer::new(day)),
    }
}

fn log_outcome(optimizer: &str, jobs: &[Job], suggestion: &Suggestion) {
    info!(
        optimizer,
        moved = suggestion.moved(jobs),
        total = jobs.len(),
        skipped = suggestion.warnings.len(),
        "schedule suggestion ready"
    );
}

// ── Shared per-call state ───────────────────────────────────────────

/// A job's expansion under its current schedule, duration always reflected.
#[derive(Debug, Clone)]
pub(crate) struct Footprint {
    pub occurrences: usize,
    pub slots: Rc<[Slot]>,
}

/// Expand every job once. `None` marks an unparseable schedule, which is
/// reported and excluded from occupancy and optimization.
pub(crate) fn footprints(
    jobs: &[Job],
    expander: &mut ScheduleExpander,
) -> (Vec<Option<Footprint>>, Vec<ScheduleWarning>) {
    let mut warnings = Vec::new();
    let footprints = jobs
        .iter()
        .map(|job| {
            let expanded = expander.starts(&job.schedule).and_then(|starts| {
                let slots = expander.coverage(&job.schedule, job.duration_minutes())?;
                Ok(Footprint {
                    occurrences: starts.len(),
                    slots,
                })
            });
            match expanded {
                Ok(footprint) => Some(footprint),
                Err(e) => {
                    warnings.push(schedule_warning(job, &e));
                    None
                }
            }
        })
        .collect();
    (footprints, warnings)
}

/// Best placement found so far for one job.
#[derive(Debug, Clone)]
pub(crate) struct Placement {
    pub phase: u32,
    pub schedule: String,
    pub slots: Rc<[Slot]>,
}

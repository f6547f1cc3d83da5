//! Minute-of-day slots and the fixed 24×60 grids built over them.

use serde::{Deserialize, Serialize};

pub const HOURS_PER_DAY: usize = 24;
pub const MINUTES_PER_HOUR: usize = 60;
pub const MINUTES_PER_DAY: usize = HOURS_PER_DAY * MINUTES_PER_HOUR;

/// Highest level produced by normalization.
pub const MAX_INTENSITY: u8 = 9;

/// Minute of the reference day, always in `[0, MINUTES_PER_DAY)`.
pub type Slot = usize;

pub fn slot_of(hour: usize, minute: usize) -> Slot {
    hour * MINUTES_PER_HOUR + minute
}

// ── Raw occupancy ─────────────────────────────────────────────

/// Number of job occurrences covering each minute of the reference day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyGrid {
    counts: Vec<u32>,
}

impl OccupancyGrid {
    pub fn new() -> Self {
        Self {
            counts: vec![0; MINUTES_PER_DAY],
        }
    }

    pub fn get(&self, slot: Slot) -> u32 {
        self.counts.get(slot).copied().unwrap_or(0)
    }

    pub fn add_slots(&mut self, slots: &[Slot]) {
        for &slot in slots {
            debug_assert!(slot < MINUTES_PER_DAY, "slot {slot} out of range");
            if let Some(count) = self.counts.get_mut(slot) {
                *count += 1;
            }
        }
    }

    /// Take a job's contribution back out. Counts never drop below zero.
    pub fn remove_slots(&mut self, slots: &[Slot]) {
        for &slot in slots {
            if let Some(count) = self.counts.get_mut(slot) {
                debug_assert!(*count > 0, "removing slot {slot} that was never added");
                *count = count.saturating_sub(1);
            }
        }
    }

    /// Sum of the current occupancy over `slots`.
    pub fn score(&self, slots: &[Slot]) -> u64 {
        slots.iter().map(|&slot| u64::from(self.get(slot))).sum()
    }

    /// Sum over the whole day.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }

    pub fn max_value(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Smallest non-zero count, or 0 when the grid is empty.
    pub fn min_nonzero(&self) -> u32 {
        self.counts
            .iter()
            .copied()
            .filter(|&c| c > 0)
            .min()
            .unwrap_or(0)
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// One row of 60 minutes per hour.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.counts.chunks(MINUTES_PER_HOUR)
    }
}

impl Default for OccupancyGrid {
    fn default() -> Self {
        Self::new()
    }
}

// ── Normalized intensity ──────────────────────────────────────

/// Occupancy rescaled into `0..=MAX_INTENSITY`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntensityGrid {
    levels: Vec<u8>,
}

impl IntensityGrid {
    pub fn from_fn(mut level_at: impl FnMut(Slot) -> u8) -> Self {
        Self {
            levels: (0..MINUTES_PER_DAY)
                .map(|slot| level_at(slot).min(MAX_INTENSITY))
                .collect(),
        }
    }

    pub fn get(&self, slot: Slot) -> u8 {
        self.levels.get(slot).copied().unwrap_or(0)
    }

    pub fn levels(&self) -> &[u8] {
        &self.levels
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.levels.chunks(MINUTES_PER_HOUR)
    }
}

// ── Contributions ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionStatus {
    /// The cron-triggered minute of an occurrence.
    Starting,
    /// A later minute covered only by the estimated duration.
    Continuing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub name: String,
    pub status: ContributionStatus,
}

/// Per-slot list of contributing jobs, in accumulation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionGrid {
    cells: Vec<Vec<Contribution>>,
}

impl ContributionGrid {
    pub fn new() -> Self {
        Self {
            cells: vec![Vec::new(); MINUTES_PER_DAY],
        }
    }

    pub fn push(&mut self, slot: Slot, name: &str, status: ContributionStatus) {
        if let Some(cell) = self.cells.get_mut(slot) {
            cell.push(Contribution {
                name: name.to_string(),
                status,
            });
        }
    }

    pub fn at(&self, slot: Slot) -> &[Contribution] {
        self.cells.get(slot).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for ContributionGrid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove_are_symmetric() {
        let mut grid = OccupancyGrid::new();
        grid.add_slots(&[0, 0, 5, 1439]);
        assert_eq!(grid.get(0), 2);
        assert_eq!(grid.total(), 4);
        assert_eq!(grid.max_value(), 2);
        assert_eq!(grid.min_nonzero(), 1);

        grid.remove_slots(&[0, 5]);
        assert_eq!(grid.get(0), 1);
        assert_eq!(grid.get(5), 0);
        assert_eq!(grid.total(), 2);
    }

    #[test]
    fn score_sums_current_occupancy() {
        let mut grid = OccupancyGrid::new();
        grid.add_slots(&[10, 10, 11]);
        assert_eq!(grid.score(&[10, 11, 12]), 3);
        assert_eq!(grid.score(&[]), 0);
    }

    #[test]
    fn empty_grid_stats() {
        let grid = OccupancyGrid::new();
        assert_eq!(grid.max_value(), 0);
        assert_eq!(grid.min_nonzero(), 0);
        assert_eq!(grid.rows().count(), HOURS_PER_DAY);
        assert!(grid.rows().all(|row| row.len() == MINUTES_PER_HOUR));
    }

    #[test]
    fn rows_follow_hour_minute_layout() {
        let mut grid = OccupancyGrid::new();
        grid.add_slots(&[slot_of(13, 7)]);
        let row = grid.rows().nth(13).unwrap();
        assert_eq!(row[7], 1);
    }

    #[test]
    fn intensity_is_clamped() {
        let grid = IntensityGrid::from_fn(|slot| if slot == 0 { 42 } else { 3 });
        assert_eq!(grid.get(0), MAX_INTENSITY);
        assert_eq!(grid.get(1), 3);
    }

    #[test]
    fn contributions_keep_order() {
        let mut grid = ContributionGrid::new();
        grid.push(0, "a", ContributionStatus::Starting);
        grid.push(0, "b", ContributionStatus::Continuing);
        let cell = grid.at(0);
        assert_eq!(cell.len(), 2);
        assert_eq!(cell[0].name, "a");
        assert_eq!(cell[1].status, ContributionStatus::Continuing);
        assert!(grid.at(MINUTES_PER_DAY).is_empty());
    }
}

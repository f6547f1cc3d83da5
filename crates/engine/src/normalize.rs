//! Normalizer: raw occupancy -> `0..=9` intensity bands.

use cronspread_core::{IntensityGrid, OccupancyGrid, MAX_INTENSITY};

/// Map each count `c` to `ceil(c * 9 / max)`.
///
/// The busiest minute always lands on level 9 and empty minutes on 0; sparse
/// grids band non-linearly. A zero `max_value` yields an all-zero grid.
pub fn normalize(raw: &OccupancyGrid, max_value: u32) -> IntensityGrid {
    if max_value == 0 {
        return IntensityGrid::from_fn(|_| 0);
    }
    let max = u64::from(max_value);
    let top = u64::from(MAX_INTENSITY);
    IntensityGrid::from_fn(|slot| {
        let count = u64::from(raw.get(slot));
        let level = (count * top).div_ceil(max);
        level.min(top) as u8
    })
}

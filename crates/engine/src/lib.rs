//! Cron job density analysis and schedule spreading.
//!
//! This crate provides:
//! - Schedule expansion of 5-field cron expressions into minute-of-day slots
//! - Density accumulation into a 24x60 occupancy grid, with per-slot contributions
//! - Normalization of occupancy to heatmap intensity levels
//! - Offset and greedy optimizers that rewrite schedules to reduce collisions

pub mod descriptor;
pub mod expander;
pub mod heatmap;
pub mod normalize;
pub mod optimizer;

pub use descriptor::{GroupKey, ScheduleDescriptor};
pub use expander::{expand, ReferenceDay, ScheduleError, ScheduleExpander};
pub use heatmap::{accumulate, build_heatmap, build_matrix, AccumulateOptions, HeatmapData};
pub use normalize::normalize;
pub use optimizer::{
    optimizer_for, suggest_aggressive_spread, suggest_spread, GreedyOptimizer, OffsetOptimizer,
    Optimizer, Suggestion,
};

//! Shared data model for cronspread.
//!
//! Job records, the 1440-slot occupancy grids, batch validation, and the
//! environment-driven configuration consumed by the engine and the CLI.

pub mod config;
pub mod error;
pub mod grid;
pub mod job;

pub use config::{Config, OptimizerKind};
pub use error::*;
pub use grid::*;
pub use job::*;

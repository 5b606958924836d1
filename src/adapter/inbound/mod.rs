//! Inbound adapters: tabular readers.

pub mod table;

pub use table::{read_positions, read_targets, PositionTable, TargetTable};

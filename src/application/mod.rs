//! Application services: the adjustment search and batch orchestration.

pub mod batch;
pub mod solver;

pub use batch::{AssetOutcome, BaseBook, BaseSource, BatchRunner, OutcomeStatus, PortfolioOutcome, TargetRow};
pub use solver::{AdjustmentSolver, SolverConfig};

//! Precifix - exact truncation-adjustment solver for reconciliation breaks.
//!
//! Legacy accounting systems truncate decimal quantities instead of rounding
//! them, so an adjustment factor that is mathematically correct can land one
//! unit short once the downstream system truncates. This crate finds, for
//! each asset in a batch, the smallest adjustment percentage `p` such that
//!
//! ```text
//! truncate(base * (1 + p), scale) == theoretical
//! ```
//!
//! using exact decimal arithmetic end to end, and certifies every result by
//! recomputing it independently before it is accepted.
//!
//! # Modules
//!
//! - [`domain`] - Exact decimals, the precision context, request/result types
//! - [`application`] - The adjustment solver, reverse validator, batch runner
//! - [`adapter`] - CSV readers for position/target files, audit report writer
//! - [`config`] - Configuration loading from TOML with solver settings
//! - [`error`] - Error types for the crate
//! - [`app`] - Orchestration of one batch run
//! - [`cli`] - Command-line surface
//!
//! # Example
//!
//! ```
//! use precifix::application::solver::{AdjustmentSolver, SolverConfig};
//! use precifix::domain::{AdjustmentRequest, PrecisionContext};
//!
//! let solver = AdjustmentSolver::new(SolverConfig::default(), PrecisionContext::default());
//! let request = AdjustmentRequest::try_new(
//!     "1000.00".parse().unwrap(),
//!     "1000.01".parse().unwrap(),
//!     2,
//! )
//! .unwrap();
//!
//! let result = solver.solve(&request).unwrap();
//! assert_eq!(result.percentage.to_string(), "0.00001");
//! assert!(result.matches);
//! ```

pub mod adapter;
pub mod app;
pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

//! Builders for domain primitives used across the test suites.

use crate::application::solver::{AdjustmentSolver, SolverConfig};
use crate::domain::{AdjustmentRequest, Numeric, PrecisionContext};

/// Parse a decimal literal, panicking on invalid test input.
#[must_use]
pub fn num(text: &str) -> Numeric {
    text.parse().expect("valid decimal literal")
}

/// Build a validated request from decimal literals.
#[must_use]
pub fn request(base: &str, theoretical: &str, scale: u32) -> AdjustmentRequest {
    AdjustmentRequest::try_new(num(base), num(theoretical), scale).expect("valid request")
}

/// A solver with default configuration and context.
#[must_use]
pub fn solver() -> AdjustmentSolver {
    AdjustmentSolver::new(SolverConfig::default(), PrecisionContext::default())
}

/// A solver with an explicit iteration bound.
#[must_use]
pub fn bounded_solver(max_iterations: u32) -> AdjustmentSolver {
    AdjustmentSolver::new(
        SolverConfig {
            max_iterations,
            ..SolverConfig::default()
        },
        PrecisionContext::default(),
    )
}

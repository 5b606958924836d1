//! Adjustment-factor search.
//!
//! Finds the smallest percentage `p` such that
//!
//! ```text
//! truncate(base * (1 + p), scale) == theoretical
//! ```
//!
//! The exact mathematical ratio `p0 = theoretical/base - 1` satisfies the
//! equality in the overwhelming majority of cases. It fails when the product
//! loses its last unit to truncation instead of rounding, the classic
//! reconciliation break this tool exists for. The fallback is a monotone
//! walk up a fixed lattice of candidate percentages: because the working
//! division truncates toward zero, `|base * (1 + p0)|` never exceeds
//! `|theoretical|`, so the first lattice candidate that satisfies the
//! equality is the minimal one the search can produce.
//!
//! Every accepted result passes through [`validate`] first; nothing reaches
//! a caller without that certificate.

pub mod validate;

use num_bigint::BigInt;
use num_traits::One;
use tracing::{debug, trace};

use crate::domain::{AdjustmentRequest, AdjustmentResult, Numeric, PrecisionContext};
use crate::error::SolveError;

pub use validate::validate;

/// Configuration for the adjustment search.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Maximum number of stepped candidates before the target is declared
    /// unreachable.
    pub max_iterations: u32,
    /// Extra fractional digits of the candidate lattice beyond the request
    /// scale: the step quantum is `10^-(scale + step_margin)`. Must be at
    /// least 1 so the lattice is finer than the truncation unit.
    pub step_margin: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            // Matches the fractional precision of the transaction systems
            // this tool reconciles against.
            step_margin: 13,
        }
    }
}

/// Adjustment-factor solver: pure over its inputs plus the arithmetic
/// context, so independent solves can run on any thread without
/// coordination.
#[derive(Debug, Clone)]
pub struct AdjustmentSolver {
    config: SolverConfig,
    ctx: PrecisionContext,
}

impl AdjustmentSolver {
    /// Create a solver with explicit configuration and arithmetic context.
    #[must_use]
    pub const fn new(config: SolverConfig, ctx: PrecisionContext) -> Self {
        Self { config, ctx }
    }

    /// Return the current configuration.
    #[must_use]
    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Return the arithmetic context used for division.
    #[must_use]
    pub const fn context(&self) -> PrecisionContext {
        self.ctx
    }

    /// Find the minimal adjustment percentage for one request.
    ///
    /// # Errors
    ///
    /// [`SolveError::UnreachableTarget`] when no candidate within the
    /// iteration bound satisfies the truncation equality, and
    /// [`SolveError::ValidationMismatch`] if the reverse validator ever
    /// disagrees with the search (an internal-consistency fault).
    pub fn solve(&self, request: &AdjustmentRequest) -> Result<AdjustmentResult, SolveError> {
        let ratio = self
            .ctx
            .div(request.theoretical(), request.base())
            .ok_or(crate::domain::DomainError::DivisionByZero)?;
        let p0 = &ratio - &Numeric::one();

        // The exact ratio is minimal by construction; accept it when the
        // final truncation does not eat the last unit.
        if let Some(result) = self.certify(request, p0.clone(), 0)? {
            return Ok(result);
        }

        let step_scale = request.scale().saturating_add(self.config.step_margin);
        let quantum = Numeric::new(BigInt::one(), step_scale);
        // Nudging by a fraction of the quantum before snapping up means a
        // p0 that already sits on the lattice still advances strictly.
        let epsilon = Numeric::new(BigInt::one(), step_scale.saturating_add(2));

        debug!(
            p0 = %p0.normalized(),
            step_scale,
            "exact ratio lost to truncation, stepping"
        );

        let mut candidate = (&p0 + &epsilon).ceil_to_scale(step_scale);
        for iteration in 1..=self.config.max_iterations {
            trace!(iteration, candidate = %candidate, "trying stepped candidate");
            if let Some(result) = self.certify(request, candidate.clone(), iteration)? {
                return Ok(result);
            }
            candidate = &candidate + &quantum;
        }

        Err(SolveError::UnreachableTarget {
            iterations: self.config.max_iterations,
        })
    }

    /// Test one candidate percentage; accept it only with the reverse
    /// validator's certificate.
    fn certify(
        &self,
        request: &AdjustmentRequest,
        percentage: Numeric,
        iterations: u32,
    ) -> Result<Option<AdjustmentResult>, SolveError> {
        let adjusted_raw = request.base() * &(&Numeric::one() + &percentage);
        let adjusted_truncated = adjusted_raw.truncate(request.scale());
        if adjusted_truncated != *request.theoretical() {
            return Ok(None);
        }

        let matches = validate(
            request.base(),
            &percentage,
            request.scale(),
            request.theoretical(),
        );
        if !matches {
            return Err(SolveError::ValidationMismatch {
                expected: request.theoretical().clone(),
                actual: adjusted_truncated,
            });
        }

        Ok(Some(AdjustmentResult {
            percentage: percentage.normalized(),
            adjusted_raw: adjusted_raw.normalized(),
            adjusted_truncated,
            matches,
            iterations,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(text: &str) -> Numeric {
        text.parse().expect("valid decimal literal")
    }

    fn solver() -> AdjustmentSolver {
        AdjustmentSolver::new(SolverConfig::default(), PrecisionContext::default())
    }

    fn request(base: &str, theoretical: &str, scale: u32) -> AdjustmentRequest {
        AdjustmentRequest::try_new(num(base), num(theoretical), scale).expect("valid request")
    }

    #[test]
    fn config_defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.max_iterations, 100);
        assert_eq!(config.step_margin, 13);
    }

    #[test]
    fn accepts_the_exact_ratio_when_truncation_holds() {
        let result = solver()
            .solve(&request("1000.00", "1000.01", 2))
            .expect("solvable");

        assert_eq!(result.percentage, num("0.00001"));
        assert_eq!(result.adjusted_raw, num("1000.01"));
        assert_eq!(result.adjusted_truncated, num("1000.01"));
        assert_eq!(result.iterations, 0);
        assert!(result.matches);
    }

    #[test]
    fn equal_quantities_need_no_adjustment() {
        let result = solver().solve(&request("250", "250", 0)).expect("solvable");
        assert!(result.percentage.is_zero());
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn zeroing_a_position_is_a_full_negative_adjustment() {
        let result = solver().solve(&request("5", "0", 0)).expect("solvable");
        assert_eq!(result.percentage, num("-1"));
        assert_eq!(result.adjusted_truncated, num("0"));
    }

    #[test]
    fn steps_over_a_truncation_boundary() {
        // 4/3 - 1 truncates to 0.333...3, so 3 * (1 + p0) = 3.999...9 and
        // the product loses its last unit. One lattice step repairs it.
        let result = solver().solve(&request("3", "4", 0)).expect("solvable");

        assert!(result.iterations >= 1, "expected a stepped search");
        assert_eq!(result.adjusted_truncated, num("4"));
        assert!(result.matches);
        assert!(result.percentage > num("0.3333333333333"));
        assert!(result.percentage < num("0.3333333333335"));
    }

    #[test]
    fn stepped_result_is_minimal_on_the_lattice() {
        let result = solver().solve(&request("3", "4", 0)).expect("solvable");
        let quantum = num("0.0000000000001");
        let predecessor = &result.percentage - &quantum;

        assert!(
            !validate(&num("3"), &predecessor, 0, &num("4")),
            "the lattice predecessor must not already satisfy the equality"
        );
    }

    #[test]
    fn negative_positions_step_the_same_direction() {
        let result = solver().solve(&request("-3", "-4", 0)).expect("solvable");

        assert!(result.iterations >= 1);
        assert_eq!(result.adjusted_truncated, num("-4"));
        assert!(result.percentage.is_positive());
    }

    #[test]
    fn unreachable_targets_exhaust_the_bound() {
        // A theoretical finer than the truncation scale can never compare
        // equal to a scale-2 truncation.
        let err = solver()
            .solve(&request("1", "1.005", 2))
            .expect_err("unreachable");

        assert_eq!(err, SolveError::UnreachableTarget { iterations: 100 });
    }

    #[test]
    fn large_quantities_stay_exact() {
        // Twelve significant digits, comfortably past binary float exactness.
        let result = solver()
            .solve(&request("999999999999", "1000000000000", 0))
            .expect("solvable");

        assert_eq!(result.adjusted_truncated, num("1000000000000"));
        assert!(result.matches);
    }

    #[test]
    fn bases_coarser_than_the_lattice_surface_as_unreachable() {
        // Above 10^step_margin units a single quantum moves the product by
        // more than one truncation unit, so no candidate can land exactly.
        // That exhausts the bound instead of producing a wrong factor.
        let err = solver()
            .solve(&request("123456789012345678", "123456789012345679", 0))
            .expect_err("lattice too coarse for this base");

        assert!(matches!(err, SolveError::UnreachableTarget { .. }));
    }
}

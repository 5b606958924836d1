//! Request and result values for a single adjustment solve.

use super::error::DomainError;
use super::numeric::Numeric;
use super::quantity::{Percentage, Quantity};

/// One adjustment problem: find the smallest `p` with
/// `truncate(base * (1 + p), scale) == theoretical`.
///
/// Validated on construction; a built request is always solvable in
/// principle (the search bound decides whether it is solvable in practice).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustmentRequest {
    base: Quantity,
    theoretical: Quantity,
    scale: u32,
}

impl AdjustmentRequest {
    /// Build a request, rejecting invariant violations.
    ///
    /// A zero base has no defined adjustment, and a base/theoretical pair
    /// with opposite signs would demand a sign flip rather than a
    /// percentage adjustment.
    pub fn try_new(
        base: Quantity,
        theoretical: Quantity,
        scale: u32,
    ) -> Result<Self, DomainError> {
        if base.is_zero() {
            return Err(DomainError::ZeroBase);
        }
        if (base.is_positive() && theoretical.is_negative())
            || (base.is_negative() && theoretical.is_positive())
        {
            return Err(DomainError::SignMismatch { base, theoretical });
        }
        Ok(Self {
            base,
            theoretical,
            scale,
        })
    }

    /// The current (base) quantity.
    #[must_use]
    pub const fn base(&self) -> &Quantity {
        &self.base
    }

    /// The target quantity expected after truncation.
    #[must_use]
    pub const fn theoretical(&self) -> &Quantity {
        &self.theoretical
    }

    /// Fractional digits kept by the truncating downstream system.
    #[must_use]
    pub const fn scale(&self) -> u32 {
        self.scale
    }
}

/// The outcome of one solve, immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustmentResult {
    /// The found adjustment percentage.
    pub percentage: Percentage,
    /// `base * (1 + percentage)` before truncation.
    pub adjusted_raw: Numeric,
    /// The same product after truncation to the request scale.
    pub adjusted_truncated: Quantity,
    /// Reverse-validation certificate: the truncated product was
    /// independently recomputed and matched the theoretical quantity.
    pub matches: bool,
    /// Stepped candidates tried; zero when the exact ratio already
    /// satisfied the truncation equality.
    pub iterations: u32,
}

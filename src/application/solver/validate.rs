//! Reverse validation: the correctness gate for accepted adjustments.

use crate::domain::{Numeric, Percentage, Quantity};

/// Recompute `truncate(base * (1 + percentage), scale)` and compare it to
/// the theoretical quantity, independently of whatever search produced the
/// percentage.
///
/// Run unconditionally before a result is accepted. The check is
/// deterministic: calling it twice on the same inputs always returns the
/// same answer, and a `false` here means the claimed percentage must be
/// reported as an unresolved break, never written out as resolved.
#[must_use]
pub fn validate(
    base: &Quantity,
    percentage: &Percentage,
    scale: u32,
    theoretical: &Quantity,
) -> bool {
    let adjusted = base * &(&Numeric::one() + percentage);
    adjusted.truncate(scale) == *theoretical
}

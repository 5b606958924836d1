//! Domain validation errors for core domain types.
//!
//! Returned by `try_new` constructors and parsing when a domain invariant is
//! violated. Each failure stays attached to the asset that produced it; none
//! of these abort a batch.

use thiserror::Error;

use super::quantity::Quantity;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An adjustment over a zero base quantity is undefined.
    #[error("base quantity must be nonzero")]
    ZeroBase,

    /// A sign flip is never an intended adjustment.
    #[error("base {base} and theoretical {theoretical} have opposite signs")]
    SignMismatch {
        /// The base quantity.
        base: Quantity,
        /// The theoretical quantity.
        theoretical: Quantity,
    },

    /// Division by a zero quantity.
    #[error("division by zero")]
    DivisionByZero,

    /// Text that does not parse as an exact decimal.
    #[error("not a decimal number: {text:?}")]
    ParseNumeric {
        /// The offending input text.
        text: String,
    },
}

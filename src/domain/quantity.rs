//! Domain aliases over the exact decimal type.

use super::numeric::Numeric;

/// An asset position size or monetary amount.
pub type Quantity = Numeric;

/// An adjustment factor, e.g. `0.00001` for one hundredth of a percent.
pub type Percentage = Numeric;

//! Folding the numeric factors of a product into one coefficient.

use crate::error::UndefinedArithmetic;
use crate::symbolic::node::number::Number;
use super::Factor;

/// Multiplies (or divides, for inverted factors) the numbers in `numbers` together, in order.
///
/// Factors whose value is not a number are skipped.
pub(crate) fn fold_coefficient(numbers: &[Factor]) -> Result<Number, UndefinedArithmetic> {
    let mut coefficient = Number::one();
    for factor in numbers {
        let Some(n) = factor.value.as_number() else {
            continue;
        };

        coefficient = if factor.inverted {
            coefficient.checked_div(n)?
        } else {
            coefficient.checked_mul(n)?
        };
    }

    Ok(coefficient)
}

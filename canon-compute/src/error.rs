//! Error kinds produced while canonicalizing expressions.
//!
//! Every error is wrapped in a [`canon_error::Error`] whose source is the rendering of the
//! expression being canonicalized when the error occurred. Spans point into that rendering.

use ariadne::Fmt;
use canon_attrs::ErrorKind;
use canon_error::{Error, EXPR};
use crate::symbolic::Node;
use std::{fmt::Display, ops::Range};

/// A boolean-valued expression, such as a comparison or a logical operation, was used as a term
/// of a sum or a factor of a product.
#[derive(Debug, Clone, PartialEq, Eq, ErrorKind)]
#[error(
    message = "cannot use a boolean-valued expression in arithmetic",
    labels = [format!("`{}` is a boolean", self.operand)],
    help = format!(
        "comparisons and logical operators cannot appear inside {}",
        "sums or products".fg(EXPR),
    ),
)]
pub struct InvalidOperand {
    /// The rendering of the offending operand.
    pub operand: String,
}

/// An arithmetic operation has no defined result, such as division by zero.
#[derive(Debug, Clone, PartialEq, Eq, ErrorKind)]
#[error(
    message = format!("`{}` is undefined", self.expr),
    labels = ["while evaluating this expression"],
)]
pub struct UndefinedArithmetic {
    /// The rendering of the undefined operation, such as `1/0`.
    pub expr: String,
}

impl UndefinedArithmetic {
    /// Creates an error for the given undefined operation.
    pub fn new(expr: impl Display) -> Self {
        Self { expr: expr.to_string() }
    }

    /// Wraps this error kind in an [`Error`] whose source is the undefined operation itself.
    pub(crate) fn into_error(self) -> Error {
        let src = self.expr.clone();
        self.within(src)
    }

    /// Wraps this error kind in an [`Error`] that spans the whole of `src`.
    pub(crate) fn within(self, src: impl Display) -> Error {
        let src = src.to_string();
        let len = src.len();
        Error::new(src, vec![0..len], self)
    }
}

impl InvalidOperand {
    /// Wraps an error for `operand` in an [`Error`] whose span points at the operand within
    /// `src`.
    pub(crate) fn within(operand: &Node, src: String, span: Range<usize>) -> Error {
        Error::new(src, vec![span], Self { operand: operand.to_string() })
    }
}

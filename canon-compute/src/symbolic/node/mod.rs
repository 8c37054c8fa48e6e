//! The expression tree that canonicalization operates on.
//!
//! A [`Node`] is one of a closed set of variants. Sums and products are stored as flat lists of
//! terms and factors ([`SumForm`] and [`ProductForm`]), with a flag per entry marking it as
//! subtracted or inverted, instead of as nested binary operations. Everything else that takes
//! arguments, including exponentiation, comparisons and logical operators, is a [`Call`].
//!
//! # Rendering and equality
//!
//! Every node has a deterministic rendering through [`Display`](std::fmt::Display). The
//! canonicalizer uses the rendering of a node as its identity wherever it needs to decide if two
//! nodes are "the same", for example when merging repeated bases of a product or combining like
//! terms of a sum. The rendering is therefore part of the canonical form: two nodes that render
//! identically are treated as equal, even if they were built differently.
//!
//! The derived [`PartialEq`] is exact structural equality, which is what the tests of this crate
//! compare against.

pub mod iter;
pub mod number;

use canon_error::Error;
use crate::consts;
use crate::primitive::float;
use crate::symbolic::{product::{Factor, ProductForm}, sum::SumForm};
use iter::NodeIter;
use number::{frac, Number};
use rug::Float;
use std::{collections::BTreeSet, fmt};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The kind of a [`Node`], without its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Number,
    Literal,
    Constant,
    Sum,
    Product,
    FunctionApplication,
}

/// A named mathematical constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    /// Returns the approximate value of the constant.
    pub fn value(&self) -> Float {
        match self {
            Self::Pi => consts::PI.clone(),
            Self::E => consts::E.clone(),
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pi => write!(f, "pi"),
            Self::E => write!(f, "e"),
        }
    }
}

/// The operator of a [`Call`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Op {
    /// Exponentiation. The first argument is the base, the second is the exponent.
    Pow,

    /// A named function, such as `sin` or `ln`.
    Func(String),

    /// `a = b`
    Eq,

    /// `a != b`
    NotEq,

    /// `a < b`
    Less,

    /// `a <= b`
    LessEq,

    /// `a > b`
    Greater,

    /// `a >= b`
    GreaterEq,

    /// `~a`
    Not,

    /// `a & b`
    And,

    /// `a | b`
    Or,

    /// `a -> b`
    Implies,

    /// `a <-> b`
    Equiv,
}

impl Op {
    /// Returns true if applying this operator produces a boolean, rather than a number.
    pub fn is_boolean(&self) -> bool {
        !matches!(self, Self::Pow | Self::Func(_))
    }

    /// The symbol of the operator when it is rendered in infix (or prefix) position.
    pub fn symbol(&self) -> &str {
        match self {
            Self::Pow => "^",
            Self::Func(name) => name,
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Less => "<",
            Self::LessEq => "<=",
            Self::Greater => ">",
            Self::GreaterEq => ">=",
            Self::Not => "~",
            Self::And => "&",
            Self::Or => "|",
            Self::Implies => "->",
            Self::Equiv => "<->",
        }
    }
}

/// An operator applied to a list of arguments.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Call {
    pub op: Op,
    pub args: Vec<Node>,
}

impl Call {
    pub fn new(op: Op, args: Vec<Node>) -> Self {
        Self { op, args }
    }

    /// Returns the base and exponent if this is a power.
    pub fn as_power(&self) -> Option<(&Node, &Node)> {
        match (&self.op, self.args.as_slice()) {
            (Op::Pow, [base, exp]) => Some((base, exp)),
            _ => None,
        }
    }
}

/// A node of an expression tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Node {
    Number(Number),
    Literal(String),
    Constant(Constant),
    Sum(SumForm),
    Product(ProductForm),
    Call(Call),
}

/// How tightly a rendered node binds. Operands that bind looser than their position requires are
/// wrapped in parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Precedence {
    Boolean,
    Sum,
    Product,
    Power,
    Atom,
}

impl Node {
    /// An exact integer.
    pub fn int(n: i64) -> Self {
        Self::Number(Number::int(n))
    }

    /// An exact fraction, reduced to lowest terms.
    ///
    /// Panics if `denom` is zero.
    pub fn frac(numer: i64, denom: i64) -> Self {
        Self::Number(frac(numer, denom))
    }

    /// An approximate number.
    pub fn float(n: f64) -> Self {
        Self::Number(Number::Float(float(n)))
    }

    /// A variable.
    pub fn literal(name: impl Into<String>) -> Self {
        Self::Literal(name.into())
    }

    /// `base^exp`, without any simplification.
    pub fn pow(base: Node, exp: Node) -> Self {
        Self::Call(Call::new(Op::Pow, vec![base, exp]))
    }

    /// A call to the named function.
    pub fn call(name: impl Into<String>, args: Vec<Node>) -> Self {
        Self::Call(Call::new(Op::Func(name.into()), args))
    }

    /// A binary operator applied to two operands, such as the comparison `lhs < rhs`.
    pub fn binary(op: Op, lhs: Node, rhs: Node) -> Self {
        Self::Call(Call::new(op, vec![lhs, rhs]))
    }

    /// The sum of the given terms.
    pub fn sum(terms: impl IntoIterator<Item = Node>) -> Self {
        Self::Sum(terms.into_iter().collect())
    }

    /// `lhs - rhs`
    pub fn difference(lhs: Node, rhs: Node) -> Self {
        let mut sum = SumForm::new();
        sum.add_term(lhs, false);
        sum.add_term(rhs, true);
        Self::Sum(sum)
    }

    /// The product of the given factors.
    pub fn product(factors: impl IntoIterator<Item = Node>) -> Self {
        Self::Product(factors.into_iter().collect())
    }

    /// `numer / denom`
    pub fn quotient(numer: Node, denom: Node) -> Self {
        Self::Product(ProductForm::from_iter([Factor::new(numer), Factor::inverted(denom)]))
    }

    /// Returns the kind of this node.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Number(_) => Kind::Number,
            Self::Literal(_) => Kind::Literal,
            Self::Constant(_) => Kind::Constant,
            Self::Sum(_) => Kind::Sum,
            Self::Product(_) => Kind::Product,
            Self::Call(_) => Kind::FunctionApplication,
        }
    }

    /// Returns the number if this node is one.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the base and exponent if this node is a power.
    pub fn as_power(&self) -> Option<(&Node, &Node)> {
        match self {
            Self::Call(call) => call.as_power(),
            _ => None,
        }
    }

    /// Returns true if this node evaluates to a boolean, rather than a number.
    pub fn is_boolean(&self) -> bool {
        matches!(self, Self::Call(call) if call.op.is_boolean())
    }

    /// Returns an iterator that traverses the tree of nodes in left-to-right post-order (i.e.
    /// depth-first).
    pub fn post_order_iter(&self) -> NodeIter<'_> {
        NodeIter::new(self)
    }

    /// Returns the distinct variables used in this node, in sorted order.
    pub fn variables(&self) -> Vec<String> {
        self.post_order_iter()
            .filter_map(|node| match node {
                Self::Literal(name) => Some(name.clone()),
                _ => None,
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Canonicalizes this node with the default options.
    ///
    /// See [`canonicalize`](crate::symbolic::canonicalize()) for details.
    pub fn canonicalize(&self) -> Result<Node, Error> {
        crate::symbolic::canonicalize(self)
    }

    pub(crate) fn precedence(&self) -> Precedence {
        match self {
            Self::Number(n) if n.is_negative() || n.is_fraction() => Precedence::Product,
            Self::Number(_) | Self::Literal(_) | Self::Constant(_) => Precedence::Atom,
            Self::Sum(sum) => match sum.terms() {
                [] => Precedence::Atom,
                [term] if !term.subtracted => term.value.precedence(),
                _ => Precedence::Sum,
            },
            Self::Product(product) => match product.factors() {
                [] => Precedence::Atom,
                [factor] if !factor.inverted => factor.value.precedence(),
                _ => Precedence::Product,
            },
            Self::Call(call) => match call.op {
                Op::Pow => Precedence::Power,
                Op::Func(_) => Precedence::Atom,
                _ => Precedence::Boolean,
            },
        }
    }

    /// Returns true if the rendering of this node starts with a minus sign.
    pub(crate) fn is_signed(&self) -> bool {
        match self {
            Self::Number(n) => n.is_negative(),
            Self::Sum(_) | Self::Product(_) => self.to_string().starts_with('-'),
            _ => false,
        }
    }
}

impl From<Number> for Node {
    fn from(n: Number) -> Self {
        Self::Number(n)
    }
}

impl From<Constant> for Node {
    fn from(c: Constant) -> Self {
        Self::Constant(c)
    }
}

/// Writes `node`, wrapped in parentheses if `parens` is true.
pub(crate) fn write_operand(f: &mut impl fmt::Write, node: &Node, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({})", node)
    } else {
        write!(f, "{}", node)
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.op, self.args.as_slice()) {
            (Op::Pow, [base, exp]) => {
                write_operand(f, base, base.precedence() <= Precedence::Power)?;
                write!(f, "^")?;
                write_operand(f, exp, exp.precedence() < Precedence::Atom)
            },
            (Op::Not, [arg]) => {
                write!(f, "~")?;
                write_operand(f, arg, arg.precedence() < Precedence::Atom)
            },
            (op, [lhs, rhs]) if op.is_boolean() => {
                write_operand(f, lhs, lhs.precedence() == Precedence::Boolean)?;
                write!(f, "{}", op.symbol())?;
                write_operand(f, rhs, rhs.precedence() == Precedence::Boolean)
            },
            (op, args) => {
                let name = match op {
                    Op::Pow => "pow",
                    op => op.symbol(),
                };
                write!(f, "{}(", name)?;
                let mut iter = args.iter();
                if let Some(arg) = iter.next() {
                    write!(f, "{}", arg)?;
                    for arg in iter {
                        write!(f, ", {}", arg)?;
                    }
                }
                write!(f, ")")
            },
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Literal(name) => write!(f, "{}", name),
            Self::Constant(c) => write!(f, "{}", c),
            Self::Sum(sum) => write!(f, "{}", sum),
            Self::Product(product) => write!(f, "{}", product),
            Self::Call(call) => write!(f, "{}", call),
        }
    }
}

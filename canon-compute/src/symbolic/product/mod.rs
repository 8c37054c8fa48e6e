//! Products of factors, and their canonicalization.
//!
//! A [`ProductForm`] is an ordered list of [`Factor`]s, each of which either multiplies or divides
//! the product. The order of the factors carries no meaning; a canonical order is only imposed
//! when the product is canonicalized.
//!
//! # Canonical form
//!
//! [`ProductForm::canonicalize`] rewrites a product into one of:
//!
//! - a [`Node::Number`], if every factor folds into a number (this includes products that contain
//!   a zero factor, which collapse to `0`),
//! - a single non-numeric factor, such as `x` or `sin(x)` (a single divisor `x` becomes `x^(-1)`),
//! - a [`Node::Sum`], if the product contained sums and was expanded,
//! - or a canonical [`Node::Product`].
//!
//! In a canonical product, repeated bases are merged into one power (`x*x = x^2`), numeric factors
//! are folded into one coefficient, and the remaining factors are ordered as function calls, then
//! powers, then variables and constants, each group sorted by rendering. The coefficient is stored
//! last, and left out if it is `1`; when rendered, it is printed first (`2*x`).
//!
//! ```
//! use canon_compute::symbolic::{Node, ProductForm};
//!
//! let product = ProductForm::from_iter([
//!     Node::literal("x"),
//!     Node::int(3),
//!     Node::pow(Node::literal("x"), Node::int(2)),
//! ]);
//! assert_eq!(product.canonicalize().unwrap().to_string(), "3*x^3");
//! ```
//!
//! The phases of canonicalization are implemented in the submodules of this module, and
//! orchestrated by the `canonical` submodule.

mod canonical;
mod classify;
mod coefficient;
mod distribute;
mod power;

use canon_error::Error;
use crate::symbolic::{
    canonicalize::step::Step,
    node::{number::Number, write_operand, Node, Precedence},
    options::Options,
    step_collector::StepCollector,
};
use rug::Integer;
use std::{collections::BTreeSet, fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A factor of a [`ProductForm`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Factor {
    pub value: Node,

    /// If true, the product is divided by this factor instead of multiplied by it.
    pub inverted: bool,
}

impl Factor {
    /// A factor that multiplies the product.
    pub fn new(value: Node) -> Self {
        Self { value, inverted: false }
    }

    /// A factor that divides the product.
    pub fn inverted(value: Node) -> Self {
        Self { value, inverted: true }
    }
}

/// An ordered list of factors that are multiplied or divided together.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProductForm {
    factors: Vec<Factor>,
}

impl ProductForm {
    /// Creates an empty product.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a product from a node. The factors of a product node are copied in; any other node
    /// becomes the only factor.
    pub fn from_node(node: Node) -> Self {
        let mut product = Self::new();
        product.add_factor(Factor::new(node));
        product
    }

    /// Adds a factor to the product.
    ///
    /// If the value of the factor is itself a product, its factors are added instead, with their
    /// inversion flipped if the factor is inverted.
    pub fn add_factor(&mut self, factor: Factor) {
        match factor.value {
            Node::Product(product) => {
                for inner in product.factors {
                    self.add_factor(Factor {
                        inverted: inner.inverted ^ factor.inverted,
                        ..inner
                    });
                }
            },
            value => self.factors.push(Factor { value, inverted: factor.inverted }),
        }
    }

    /// Returns the factors of the product.
    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    /// Consumes the product, returning its factors.
    pub fn into_factors(self) -> Vec<Factor> {
        self.factors
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Returns a flattened copy of the product.
    ///
    /// Nested products are spliced into the result at any depth, including products wrapped in a
    /// sum with a single, non-subtracted term. The result contains no factor whose value is a
    /// product.
    pub fn compress(&self) -> ProductForm {
        let mut result = Self::new();
        for factor in &self.factors {
            result.add_compressed(factor.clone());
        }
        result
    }

    fn add_compressed(&mut self, factor: Factor) {
        match unwrap_single_term(factor.value) {
            Node::Product(product) => {
                for inner in product.factors {
                    self.add_compressed(Factor {
                        inverted: inner.inverted ^ factor.inverted,
                        ..inner
                    });
                }
            },
            value => self.factors.push(Factor { value, inverted: factor.inverted }),
        }
    }

    /// Canonicalizes the product with the default options.
    pub fn canonicalize(&self) -> Result<Node, Error> {
        self.canonicalize_with(&Options::default(), &mut ())
    }

    /// Canonicalizes the product, pushing the steps taken into `steps`.
    ///
    /// See the [module-level documentation](self) for the shape of the result.
    pub fn canonicalize_with(
        &self,
        options: &Options,
        steps: &mut dyn StepCollector<Step>,
    ) -> Result<Node, Error> {
        canonical::canonicalize_product(self, options, steps)
    }

    /// Returns the distinct variables used in the product, in sorted order.
    pub fn variables(&self) -> Vec<String> {
        self.factors.iter()
            .flat_map(|factor| factor.value.variables())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Returns the largest positive integer exponent among the power factors of the product, or
    /// zero if there is none.
    pub fn max_integer_power(&self) -> Integer {
        self.factors.iter()
            .filter_map(|factor| factor.value.as_power())
            .filter_map(|(_, exp)| exp.as_number()?.as_integer())
            .fold(Integer::new(), |max, exp| if *exp > max { exp.clone() } else { max })
    }

    /// Returns the numeric coefficient of the product if it contains a power factor whose exponent
    /// is `exp`. If `exp` is `1`, a bare variable factor also matches.
    ///
    /// For a canonical product such as `3*x^2`, this is the coefficient of the `x^2` term.
    pub fn power_coefficient(&self, exp: &Number) -> Option<Number> {
        let matches = self.factors.iter().any(|factor| match &factor.value {
            Node::Literal(_) => exp.is_one(),
            value => value.as_power()
                .and_then(|(_, e)| e.as_number())
                .map_or(false, |e| e == exp),
        });

        matches.then(|| self.coefficient().cloned().unwrap_or_else(Number::one))
    }

    /// Returns the first numeric factor of the product that multiplies it.
    fn coefficient(&self) -> Option<&Number> {
        self.factors.iter()
            .filter(|factor| !factor.inverted)
            .find_map(|factor| factor.value.as_number())
    }

    /// Converts the product into a node without canonicalizing it. An empty product becomes `1`,
    /// and a product with one factor becomes that factor (`x^(-1)` if it is inverted).
    pub(crate) fn into_node(mut self) -> Node {
        match self.factors.len() {
            0 => Node::int(1),
            1 => {
                let factor = self.factors.remove(0);
                if factor.inverted {
                    Node::pow(factor.value, Node::int(-1))
                } else {
                    factor.value
                }
            },
            _ => Node::Product(self),
        }
    }

    /// Renders the product, returning the rendering and the span of each factor within it, in
    /// the order the factors are stored.
    ///
    /// Numeric factors that multiply the product are rendered first. A leading `-1` that is
    /// followed by another multiplying factor is rendered as a minus sign.
    pub(crate) fn render(&self) -> Result<(String, Vec<Range<usize>>), fmt::Error> {
        if self.factors.is_empty() {
            return Ok(("1".to_string(), Vec::new()));
        }

        let is_coefficient = |factor: &Factor| !factor.inverted && factor.value.as_number().is_some();
        let order = (0..self.factors.len())
            .filter(|&i| is_coefficient(&self.factors[i]))
            .chain((0..self.factors.len()).filter(|&i| !is_coefficient(&self.factors[i])))
            .collect::<Vec<_>>();

        let mut out = String::new();
        let mut spans = vec![0..0; self.factors.len()];
        let mut joined = false;
        for (pos, &i) in order.iter().enumerate() {
            let factor = &self.factors[i];

            if pos == 0 && is_minus_one(factor) {
                let followed = order.get(1).map_or(false, |&next| !self.factors[next].inverted);
                if followed {
                    out.push('-');
                    spans[i] = 0..1;
                    continue;
                }
            }

            if factor.inverted {
                out.push_str(if joined { "/" } else { "1/" });
            } else if joined {
                out.push('*');
            }

            let precedence = factor.value.precedence();
            let parens = precedence <= Precedence::Sum
                || (factor.inverted && precedence <= Precedence::Product)
                || (!out.is_empty() && factor.value.is_signed());
            let start = out.len();
            write_operand(&mut out, &factor.value, parens)?;
            spans[i] = start..out.len();
            joined = true;
        }

        Ok((out, spans))
    }
}

/// Returns true if the factor multiplies the product by exactly `-1`.
fn is_minus_one(factor: &Factor) -> bool {
    match (&factor.value, factor.inverted) {
        (Node::Number(n), false) => n.is_exact() && n.is_negative() && n.abs().is_one(),
        _ => false,
    }
}

/// Unwraps sums with a single, non-subtracted term into that term.
fn unwrap_single_term(mut node: Node) -> Node {
    loop {
        match node {
            Node::Sum(sum) if sum.len() == 1 && !sum.terms()[0].subtracted => {
                node = sum.into_terms().remove(0).value;
            },
            node => return node,
        }
    }
}

impl FromIterator<Factor> for ProductForm {
    fn from_iter<I: IntoIterator<Item = Factor>>(iter: I) -> Self {
        let mut product = Self::new();
        for factor in iter {
            product.add_factor(factor);
        }
        product
    }
}

impl FromIterator<Node> for ProductForm {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        iter.into_iter().map(Factor::new).collect()
    }
}

impl fmt::Display for ProductForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rendered, _) = self.render()?;
        f.write_str(&rendered)
    }
}

#[cfg(test)]
mod tests {
    use crate::symbolic::sum::SumForm;
    use pretty_assertions::assert_eq;
    use super::*;

    fn lit(name: &str) -> Node {
        Node::literal(name)
    }

    #[test]
    fn add_factor_splices_products() {
        let mut product = ProductForm::from_node(lit("a"));
        product.add_factor(Factor::inverted(Node::quotient(lit("b"), lit("c"))));
        assert_eq!(product.factors(), &[
            Factor::new(lit("a")),
            Factor::inverted(lit("b")),
            Factor::new(lit("c")),
        ]);
    }

    #[test]
    fn compress_unwraps_single_term_sums() {
        let wrapped = Node::Sum(SumForm::from_iter([Node::product([lit("b"), lit("c")])]));
        let product = ProductForm::from_iter([Factor::new(lit("a")), Factor::inverted(wrapped)]);
        assert_eq!(product.len(), 2);

        let compressed = product.compress();
        assert_eq!(compressed.factors(), &[
            Factor::new(lit("a")),
            Factor::inverted(lit("b")),
            Factor::inverted(lit("c")),
        ]);
    }

    #[test]
    fn render_puts_coefficient_first() {
        let product = ProductForm::from_iter([lit("x"), Node::int(2)]);
        assert_eq!(product.to_string(), "2*x");

        let product = ProductForm::from_iter([lit("x"), Node::int(-1)]);
        assert_eq!(product.to_string(), "-x");

        let product = ProductForm::from_iter([Factor::inverted(lit("x")), Factor::new(Node::int(-1))]);
        assert_eq!(product.to_string(), "-1/x");
    }

    #[test]
    fn render_divisors() {
        let product = ProductForm::from_iter([
            Factor::inverted(Node::sum([lit("a"), lit("b")])),
            Factor::new(lit("c")),
            Factor::inverted(Node::frac(1, 2)),
        ]);
        let (rendered, spans) = product.render().unwrap();
        assert_eq!(rendered, "1/(a+b)*c/(1/2)");
        assert_eq!(spans, vec![2..7, 8..9, 10..15]);
    }

    #[test]
    fn render_signed_factors() {
        let product = ProductForm::from_iter([lit("a"), Node::int(-2), Node::int(-3)]);
        assert_eq!(product.to_string(), "-2*(-3)*a");
    }

    #[test]
    fn variables() {
        let product = ProductForm::from_iter([
            lit("y"),
            Node::pow(lit("x"), lit("n")),
            Node::call("f", vec![lit("y")]),
        ]);
        assert_eq!(product.variables(), vec!["n", "x", "y"]);
    }

    #[test]
    fn max_integer_power() {
        let product = ProductForm::from_iter([
            Node::pow(lit("x"), Node::int(3)),
            Node::pow(lit("y"), Node::int(5)),
            Node::pow(lit("z"), Node::frac(7, 2)),
        ]);
        assert_eq!(product.max_integer_power(), 5);
        assert_eq!(ProductForm::from_node(lit("x")).max_integer_power(), 0);
    }

    #[test]
    fn power_coefficient() {
        let product = ProductForm::from_iter([Node::pow(lit("x"), Node::int(2)), Node::int(3)]);
        assert_eq!(product.power_coefficient(&Number::int(2)), Some(Number::int(3)));
        assert_eq!(product.power_coefficient(&Number::int(3)), None);

        let product = ProductForm::from_node(lit("x"));
        assert_eq!(product.power_coefficient(&Number::one()), Some(Number::one()));
    }
}

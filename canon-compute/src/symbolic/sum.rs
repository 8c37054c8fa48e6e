//! Sums of terms, and their canonicalization.
//!
//! A canonical sum has at least two terms, at most one of which is a number. Terms with the same
//! non-numeric part are combined by adding their coefficients, terms whose coefficient is negative
//! are stored as subtracted terms with a positive coefficient, and the terms are ordered by the
//! rendering of their non-numeric part, with the numeric term last.

use canon_error::Error;
use crate::error::InvalidOperand;
use crate::symbolic::{
    canonicalize::{canonicalize_node, step::Step},
    node::{number::Number, write_operand, Node, Precedence},
    options::Options,
    product::{Factor, ProductForm},
    step_collector::StepCollector,
};
use std::{collections::{btree_map::Entry, BTreeMap}, fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A term of a [`SumForm`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Term {
    pub value: Node,

    /// If true, the term is subtracted from the sum instead of added to it.
    pub subtracted: bool,
}

impl Term {
    /// A term that is added to the sum.
    pub fn new(value: Node) -> Self {
        Self { value, subtracted: false }
    }

    /// A term that is subtracted from the sum.
    pub fn subtracted(value: Node) -> Self {
        Self { value, subtracted: true }
    }
}

/// An ordered list of terms that are added or subtracted together.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SumForm {
    terms: Vec<Term>,
}

/// Terms of a sum that share the same non-numeric part.
struct LikeTerms {
    rest: Node,
    coefficient: Number,
}

impl SumForm {
    /// Creates an empty sum.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a term to the sum.
    ///
    /// If `value` is itself a sum, its terms are added instead, with their subtraction flags
    /// flipped if `subtracted` is true.
    pub fn add_term(&mut self, value: Node, subtracted: bool) {
        match value {
            Node::Sum(sum) => {
                for term in sum.terms {
                    self.add_term(term.value, term.subtracted ^ subtracted);
                }
            },
            value => self.terms.push(Term { value, subtracted }),
        }
    }

    /// Returns the terms of the sum.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Consumes the sum, returning its terms.
    pub fn into_terms(self) -> Vec<Term> {
        self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Canonicalizes the sum with the default options.
    pub fn canonicalize(&self) -> Result<Node, Error> {
        self.canonicalize_with(&Options::default(), &mut ())
    }

    /// Canonicalizes the sum.
    ///
    /// Returns a [`Node::Number`] if every term cancels or folds into a number, the single
    /// remaining term if only one is left, and a canonical [`Node::Sum`] otherwise.
    pub fn canonicalize_with(
        &self,
        options: &Options,
        steps: &mut dyn StepCollector<Step>,
    ) -> Result<Node, Error> {
        tracing::trace!(sum = %self, "canonicalizing sum");

        // canonicalize every term; products can expand into sums, which are spliced in
        let mut terms = Vec::with_capacity(self.terms.len());
        for (i, term) in self.terms.iter().enumerate() {
            if term.value.is_boolean() {
                let (src, spans) = self.render().unwrap_or_default();
                let span = spans.get(i).cloned().unwrap_or(0..src.len());
                return Err(InvalidOperand::within(&term.value, src, span));
            }

            match canonicalize_node(&term.value, options, steps)? {
                Node::Sum(sum) => terms.extend(sum.terms.into_iter().map(|inner| Term {
                    subtracted: inner.subtracted ^ term.subtracted,
                    ..inner
                })),
                value => terms.push(Term { value, subtracted: term.subtracted }),
            }
        }

        let mut constant = Number::zero();
        let mut numbers = 0;
        let mut combined = false;
        let mut groups: BTreeMap<String, LikeTerms> = BTreeMap::new();
        for term in terms {
            let (coefficient, rest) = split_coefficient(term.value);
            let coefficient = if term.subtracted { -&coefficient } else { coefficient };
            match rest {
                None => {
                    constant = constant.checked_add(&coefficient)
                        .map_err(|kind| kind.within(self))?;
                    numbers += 1;
                },
                Some(rest) => match groups.entry(rest.to_string()) {
                    Entry::Occupied(mut entry) => {
                        let group = entry.get_mut();
                        group.coefficient = group.coefficient.checked_add(&coefficient)
                            .map_err(|kind| kind.within(self))?;
                        combined = true;
                    },
                    Entry::Vacant(entry) => {
                        entry.insert(LikeTerms { rest, coefficient });
                    },
                },
            }
        }

        if numbers > 1 {
            steps.push(Step::FoldConstantTerms);
        }
        if combined {
            steps.push(Step::CombineLikeTerms);
        }

        let mut result = SumForm::new();
        let mut cancelled = false;
        for LikeTerms { rest, coefficient } in groups.into_values() {
            if coefficient.is_zero() {
                cancelled = true;
                continue;
            }

            let magnitude = coefficient.abs();
            let value = if magnitude.is_one() {
                rest
            } else {
                canonicalize_node(&Node::product([rest, Node::Number(magnitude)]), options, steps)?
            };
            result.add_term(value, coefficient.is_negative());
        }

        if !constant.is_zero() {
            result.add_term(Node::Number(constant.abs()), constant.is_negative());
        } else if numbers > 0 && !result.is_empty() {
            cancelled = true;
        }

        if cancelled {
            steps.push(Step::CancelTerms);
        }

        let mut terms = result.terms;
        match terms.len() {
            0 => Ok(Node::Number(Number::zero())),
            1 => {
                let term = terms.remove(0);
                match term.value {
                    value if !term.subtracted => Ok(value),
                    Node::Number(n) => Ok(Node::Number(-&n)),
                    value => canonicalize_node(&Node::product([value, Node::int(-1)]), options, steps),
                }
            },
            _ => Ok(Node::Sum(SumForm { terms })),
        }
    }

    /// Renders the sum, returning the rendering and the span of each term within it.
    pub(crate) fn render(&self) -> Result<(String, Vec<Range<usize>>), fmt::Error> {
        if self.terms.is_empty() {
            return Ok(("0".to_string(), Vec::new()));
        }

        let mut out = String::new();
        let mut spans = Vec::with_capacity(self.terms.len());
        for (i, term) in self.terms.iter().enumerate() {
            if term.subtracted {
                out.push('-');
            } else if i > 0 {
                out.push('+');
            }

            let signed_position = i > 0 || term.subtracted;
            let parens = term.value.precedence() <= Precedence::Sum
                || (signed_position && term.value.is_signed());
            let start = out.len();
            write_operand(&mut out, &term.value, parens)?;
            spans.push(start..out.len());
        }

        Ok((out, spans))
    }
}

/// Splits a canonical term into its numeric coefficient and the rest of the term.
///
/// The rest is [`None`] if the term is a number.
fn split_coefficient(value: Node) -> (Number, Option<Node>) {
    match value {
        Node::Number(n) => (n, None),
        Node::Product(product) => {
            let mut coefficient = None;
            let mut rest = Vec::new();
            for factor in product.into_factors() {
                match factor.value {
                    Node::Number(n) if !factor.inverted && coefficient.is_none() => coefficient = Some(n),
                    value => rest.push(Factor { value, inverted: factor.inverted }),
                }
            }
            let rest = ProductForm::from_iter(rest).into_node();
            (coefficient.unwrap_or_else(Number::one), Some(rest))
        },
        value => (Number::one(), Some(value)),
    }
}

impl FromIterator<Node> for SumForm {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        let mut sum = Self::new();
        for value in iter {
            sum.add_term(value, false);
        }
        sum
    }
}

impl FromIterator<Term> for SumForm {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
        let mut sum = Self::new();
        for term in iter {
            sum.add_term(term.value, term.subtracted);
        }
        sum
    }
}

impl fmt::Display for SumForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rendered, _) = self.render()?;
        f.write_str(&rendered)
    }
}

#[cfg(test)]
mod tests {
    use crate::symbolic::node::Op;
    use pretty_assertions::assert_eq;
    use super::*;

    fn lit(name: &str) -> Node {
        Node::literal(name)
    }

    fn canonical(sum: SumForm) -> String {
        sum.canonicalize().unwrap().to_string()
    }

    #[test]
    fn combine_like_terms() {
        let mut steps = Vec::new();
        let sum = SumForm::from_iter([lit("a"), lit("a")]);
        let result = sum.canonicalize_with(&Options::default(), &mut steps).unwrap();
        assert_eq!(result.to_string(), "2*a");
        assert!(steps.contains(&Step::CombineLikeTerms));
    }

    #[test]
    fn coefficients_add_exactly() {
        let sum = SumForm::from_iter([
            Node::product([Node::frac(1, 2), lit("x")]),
            Node::product([lit("x"), Node::frac(1, 3)]),
        ]);
        assert_eq!(canonical(sum), "5/6*x");
    }

    #[test]
    fn cancellation_gives_zero() {
        let result = Node::difference(lit("a"), lit("a")).canonicalize().unwrap();
        assert_eq!(result, Node::int(0));
    }

    #[test]
    fn constant_term_is_last() {
        let sum = SumForm::from_iter([Node::int(1), lit("b"), Node::int(2), lit("a")]);
        assert_eq!(canonical(sum), "a+b+3");
    }

    #[test]
    fn negative_coefficients_are_subtracted() {
        let sum = SumForm::from_iter([
            Term::subtracted(lit("a")),
            Term::new(lit("b")),
            Term::new(Node::product([Node::int(-3), lit("c")])),
        ]);
        assert_eq!(canonical(sum), "-a+b-3*c");
    }

    #[test]
    fn single_subtracted_term() {
        let sum = SumForm::from_iter([Term::subtracted(lit("x"))]);
        assert_eq!(canonical(sum), "-x");

        let sum = SumForm::from_iter([Term::subtracted(Node::int(4))]);
        assert_eq!(sum.canonicalize().unwrap(), Node::int(-4));
    }

    #[test]
    fn nested_sums_are_flattened() {
        let inner = Node::difference(lit("b"), lit("c"));
        let sum = SumForm::from_iter([Term::new(lit("a")), Term::subtracted(inner)]);
        assert_eq!(sum.len(), 3);
        assert_eq!(sum.to_string(), "a-b+c");
    }

    #[test]
    fn render_parenthesizes_signed_terms() {
        let sum = SumForm::from_iter([lit("a"), Node::int(-2)]);
        assert_eq!(sum.to_string(), "a+(-2)");
    }

    #[test]
    fn boolean_term_is_rejected() {
        let sum = SumForm::from_iter([lit("a"), Node::binary(Op::Less, lit("x"), lit("y"))]);
        let err = sum.canonicalize().unwrap_err();
        assert_eq!(err.src, "a+(x<y)");
        assert_eq!(err.spans, vec![2..7]);
        assert!(err.is::<InvalidOperand>());

        let report = strip_ansi_escapes::strip(err.report_to_string("sum"));
        let report = String::from_utf8(report).unwrap();
        assert!(report.contains("cannot use a boolean-valued expression in arithmetic"));
        assert!(report.contains("cannot appear inside sums or products"));
    }
}

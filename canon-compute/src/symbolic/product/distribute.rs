//! Expanding products that contain sums.
//!
//! Sums that multiply the product are multiplied out into a numerator, and sums that divide it
//! into a separate denominator. The two are never multiplied together, so a quotient of sums such
//! as `(a+b)/(c+d)` is expanded on each side but not reduced.

use canon_error::Error;
use crate::error::UndefinedArithmetic;
use crate::symbolic::{
    canonicalize::{canonicalize_node, step::Step},
    node::{number::Number, Node},
    options::Options,
    step_collector::StepCollector,
    sum::{SumForm, Term},
};
use std::iter;
use super::{classify::Buckets, Factor, ProductForm};

/// One term of an expanded product.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Partial {
    pub product: ProductForm,
    pub subtracted: bool,
}

/// Multiplies every partial product in `lhs` by every term in `rhs`.
///
/// `(a-b)*(c+d) = a*c+a*d-b*c-b*d`
pub(crate) fn multiply_two_sums(lhs: &[Partial], rhs: &[Term]) -> Vec<Partial> {
    let mut result = Vec::with_capacity(lhs.len() * rhs.len());
    for partial in lhs {
        for term in rhs {
            let mut product = partial.product.clone();
            product.add_factor(Factor::new(term.value.clone()));
            result.push(Partial {
                product,
                subtracted: partial.subtracted ^ term.subtracted,
            });
        }
    }
    result
}

/// Multiplies every partial product by `value`.
fn multiply_all(partials: &mut [Partial], value: &Node) {
    for partial in partials {
        partial.product.add_factor(Factor::new(value.clone()));
    }
}

/// Combines like partial products, so that multiplying by a sum again only multiplies the
/// distinct terms.
///
/// `(a+b)*(a+b) = a^2+2*a*b+b^2`, which has three partial products instead of four.
fn collapse(
    partials: Vec<Partial>,
    options: &Options,
    steps: &mut dyn StepCollector<Step>,
) -> Result<Vec<Partial>, Error> {
    if partials.len() <= 1 {
        return Ok(partials);
    }

    let partial = |value: Node, subtracted: bool| Partial {
        product: ProductForm::from_node(value),
        subtracted,
    };
    Ok(match into_sum(partials).canonicalize_with(options, steps)? {
        Node::Sum(sum) => sum.into_terms()
            .into_iter()
            .map(|term| partial(term.value, term.subtracted))
            .collect(),
        Node::Number(n) if n.is_zero() => Vec::new(),
        value => vec![partial(value, false)],
    })
}

/// Collects the partial products into a sum.
fn into_sum(partials: Vec<Partial>) -> SumForm {
    partials.into_iter()
        .map(|partial| Term {
            value: partial.product.into_node(),
            subtracted: partial.subtracted,
        })
        .collect()
}

/// Expands the product described by `buckets` and `coefficient`. The add bucket must not be
/// empty.
///
/// Returns the expanded sum, or a quotient of two expanded sums if some of the sums divide the
/// product.
pub(crate) fn distribute(
    buckets: Buckets,
    coefficient: Number,
    options: &Options,
    steps: &mut dyn StepCollector<Step>,
) -> Result<Node, Error> {
    steps.push(Step::DistributiveProperty);
    tracing::trace!(sums = buckets.add.len(), "distributing product over sums");

    let mut numerator = vec![Partial::default()];
    let mut denominator = vec![Partial::default()];

    for factor in &buckets.add {
        let Node::Sum(sum) = &factor.value else {
            continue;
        };
        let target = if factor.inverted { &mut denominator } else { &mut numerator };
        *target = collapse(multiply_two_sums(target, sum.terms()), options, steps)?;
    }

    let others = buckets.function.iter()
        .chain(&buckets.power)
        .chain(&buckets.literal);
    for factor in others {
        let target = if factor.inverted { &mut denominator } else { &mut numerator };
        multiply_all(target, &factor.value);
    }

    if !coefficient.is_one() {
        multiply_all(&mut numerator, &Node::Number(coefficient));
    }

    let numerator = into_sum(numerator).canonicalize_with(options, steps)?;
    let denominator = into_sum(denominator).canonicalize_with(options, steps)?;
    assemble(numerator, denominator, options, steps)
}

/// Builds the quotient of two canonical nodes, folding numbers into one coefficient.
fn assemble(
    numerator: Node,
    denominator: Node,
    options: &Options,
    steps: &mut dyn StepCollector<Step>,
) -> Result<Node, Error> {
    let mut coefficient = Number::one();
    let mut factors = Vec::new();

    let numerator_factors = match numerator {
        Node::Number(n) => {
            coefficient = n;
            Vec::new()
        },
        Node::Product(product) => product.into_factors(),
        value => vec![Factor::new(value)],
    };
    for factor in numerator_factors {
        match factor.value {
            Node::Number(n) if !factor.inverted => {
                coefficient = coefficient.checked_mul(&n).map_err(UndefinedArithmetic::into_error)?;
            },
            value => factors.push(Factor { value, inverted: factor.inverted }),
        }
    }

    if coefficient.is_zero() {
        steps.push(Step::MultiplyZero);
        return Ok(Node::int(0));
    }

    // if the terms of the numerator cancelled down to a single quotient, its divisors belong in
    // the denominator
    let denominator = match denominator {
        Node::Number(n) => Node::Number(n),
        denominator if factors.iter().any(|factor| factor.inverted) => {
            let (divisors, kept): (Vec<_>, Vec<_>) = factors.into_iter()
                .partition(|factor| factor.inverted);
            factors = kept;
            let product = Node::product(
                iter::once(denominator).chain(divisors.into_iter().map(|factor| factor.value)),
            );
            canonicalize_node(&product, options, steps)?
        },
        denominator => denominator,
    };

    let denominator_factors = match denominator {
        Node::Number(n) => {
            coefficient = coefficient.checked_div(&n).map_err(UndefinedArithmetic::into_error)?;
            Vec::new()
        },
        Node::Product(product) => product.into_factors(),
        value => vec![Factor::new(value)],
    };
    for factor in denominator_factors {
        match factor.value {
            Node::Number(n) if !factor.inverted => {
                coefficient = coefficient.checked_div(&n).map_err(UndefinedArithmetic::into_error)?;
            },
            value => factors.push(Factor { value, inverted: !factor.inverted }),
        }
    }

    if factors.is_empty() {
        return Ok(Node::Number(coefficient));
    }

    if !coefficient.is_one() {
        factors.push(Factor::new(Node::Number(coefficient)));
    }

    Ok(ProductForm { factors }.into_node())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn lit(name: &str) -> Node {
        Node::literal(name)
    }

    fn partial(names: &[&str], subtracted: bool) -> Partial {
        Partial {
            product: names.iter().map(|name| lit(name)).collect(),
            subtracted,
        }
    }

    #[test]
    fn cartesian_product_of_terms() {
        let lhs = [partial(&["a"], false), partial(&["b"], true)];
        let rhs = [Term::new(lit("c")), Term::subtracted(lit("d"))];
        assert_eq!(multiply_two_sums(&lhs, &rhs), vec![
            partial(&["a", "c"], false),
            partial(&["a", "d"], true),
            partial(&["b", "c"], true),
            partial(&["b", "d"], false),
        ]);
    }

    fn expand(factors: Vec<Factor>) -> String {
        let buckets = Buckets::classify(factors);
        distribute(buckets, Number::one(), &Options::default(), &mut ())
            .unwrap()
            .to_string()
    }

    #[test]
    fn expand_two_sums() {
        let result = expand(vec![
            Factor::new(Node::sum([lit("a"), lit("b")])),
            Factor::new(Node::difference(lit("c"), lit("d"))),
        ]);
        assert_eq!(result, "a*c-a*d+b*c-b*d");
    }

    #[test]
    fn divisor_sums_stay_in_the_denominator() {
        let result = expand(vec![
            Factor::new(Node::sum([lit("a"), lit("b")])),
            Factor::inverted(Node::sum([lit("c"), lit("d")])),
        ]);
        assert_eq!(result, "(a+b)/(c+d)");
    }

    #[test]
    fn cancelling_numerator() {
        let result = expand(vec![
            Factor::new(Node::difference(lit("a"), lit("a"))),
            Factor::new(lit("x")),
        ]);
        assert_eq!(result, "0");
    }

    #[test]
    fn like_partials_collapse() {
        let sum = Node::sum([lit("a"), lit("b")]);
        let partials = multiply_two_sums(&[partial(&["a"], false), partial(&["b"], false)], &[
            Term::new(lit("a")),
            Term::new(lit("b")),
        ]);
        assert_eq!(partials.len(), 4);

        let collapsed = collapse(partials, &Options::default(), &mut ()).unwrap();
        assert_eq!(collapsed.len(), 3);
        assert_eq!(
            expand(vec![Factor::new(sum.clone()), Factor::new(sum)]),
            "2*a*b+a^2+b^2",
        );
    }

    #[test]
    fn cancelling_partials_collapse_to_nothing() {
        let partials = vec![partial(&["a", "b"], false), partial(&["b", "a"], true)];
        assert!(collapse(partials, &Options::default(), &mut ()).unwrap().is_empty());
    }

    #[test]
    fn zero_denominator() {
        let buckets = Buckets::classify(vec![
            Factor::new(lit("x")),
            Factor::inverted(Node::difference(lit("a"), lit("a"))),
        ]);
        let err = distribute(buckets, Number::one(), &Options::default(), &mut ()).unwrap_err();
        assert!(err.is::<UndefinedArithmetic>());
    }
}

//! Orchestrates the phases of product canonicalization.

use canon_error::Error;
use crate::error::InvalidOperand;
use crate::symbolic::{
    canonicalize::{canonicalize_args, canonicalize_node, make_power, step::Step},
    node::{number::Number, Call, Node, Op},
    options::Options,
    step_collector::StepCollector,
};
use super::{classify::Buckets, coefficient, distribute, power, Factor, ProductForm};

/// Canonicalizes a product.
///
/// 1. Flatten the product, reject boolean factors, and canonicalize the value of every factor.
/// 2. Sort the factors into buckets by kind, and open powers of products.
/// 3. Fold the numeric factors into one coefficient. A zero coefficient ends canonicalization.
/// 4. Merge repeated bases into powers.
/// 5. If any sums are left, expand the product.
/// 6. Otherwise, sort each bucket and concatenate them with the coefficient at the end.
pub(crate) fn canonicalize_product(
    product: &ProductForm,
    options: &Options,
    steps: &mut dyn StepCollector<Step>,
) -> Result<Node, Error> {
    tracing::trace!(product = %product, "canonicalizing product");

    let flat = product.compress();
    if flat != *product {
        steps.push(Step::Flatten);
    }

    if let Some(i) = flat.factors.iter().position(|factor| factor.value.is_boolean()) {
        let (src, spans) = flat.render().unwrap_or_default();
        let span = spans.get(i).cloned().unwrap_or(0..src.len());
        return Err(InvalidOperand::within(&flat.factors[i].value, src, span));
    }

    // canonical values can be products again, which `add_factor` splices in
    let mut canonical = ProductForm::new();
    for factor in flat.factors() {
        let value = canonicalize_factor(&factor.value, options, steps)?;
        canonical.add_factor(Factor { value, inverted: factor.inverted });
    }

    let mut buckets = Buckets::classify(canonical.into_factors());
    power::open_power_products(&mut buckets, options, steps)?;

    let numbers = std::mem::take(&mut buckets.number);
    let mut coefficient = coefficient::fold_coefficient(&numbers)
        .map_err(|kind| kind.within(&flat))?;
    if numbers.len() > 1 {
        steps.push(Step::FoldCoefficient);
    }
    if coefficient.is_zero() {
        steps.push(Step::MultiplyZero);
        return Ok(Node::int(0));
    }

    power::merge_powers(&mut buckets, &mut coefficient, options, steps)?;
    if coefficient.is_zero() {
        steps.push(Step::MultiplyZero);
        return Ok(Node::int(0));
    }

    // merging can turn powers of numbers into more numbers
    for factor in std::mem::take(&mut buckets.number) {
        if let Node::Number(n) = &factor.value {
            let result = if factor.inverted {
                coefficient.checked_div(n)
            } else {
                coefficient.checked_mul(n)
            };
            coefficient = result.map_err(|kind| kind.within(&flat))?;
        }
    }

    if !buckets.add.is_empty() {
        return distribute::distribute(buckets, coefficient, options, steps);
    }

    Ok(assemble(buckets, coefficient, !numbers.is_empty(), steps))
}

/// Canonicalizes the value of a factor.
///
/// Calls only have their arguments canonicalized, since a power has to stay a power for its base
/// to be merged with the other factors.
fn canonicalize_factor(
    value: &Node,
    options: &Options,
    steps: &mut dyn StepCollector<Step>,
) -> Result<Node, Error> {
    let Node::Call(call) = value else {
        return canonicalize_node(value, options, steps);
    };

    let args = canonicalize_args(call, options, steps)?;
    match (&call.op, <[Node; 2]>::try_from(args)) {
        (Op::Pow, Ok([base, exp])) => make_power(base, exp, options, steps),
        (op, Ok(args)) => Ok(Node::Call(Call::new(op.clone(), args.into()))),
        (op, Err(args)) => Ok(Node::Call(Call::new(op.clone(), args))),
    }
}

/// Sorts the buckets by rendering and concatenates them: function calls, then powers, then
/// variables and constants, then the coefficient if it is not `1`.
fn assemble(
    mut buckets: Buckets,
    coefficient: Number,
    had_numbers: bool,
    steps: &mut dyn StepCollector<Step>,
) -> Node {
    let mut sorted = false;
    for bucket in [&mut buckets.function, &mut buckets.power, &mut buckets.literal] {
        let keys = bucket.iter().map(|factor| factor.value.to_string()).collect::<Vec<_>>();
        if keys.windows(2).any(|pair| pair[0] > pair[1]) {
            sorted = true;
            bucket.sort_by_cached_key(|factor| factor.value.to_string());
        }
    }
    if sorted {
        steps.push(Step::SortFactors);
    }

    let mut factors = buckets.function;
    factors.append(&mut buckets.power);
    factors.append(&mut buckets.literal);

    if factors.is_empty() {
        return Node::Number(coefficient);
    }

    if coefficient.is_one() {
        if had_numbers {
            steps.push(Step::MultiplyOne);
        }
    } else {
        factors.push(Factor::new(Node::Number(coefficient)));
    }

    ProductForm { factors }.into_node()
}

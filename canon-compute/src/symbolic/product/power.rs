//! Merging repeated bases of a product into powers.

use canon_error::Error;
use crate::error::UndefinedArithmetic;
use crate::symbolic::{
    canonicalize::{make_power, step::Step},
    node::{number::Number, Call, Kind, Node, Op},
    options::Options,
    step_collector::StepCollector,
    sum::SumForm,
};
use std::collections::{BTreeMap, BTreeSet};
use super::{classify::Buckets, Factor};

/// The exponents a base of a product has been raised to.
///
/// A bare occurrence of the base contributes `1`, a power contributes its exponent, and inverted
/// occurrences contribute the negated exponent.
#[derive(Debug)]
pub(crate) struct ExponentAccumulator {
    pub base: Node,
    pub exponent: SumForm,
}

/// Splits `node` into its base and exponent if it is a power, or returns it unchanged otherwise.
fn into_power(node: Node) -> Result<(Node, Node), Node> {
    match node {
        Node::Call(Call { op: Op::Pow, args }) => match <[Node; 2]>::try_from(args) {
            Ok([base, exp]) => Ok((base, exp)),
            Err(args) => Err(Node::Call(Call::new(Op::Pow, args))),
        },
        node => Err(node),
    }
}

/// Replaces every power of a product in the power bucket with a power of each of its factors, and
/// sorts the new factors into buckets.
///
/// `(a*b)^n = a^n*b^n`
/// `(a/b)^n = a^n/b^n`
pub(crate) fn open_power_products(
    buckets: &mut Buckets,
    options: &Options,
    steps: &mut dyn StepCollector<Step>,
) -> Result<(), Error> {
    let mut opened = false;
    for factor in std::mem::take(&mut buckets.power) {
        match into_power(factor.value) {
            Ok((Node::Product(product), exp)) => {
                opened = true;
                for inner in product.into_factors() {
                    let value = make_power(inner.value, exp.clone(), options, steps)?;
                    buckets.push(Factor { value, inverted: inner.inverted ^ factor.inverted });
                }
            },
            Ok((base, exp)) => buckets.power.push(Factor {
                value: Node::pow(base, exp),
                inverted: factor.inverted,
            }),
            Err(value) => buckets.power.push(Factor { value, inverted: factor.inverted }),
        }
    }

    if opened {
        steps.push(Step::OpenPowerOfProduct);
    }

    Ok(())
}

/// Adds `exp` (or `-exp`, if `inverted`) to the exponent of `base`.
fn accumulate(
    accumulators: &mut BTreeMap<String, ExponentAccumulator>,
    base: Node,
    exp: Node,
    inverted: bool,
) {
    accumulators.entry(base.to_string())
        .or_insert_with(|| ExponentAccumulator { base, exponent: SumForm::new() })
        .exponent
        .add_term(exp, inverted);
}

/// Returns the rendering of the base `value` is merged under.
fn base_key(value: &Node) -> String {
    match value.as_power() {
        Some((base, _)) => base.to_string(),
        None => value.to_string(),
    }
}

/// Returns true if expanding a sum of `terms` terms raised to `exponent` produces at most `limit`
/// distinct terms, `C(exponent+terms-1, terms-1)`.
fn expansion_within(terms: usize, exponent: u32, limit: u64) -> bool {
    let k = terms.saturating_sub(1) as u128;
    let n = u128::from(exponent);
    let r = k.min(n);
    let m = n + k;

    let mut count = 1u128;
    for i in 1..=r {
        count = count * (m - r + i) / i;
        if count > u128::from(limit) {
            return false;
        }
    }
    count <= u128::from(limit)
}

/// Merges every occurrence of the same base in the add, power, function and literal buckets into
/// one power, and sorts the results back into the buckets.
///
/// Bases are identified by their rendering. Merged powers that evaluate to numbers (such as
/// `2^3`) are multiplied into `coefficient`.
///
/// The merged exponent of each base decides where the base goes:
///
/// - `0`: the base is removed.
/// - `1` or `-1`: the bare base goes back to its bucket, inverted if the exponent is `-1`.
/// - Any other integer, if the base is a sum: the sum is repeated that many times in the add
///   bucket, so that it can be expanded. If the exponent is larger than
///   [`Options::unroll_limit`], or the expansion would have more terms than
///   [`Options::expansion_limit`], the power is kept instead.
/// - Otherwise: `base^exponent` goes to the power bucket.
///
/// A merged base can itself be a power that shares its base with another factor: merging
/// `(x^y)^(1/2)*(x^y)^(1/2)*x` once gives `x^y*x`. Merging repeats until no two factors share a
/// base, giving `x^(y+1)`.
pub(crate) fn merge_powers(
    buckets: &mut Buckets,
    coefficient: &mut Number,
    options: &Options,
    steps: &mut dyn StepCollector<Step>,
) -> Result<(), Error> {
    let mut unrolled = Vec::new();
    let mut first = true;

    loop {
        let factors = std::mem::take(&mut buckets.add).into_iter()
            .chain(std::mem::take(&mut buckets.function))
            .chain(std::mem::take(&mut buckets.literal))
            .chain(std::mem::take(&mut buckets.power))
            .collect::<Vec<_>>();

        let distinct = factors.iter()
            .map(|factor| base_key(&factor.value))
            .collect::<BTreeSet<_>>()
            .len();
        let combines = distinct < factors.len();

        // every pass after the first removes at least one factor, so this terminates
        if !first && !combines {
            for factor in factors {
                buckets.push(factor);
            }
            break;
        }
        first = false;

        if combines {
            steps.push(Step::CombineLikeFactors);
        }

        merge_pass(factors, buckets, &mut unrolled, coefficient, options, steps)?;
    }

    buckets.add.append(&mut unrolled);
    Ok(())
}

/// Merges the given factors once, sorting the results into `buckets`. Sums that are unrolled go
/// into `unrolled` instead, so that later passes do not merge them back into a power.
fn merge_pass(
    factors: Vec<Factor>,
    buckets: &mut Buckets,
    unrolled: &mut Vec<Factor>,
    coefficient: &mut Number,
    options: &Options,
    steps: &mut dyn StepCollector<Step>,
) -> Result<(), Error> {
    let mut accumulators = BTreeMap::new();
    for factor in factors {
        match into_power(factor.value) {
            Ok((base, exp)) => accumulate(&mut accumulators, base, exp, factor.inverted),
            Err(value) => accumulate(&mut accumulators, value, Node::int(1), factor.inverted),
        }
    }

    for ExponentAccumulator { base, exponent } in accumulators.into_values() {
        let exponent = exponent.canonicalize_with(options, steps)?;
        let integer = exponent.as_number().and_then(Number::to_i32);
        let unrollable = match (&base, integer) {
            (Node::Sum(sum), Some(n)) => n.unsigned_abs() <= options.unroll_limit
                && expansion_within(sum.len(), n.unsigned_abs(), options.expansion_limit),
            _ => false,
        };

        match (integer, base.kind()) {
            (Some(0), _) => steps.push(Step::CancelFactors),
            (Some(n @ (1 | -1)), Kind::Literal | Kind::Constant | Kind::FunctionApplication | Kind::Sum) => {
                buckets.push(Factor { value: base, inverted: n < 0 });
            },
            (Some(n), Kind::Sum) if unrollable => {
                steps.push(Step::UnrollPower);
                for _ in 0..n.unsigned_abs() {
                    unrolled.push(Factor { value: base.clone(), inverted: n < 0 });
                }
            },
            (integer, kind) => {
                if let (Some(n), Kind::Sum) = (integer, kind) {
                    tracing::debug!(
                        base = %base,
                        exponent = n,
                        unroll_limit = options.unroll_limit,
                        expansion_limit = options.expansion_limit,
                        "expansion exceeds the limits; keeping the power"
                    );
                }

                match make_power(base, exponent, options, steps)? {
                    Node::Number(n) => {
                        *coefficient = coefficient.checked_mul(&n)
                            .map_err(UndefinedArithmetic::into_error)?;
                    },
                    value => buckets.push(Factor::new(value)),
                }
            },
        }
    }

    Ok(())
}

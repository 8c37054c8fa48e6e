//! Canonicalization of arbitrary nodes.
//!
//! [`canonicalize`] walks a node tree bottom-up, rewriting every sum and product it finds into its
//! canonical form. Powers are canonicalized as products with a single factor, so that
//! `(2*x)^2` becomes `4*x^2`. Other calls, including comparisons and logical operators, keep
//! their operator and have their arguments canonicalized.
//!
//! Canonicalization is idempotent: canonicalizing a canonical node returns the same node.

pub mod step;

use canon_error::Error;
use crate::error::UndefinedArithmetic;
use crate::symbolic::{
    node::{Call, Node, Op},
    options::Options,
    product::ProductForm,
    step_collector::StepCollector,
};
use step::Step;

/// Canonicalizes the given node with the default options.
pub fn canonicalize(node: &Node) -> Result<Node, Error> {
    canonicalize_with(node, &Options::default())
}

/// Canonicalizes the given node with the given options.
pub fn canonicalize_with(node: &Node, options: &Options) -> Result<Node, Error> {
    canonicalize_node(node, options, &mut ())
}

/// Canonicalizes the given node with the default options, returning the steps taken.
pub fn canonicalize_with_steps(node: &Node) -> Result<(Node, Vec<Step>), Error> {
    let mut steps = Vec::new();
    let canonical = canonicalize_node(node, &Options::default(), &mut steps)?;
    Ok((canonical, steps))
}

/// Canonicalizes a node, dispatching on its kind.
pub(crate) fn canonicalize_node(
    node: &Node,
    options: &Options,
    steps: &mut dyn StepCollector<Step>,
) -> Result<Node, Error> {
    match node {
        Node::Number(_) | Node::Literal(_) => Ok(node.clone()),
        Node::Constant(c) if options.approximate => {
            steps.push(Step::ApproximateConstant);
            Ok(Node::Number(c.value().into()))
        },
        Node::Constant(_) => Ok(node.clone()),
        Node::Sum(sum) => sum.canonicalize_with(options, steps),
        Node::Product(product) => product.canonicalize_with(options, steps),
        Node::Call(call) if call.op == Op::Pow => {
            ProductForm::from_node(node.clone()).canonicalize_with(options, steps)
        },
        Node::Call(call) => {
            let args = canonicalize_args(call, options, steps)?;
            Ok(Node::Call(Call::new(call.op.clone(), args)))
        },
    }
}

/// Canonicalizes the arguments of a call.
pub(crate) fn canonicalize_args(
    call: &Call,
    options: &Options,
    steps: &mut dyn StepCollector<Step>,
) -> Result<Vec<Node>, Error> {
    call.args.iter()
        .map(|arg| canonicalize_node(arg, options, steps))
        .collect()
}

/// Builds `base^exp` from a canonical base and exponent, applying the rules below where they
/// match.
///
/// - `a^0 = 1`
/// - `a^1 = a`
/// - A number raised to a number is evaluated, if the result is a number (`2^3 = 8`, but
///   `2^(1/2)` is kept).
/// - `1^a = 1`
/// - `0^a = 0`, where `a` is a positive number.
/// - `(a^b)^n = a^(b*n)`, where `n` is an integer.
///
/// Raising zero to a negative power is an error.
pub(crate) fn make_power(
    base: Node,
    exp: Node,
    options: &Options,
    steps: &mut dyn StepCollector<Step>,
) -> Result<Node, Error> {
    if let Node::Number(e) = &exp {
        if e.is_zero() {
            steps.push(Step::PowerZero);
            return Ok(Node::int(1));
        }
        if e.is_one() {
            steps.push(Step::PowerOne);
            return Ok(base);
        }
    }

    match (&base, &exp) {
        (Node::Number(b), Node::Number(e)) => {
            if let Some(value) = b.try_pow(e).map_err(UndefinedArithmetic::into_error)? {
                steps.push(Step::EvaluatePower);
                return Ok(Node::Number(value));
            }
            if b.is_zero() && !e.is_negative() {
                steps.push(Step::PowerZeroLeft);
                return Ok(Node::int(0));
            }
            if b.is_one() {
                steps.push(Step::PowerOneLeft);
                return Ok(Node::int(1));
            }
        },
        (Node::Number(b), _) if b.is_one() => {
            steps.push(Step::PowerOneLeft);
            return Ok(Node::int(1));
        },
        (_, Node::Number(e)) if e.as_integer().is_some() => {
            if let Some((inner_base, inner_exp)) = base.as_power() {
                steps.push(Step::PowerPower);
                let product = Node::product([inner_exp.clone(), exp.clone()]);
                let exp = canonicalize_node(&product, options, steps)?;
                return make_power(inner_base.clone(), exp, options, steps);
            }
        },
        _ => (),
    }

    Ok(Node::pow(base, exp))
}

//! Sorting the factors of a product into buckets by kind.

use crate::symbolic::node::{Node, Op};
use super::Factor;

/// The factors of a product, grouped by kind.
#[derive(Debug, Default)]
pub(crate) struct Buckets {
    /// Sums.
    pub add: Vec<Factor>,

    /// Powers, `base^exp`.
    pub power: Vec<Factor>,

    /// Calls to any other operator.
    pub function: Vec<Factor>,

    /// Numbers.
    pub number: Vec<Factor>,

    /// Variables and named constants.
    pub literal: Vec<Factor>,
}

impl Buckets {
    /// Sorts the given factors into buckets.
    pub fn classify(factors: impl IntoIterator<Item = Factor>) -> Self {
        let mut buckets = Self::default();
        for factor in factors {
            buckets.push(factor);
        }
        buckets
    }

    /// Adds a factor to the bucket for its kind. Products are spliced into their factors.
    pub fn push(&mut self, factor: Factor) {
        let bucket = match &factor.value {
            Node::Sum(_) => &mut self.add,
            Node::Call(call) if call.op == Op::Pow => &mut self.power,
            Node::Call(_) => &mut self.function,
            Node::Number(_) => &mut self.number,
            Node::Literal(_) | Node::Constant(_) => &mut self.literal,
            Node::Product(_) => return self.splice(factor),
        };
        bucket.push(factor);
    }

    fn splice(&mut self, factor: Factor) {
        if let Node::Product(product) = factor.value {
            for inner in product.into_factors() {
                self.push(Factor {
                    inverted: inner.inverted ^ factor.inverted,
                    ..inner
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn buckets_by_kind() {
        let buckets = Buckets::classify([
            Factor::new(Node::sum([Node::literal("a"), Node::literal("b")])),
            Factor::new(Node::pow(Node::literal("x"), Node::int(2))),
            Factor::inverted(Node::call("sin", vec![Node::literal("x")])),
            Factor::new(Node::int(3)),
            Factor::new(Node::literal("y")),
            Factor::new(Node::Constant(crate::symbolic::node::Constant::Pi)),
        ]);

        assert_eq!(buckets.add.len(), 1);
        assert_eq!(buckets.power.len(), 1);
        assert_eq!(buckets.function, vec![Factor::inverted(Node::call("sin", vec![Node::literal("x")]))]);
        assert_eq!(buckets.number.len(), 1);
        assert_eq!(buckets.literal.len(), 2);
    }
}

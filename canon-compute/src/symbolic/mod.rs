//! Canonicalization of algebraic expressions.
//!
//! # Expression representation
//!
//! Expressions are trees of [`Node`]s. Sums and products are stored flat: the expression
//! `a*(b*c)/d` is a single [`ProductForm`] with the four factors `a`, `b`, `c` and `d`, the last
//! of which is marked as inverted. Likewise, `a-(b+c)` is a single [`SumForm`] with three terms,
//! two of which are marked as subtracted.
//!
//! ```
//! use canon_compute::symbolic::{Factor, Node, ProductForm};
//!
//! let mut product = ProductForm::from_node(Node::literal("a"));
//! product.add_factor(Factor::new(Node::product([Node::literal("b"), Node::literal("c")])));
//! product.add_factor(Factor::inverted(Node::literal("d")));
//! assert_eq!(product.len(), 4);
//! assert_eq!(product.to_string(), "a*b*c/d");
//! ```
//!
//! # Canonicalization
//!
//! The [`canonicalize()`] function rewrites an expression into a canonical form: a sum of
//! products, in which repeated factors are merged into powers, numeric factors and terms are
//! folded together exactly, and factors and terms appear in a deterministic order. Two
//! expressions that differ only in the order of their factors or terms, or in how their sums and
//! products are nested, have the same canonical form.
//!
//! ```
//! use canon_compute::symbolic::{canonicalize, Node};
//!
//! let a = Node::literal("a");
//! let b = Node::literal("b");
//! let c = Node::literal("c");
//!
//! // `(a+b)*c*2 = 2*a*c+2*b*c`
//! let node = Node::product([Node::sum([a, b]), c, Node::int(2)]);
//! assert_eq!(canonicalize(&node).unwrap().to_string(), "2*a*c+2*b*c");
//! ```
//!
//! Exact numbers stay exact throughout. Approximate numbers are only produced from approximate
//! inputs, or from named constants if [`Options::approximate`] is set.
//!
//! For more information, see the [`product`] and [`sum`] modules.

pub mod canonicalize;
pub mod node;
pub mod options;
pub mod product;
pub mod step_collector;
pub mod sum;

pub use canonicalize::{canonicalize, canonicalize_with, canonicalize_with_steps, step::Step};
pub use node::{number::Number, Call, Constant, Kind, Node, Op};
pub use options::{Options, OptionsBuilder};
pub use product::{Factor, ProductForm};
pub use step_collector::StepCollector;
pub use sum::{SumForm, Term};

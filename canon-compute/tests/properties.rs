use canon_compute::symbolic::{canonicalize, Factor, Node, ProductForm};
use pretty_assertions::assert_eq;
use rand::seq::SliceRandom;

fn lit(name: &str) -> Node {
    Node::literal(name)
}

/// Factors covering every kind of node a product can hold.
fn mixed_factors() -> Vec<Node> {
    vec![
        lit("a"),
        Node::int(2),
        Node::pow(lit("x"), Node::int(2)),
        Node::call("sin", vec![lit("x")]),
        Node::frac(1, 3),
        lit("b"),
        Node::sum([lit("c"), lit("d")]),
        lit("x"),
    ]
}

/// `(x^exp)^(1/2)`
fn root_of_power(exp: Node) -> Node {
    Node::pow(Node::pow(lit("x"), exp), Node::frac(1, 2))
}

fn samples() -> Vec<Node> {
    vec![
        Node::product(mixed_factors()),
        Node::product([lit("a"), lit("a"), lit("b")]),
        Node::product([Node::sum([lit("a"), lit("b")]), Node::difference(lit("c"), lit("d"))]),
        Node::quotient(Node::sum([lit("a"), lit("b")]), Node::sum([lit("c"), lit("d")])),
        Node::quotient(lit("a"), Node::product([lit("b"), Node::int(2)])),
        Node::pow(Node::sum([lit("x"), Node::int(1)]), Node::int(3)),
        Node::pow(Node::product([Node::int(3), lit("y")]), Node::frac(1, 2)),
        Node::sum([Node::product([lit("x"), lit("y")]), Node::product([lit("y"), lit("x")])]),
        Node::call("f", vec![Node::product([lit("z"), Node::int(1), lit("z")])]),
        Node::product([root_of_power(lit("y")), root_of_power(lit("y")), lit("x")]),
        Node::product([root_of_power(Node::int(2)), root_of_power(Node::int(2)), lit("x")]),
        Node::pow(Node::pow(lit("x"), Node::int(2)), Node::int(3)),
        Node::pow(Node::sum([lit("a"), lit("b")]), Node::int(-2)),
    ]
}

#[test]
fn canonicalization_is_idempotent() {
    for node in samples() {
        let once = canonicalize(&node).unwrap();
        let twice = canonicalize(&once).unwrap();
        assert_eq!(once, twice, "not idempotent on `{}`", node);
    }
}

#[test]
fn factor_order_does_not_matter() {
    let expected = canonicalize(&Node::product(mixed_factors())).unwrap();

    let mut rng = rand::thread_rng();
    for _ in 0..32 {
        let mut factors = mixed_factors();
        factors.shuffle(&mut rng);
        let result = canonicalize(&Node::product(factors.clone())).unwrap();
        assert_eq!(result, expected, "order-dependent on `{}`", Node::product(factors));
    }
}

#[test]
fn term_order_does_not_matter() {
    let terms = || vec![
        Node::product([Node::int(2), lit("x")]),
        lit("y"),
        Node::int(5),
        Node::product([lit("x"), lit("y")]),
        Node::pow(lit("x"), Node::int(2)),
    ];
    let expected = canonicalize(&Node::sum(terms())).unwrap();

    let mut rng = rand::thread_rng();
    for _ in 0..32 {
        let mut shuffled = terms();
        shuffled.shuffle(&mut rng);
        assert_eq!(canonicalize(&Node::sum(shuffled)).unwrap(), expected);
    }
}

#[test]
fn nesting_does_not_matter() {
    let flat = Node::product([lit("a"), lit("b"), lit("c"), lit("d")]);
    let nested = Node::product([
        Node::product([lit("a"), lit("b")]),
        Node::product([lit("c"), Node::product([lit("d")])]),
    ]);
    assert_eq!(canonicalize(&flat).unwrap(), canonicalize(&nested).unwrap());
}

#[test]
fn nesting_with_divisors_does_not_matter() {
    let nested = ProductForm::from_iter([
        Factor::new(Node::product([lit("a"), lit("b")])),
        Factor::inverted(lit("c")),
    ]);
    let flat = ProductForm::from_iter([
        Factor::new(lit("a")),
        Factor::new(lit("b")),
        Factor::inverted(lit("c")),
    ]);
    assert_eq!(nested.canonicalize().unwrap(), flat.canonicalize().unwrap());
    assert_eq!(flat.canonicalize().unwrap().to_string(), "a*b/c");
}

#[test]
fn distribution_matches_the_expanded_sum() {
    let product = Node::product([Node::sum([lit("a"), lit("b")]), lit("c")]);
    let expanded = Node::sum([
        Node::product([lit("a"), lit("c")]),
        Node::product([lit("b"), lit("c")]),
    ]);
    assert_eq!(canonicalize(&product).unwrap(), canonicalize(&expanded).unwrap());

    let product = Node::product([
        Node::difference(lit("a"), lit("b")),
        Node::sum([lit("c"), Node::int(2)]),
        Node::int(3),
    ]);
    let expanded = Node::sum([
        Node::product([Node::int(3), lit("a"), lit("c")]),
        Node::product([Node::int(6), lit("a")]),
        Node::product([Node::int(-3), lit("b"), lit("c")]),
        Node::product([Node::int(-6), lit("b")]),
    ]);
    assert_eq!(canonicalize(&product).unwrap(), canonicalize(&expanded).unwrap());
}

#[test]
fn negative_powers_of_sums_expand_in_the_denominator() {
    let node = Node::pow(Node::sum([lit("a"), lit("b")]), Node::int(-2));
    assert_eq!(canonicalize(&node).unwrap().to_string(), "(2*a*b+a^2+b^2)^(-1)");

    let node = Node::product([lit("c"), node]);
    assert_eq!(canonicalize(&node).unwrap().to_string(), "c/(2*a*b+a^2+b^2)");
}

#[test]
fn multi_term_powers_expand_to_distinct_terms() {
    let sum = Node::sum([lit("a"), lit("b"), lit("c")]);
    let node = Node::pow(sum, Node::int(2));
    assert_eq!(canonicalize(&node).unwrap().to_string(), "2*a*b+2*a*c+a^2+2*b*c+b^2+c^2");

    let sum = Node::sum([lit("a"), lit("b"), lit("c"), lit("d")]);
    let Node::Sum(expanded) = canonicalize(&Node::pow(sum, Node::int(16))).unwrap() else {
        panic!("expected a sum");
    };
    assert_eq!(expanded.len(), 969);
}

#[test]
fn oversized_expansions_are_kept() {
    let sum = Node::sum("abcdefgh".chars().map(|c| lit(&c.to_string())));
    let node = Node::pow(sum, Node::int(16));
    assert_eq!(canonicalize(&node).unwrap().to_string(), "(a+b+c+d+e+f+g+h)^16");
}

#[test]
fn distribution_over_two_sums() {
    let node = Node::product([
        Node::sum([lit("a"), lit("b")]),
        Node::sum([lit("c"), lit("d")]),
    ]);
    assert_eq!(canonicalize(&node).unwrap().to_string(), "a*c+a*d+b*c+b*d");
}

#[test]
fn zero_absorbs_every_factor() {
    let mut factors = mixed_factors();
    factors.push(Node::int(0));
    assert_eq!(canonicalize(&Node::product(factors)).unwrap(), Node::int(0));
}

#[test]
fn one_is_elided() {
    let mut factors = mixed_factors();
    let expected = canonicalize(&Node::product(factors.clone())).unwrap();
    factors.insert(3, Node::int(1));
    assert_eq!(canonicalize(&Node::product(factors)).unwrap(), expected);
}

#[test]
fn powers_accumulate() {
    let node = Node::product([
        lit("x"),
        Node::pow(lit("x"), Node::int(3)),
        Node::pow(lit("x"), Node::int(-2)),
    ]);
    assert_eq!(canonicalize(&node).unwrap().to_string(), "x^2");
}

#[test]
fn public_types_are_thread_safe() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Node>();
    assert_send_sync::<canon_compute::symbolic::ProductForm>();
    assert_send_sync::<canon_compute::symbolic::SumForm>();
    assert_send_sync::<canon_error::Error>();
}

/// A step taken while canonicalizing an expression.
///
/// Steps are pushed in the order the rewrites happen. Nested expressions are canonicalized first,
/// so their steps come before the steps of the expression containing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Nested products were spliced into their parent, or single-entry wrappers were removed.
    ///
    /// `a*(b*c) = a*b*c`
    Flatten,

    /// A power of a product was split into a product of powers.
    ///
    /// `(a*b)^n = a^n*b^n`
    OpenPowerOfProduct,

    /// Several numeric factors were folded into one coefficient.
    ///
    /// `2*x*3 = 6*x`
    FoldCoefficient,

    /// `0*a = 0`
    MultiplyZero,

    /// A coefficient of one was left out of the result.
    ///
    /// `1*a = a`
    MultiplyOne,

    /// Repeated occurrences of the same base were merged into one power.
    ///
    /// `a*a^b = a^(b+1)`
    CombineLikeFactors,

    /// Occurrences of a base cancelled out.
    ///
    /// `a/a = 1`
    CancelFactors,

    /// A power of a sum with an integer exponent was expanded into repeated factors.
    ///
    /// `(a+b)^2 = (a+b)*(a+b)`
    UnrollPower,

    /// A product containing sums was expanded.
    ///
    /// `(a+b)*c = a*c+b*c`
    DistributiveProperty,

    /// The factors of a product were put in canonical order.
    SortFactors,

    /// Terms with the same non-numeric part were combined.
    ///
    /// `2*a+3*a = 5*a`
    CombineLikeTerms,

    /// Terms cancelled out.
    ///
    /// `a-a = 0`
    CancelTerms,

    /// Numeric terms were folded into one constant term.
    ///
    /// `1+a+2 = a+3`
    FoldConstantTerms,

    /// `a^0 = 1`
    PowerZero,

    /// `a^1 = a`
    PowerOne,

    /// `1^a = 1`
    PowerOneLeft,

    /// `0^a = 0`, where `a` is a positive number.
    PowerZeroLeft,

    /// A number raised to a number was evaluated.
    ///
    /// `2^3 = 8`
    EvaluatePower,

    /// `(a^b)^n = a^(b*n)`, where `n` is an integer.
    PowerPower,

    /// A named constant was replaced by its approximate value.
    ApproximateConstant,
}

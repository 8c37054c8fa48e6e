//! Options that control canonicalization.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The default value of [`Options::unroll_limit`].
pub const DEFAULT_UNROLL_LIMIT: u32 = 16;

/// The default value of [`Options::expansion_limit`].
pub const DEFAULT_EXPANSION_LIMIT: u64 = 4096;

/// Options to use when canonicalizing an expression.
///
/// Use [`OptionsBuilder`] to build options that differ from the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Options {
    /// Whether named constants (`pi`, `e`) are replaced by their approximate values, so that they
    /// fold into numeric coefficients.
    ///
    /// The default value is `false`.
    pub approximate: bool,

    /// The largest magnitude of an integer exponent for which a power of a sum is expanded into
    /// repeated factors, such as `(a+b)^2 = (a+b)*(a+b)`. Powers with larger exponents are kept as
    /// they are.
    ///
    /// The default value is [`DEFAULT_UNROLL_LIMIT`].
    pub unroll_limit: u32,

    /// The largest number of distinct terms that expanding a power of a sum may produce. A power
    /// whose expansion would have more terms is kept, even if its exponent is within
    /// [`Options::unroll_limit`]. `(a+b+c)^2` has 6 terms, and in general a sum of `k` terms
    /// raised to `n` has `C(n+k-1, k-1)`.
    ///
    /// The default value is [`DEFAULT_EXPANSION_LIMIT`].
    pub expansion_limit: u64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            approximate: false,
            unroll_limit: DEFAULT_UNROLL_LIMIT,
            expansion_limit: DEFAULT_EXPANSION_LIMIT,
        }
    }
}

impl Options {
    /// Returns a builder initialized with these options.
    pub fn into_builder(self) -> OptionsBuilder {
        OptionsBuilder(self)
    }
}

/// A builder for [`Options`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionsBuilder(Options);

impl OptionsBuilder {
    /// Creates a new builder with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether named constants are replaced by their approximate values.
    pub fn approximate(mut self, approximate: bool) -> Self {
        self.0.approximate = approximate;
        self
    }

    /// Sets the largest exponent magnitude for which powers of sums are expanded.
    pub fn unroll_limit(mut self, unroll_limit: u32) -> Self {
        self.0.unroll_limit = unroll_limit;
        self
    }

    /// Sets the largest number of terms the expansion of a power of a sum may produce.
    pub fn expansion_limit(mut self, expansion_limit: u64) -> Self {
        self.0.expansion_limit = expansion_limit;
        self
    }

    /// Builds the options.
    pub fn build(self) -> Options {
        self.0
    }
}

//! Built-in defaults shared with the random element generator

/// Default R-MAT edge-placement probabilities `[a, b, c, d]`.
///
/// Returned by [`TestProperties::rmat_probabilities`](crate::TestProperties::rmat_probabilities)
/// when no value has been configured.
pub const DEFAULT_RMAT_PROBABILITIES: [f64; 4] = [0.57, 0.19, 0.19, 0.05];

/// Lower bound (inclusive) for the sum of the R-MAT probabilities
pub const RMAT_SUM_MIN: f64 = 0.999_999_999;

/// Upper bound (inclusive) for the sum of the R-MAT probabilities
pub const RMAT_SUM_MAX: f64 = 1.000_000_01;

/// Number of entries in an R-MAT probability quadruple
pub const RMAT_PROBABILITY_COUNT: usize = 4;

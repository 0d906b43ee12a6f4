//! Shannon entropy primitive.

/// Logarithmic unit for entropy values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::Display)]
pub enum Units {
    /// Log base 2.
    #[default]
    #[display("bits")]
    Bits,
    /// Natural log.
    #[display("nats")]
    Nats,
}

/// Error for distributions that carry no information to measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum EntropyError {
    /// The input sequence was empty.
    #[display("cannot take the entropy of an empty distribution")]
    EmptyDistribution,
    /// Normalisation was requested but the entries sum to zero.
    #[display("cannot normalise a distribution with zero total mass")]
    ZeroMass,
}

/// Computes the Shannon entropy `-Σ pᵢ·log(pᵢ)` of a distribution.
///
/// The input may be a probability mass function or raw counts; with
/// `normalise` set the entries are divided by their sum first, which makes
/// the result invariant to scale (`[2, 2, 0]` and `[0.5, 0.5, 0]` both give
/// 1 bit). Zero-probability entries contribute nothing rather than a NaN.
///
/// Entries that normalise to infinitesimally above 1 from floating error
/// must still come out at ≈ 0 entropy, so the result is clamped at zero
/// from below.
///
/// # Arguments
///
/// * `values` - Non-negative entries, either a pmf or raw counts
/// * `normalise` - Divide by the sum before measuring
/// * `units` - Logarithm base for the result
///
/// # Errors
///
/// * [`EntropyError::EmptyDistribution`] if `values` is empty
/// * [`EntropyError::ZeroMass`] if `normalise` is set and the sum is ≤ 0
///
/// # Examples
///
/// ```
/// use ergodic_core::{Units, shannon_entropy};
///
/// assert_eq!(shannon_entropy(&[1.0, 0.0, 0.0], true, Units::Bits).unwrap(), 0.0);
/// assert_eq!(shannon_entropy(&[0.5, 0.5, 0.0], true, Units::Bits).unwrap(), 1.0);
/// ```
pub fn shannon_entropy(values: &[f64], normalise: bool, units: Units) -> Result<f64, EntropyError> {
    if values.is_empty() {
        return Err(EntropyError::EmptyDistribution);
    }

    let total = if normalise {
        let sum = values.iter().sum::<f64>();
        if sum <= 0.0 {
            return Err(EntropyError::ZeroMass);
        }
        sum
    } else {
        1.0
    };

    let mut entropy = 0.0;
    for &value in values {
        let p = value / total;
        if p > 0.0 {
            let log_p = match units {
                Units::Bits => p.log2(),
                Units::Nats => p.ln(),
            };
            entropy -= p * log_p;
        }
    }

    // A nominal sum of 1 plus rounding noise would otherwise come out as a
    // tiny negative number.
    Ok(entropy.max(0.0))
}

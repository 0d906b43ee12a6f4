//! Bin-edge planner.
//!
//! Derives a monotonic set of bin edges from raw grouped observations so
//! that every ensemble can be histogrammed on a common support.

/// Error for malformed bin configurations.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum BinError {
    /// No observations to derive a range from.
    #[display("no observations to derive bin edges from")]
    NoObservations,
    /// A caller-supplied minimum must not be stricter than the data.
    #[display("minimum {minimum} > observed min {observed}")]
    MinimumAboveObserved { minimum: f64, observed: f64 },
    /// A caller-supplied maximum must not be stricter than the data.
    #[display("maximum {maximum} < observed max {observed}")]
    MaximumBelowObserved { maximum: f64, observed: f64 },
    /// Fewer than 2 bins cannot hold a distribution.
    #[display("{edges} edges form fewer than 2 bins")]
    TooFewBins { edges: usize },
    /// Bin edges must be strictly increasing.
    #[display("bin edges are not strictly increasing")]
    NotIncreasing,
    /// Supplied edges must span every observation.
    #[display(
        "bin edges [{low}, {high}] do not cover observed range [{observed_min}, {observed_max}]"
    )]
    RangeNotCovered {
        low: f64,
        high: f64,
        observed_min: f64,
        observed_max: f64,
    },
}

/// Computes bin edges spanning the observed range of all groups.
///
/// With `count` omitted, one bin per integer unit is used:
/// `count = ⌈max - min⌉ + 1`. The edges are `count + 1` evenly spaced
/// points over `[minimum, maximum + 1]`; the `+1` keeps the observed
/// maximum strictly inside the last bin rather than on its boundary.
///
/// When every observation is one value the default collapses to a single
/// bin and the returned 2-edge set is too coarse for
/// [`ErgodicEnsemble`](crate::ErgodicEnsemble), which needs at least two
/// bins; pass an explicit `count` (or widen the range) for constant data.
///
/// # Arguments
///
/// * `observations` - One flat numeric sequence per group
/// * `count` - Number of bins, or `None` for one per integer unit
/// * `minimum` - Lower edge override; must not exceed the observed minimum
/// * `maximum` - Range override; must not be below the observed maximum
///
/// # Errors
///
/// [`BinError::NoObservations`] when every group is empty, or
/// [`BinError::MinimumAboveObserved`] / [`BinError::MaximumBelowObserved`]
/// when an override is stricter than the data.
///
/// # Examples
///
/// ```
/// use ergodic_core::edges_from_range;
///
/// let edges = edges_from_range(&[vec![0.0, 1.0, 3.0], vec![0.0, 5.0]], None, None, None).unwrap();
/// assert_eq!(edges, [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
/// ```
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn edges_from_range(
    observations: &[Vec<f64>],
    count: Option<usize>,
    minimum: Option<f64>,
    maximum: Option<f64>,
) -> Result<Vec<f64>, BinError> {
    let mut values = observations.iter().flatten().copied();
    let first = values.next().ok_or(BinError::NoObservations)?;
    let (observed_min, observed_max) =
        values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));

    let minimum = match minimum {
        Some(m) if m > observed_min => {
            return Err(BinError::MinimumAboveObserved {
                minimum: m,
                observed: observed_min,
            });
        }
        Some(m) => m,
        None => observed_min,
    };
    let maximum = match maximum {
        Some(m) if m < observed_max => {
            return Err(BinError::MaximumBelowObserved {
                maximum: m,
                observed: observed_max,
            });
        }
        Some(m) => m,
        None => observed_max,
    };

    let count = match count {
        Some(c) if c < 2 => return Err(BinError::TooFewBins { edges: c + 1 }),
        Some(c) => c,
        None => (maximum - minimum).ceil() as usize + 1,
    };

    Ok(linspace(minimum, maximum + 1.0, count + 1))
}

/// All-defaults convenience wrapper around [`edges_from_range`], returning
/// a ready-to-use edge set for direct histogramming.
pub fn edges_from_observations(observations: &[Vec<f64>]) -> Result<Vec<f64>, BinError> {
    edges_from_range(observations, None, None, None)
}

/// `points` evenly spaced values from `start` to `end` inclusive.
#[expect(clippy::cast_precision_loss)]
fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    let span = end - start;
    let steps = (points - 1) as f64;
    (0..points).map(|i| start + span * (i as f64) / steps).collect()
}

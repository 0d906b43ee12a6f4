//! Single-snapshot aggregate of grouped observations.

use crate::{
    bins::BinError,
    chi2::{self, ContingencyResult},
    entropy::Units,
    measures::{MeasureError, MeasureSet, measures},
    observations::Groups,
};

/// Error raised when a snapshot cannot be constructed.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum EnsembleError {
    /// Every group was empty.
    #[display("ensemble has no observations")]
    NoObservations,
    /// The bin edges were malformed or did not cover the data.
    #[display("{_0}")]
    #[from]
    Bin(BinError),
    /// The derived histograms could not be combined.
    #[display("{_0}")]
    #[from]
    Measure(MeasureError),
}

/// `(min, mean, max)` sample count across groups, used to contextualize
/// significance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObsCounts {
    pub min: usize,
    pub mean: f64,
    pub max: usize,
}

/// Heuristic "is this complexity plausibly just noise" check.
///
/// The thresholds shrink as `1/obs_count_mean` and `sqrt(2)/obs_count_mean`,
/// reflecting the expected sampling error of an entropy estimate with a
/// finite sample. Independent of the chi-squared path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseCheck {
    /// `1 / obs_count_mean`.
    pub noise_threshold: f64,
    /// `sqrt(2) / obs_count_mean`.
    pub spread_threshold: f64,
    /// Complexity exceeds the noise threshold.
    pub above_noise: bool,
    /// Complexity exceeds the larger spread threshold.
    pub above_spread: bool,
}

/// A single-snapshot aggregate: one set of grouped observations plus bin
/// edges, with histograms and the full measure bundle derived from them.
///
/// Immutable after construction; every derived quantity is computed exactly
/// once, at construction, and read back through accessors.
///
/// # Examples
///
/// ```
/// use ergodic_core::{ErgodicEnsemble, Units};
///
/// let observations = vec![vec![0.0, 0.0, 1.0, 0.0], vec![0.0, 1.0, 1.0]];
/// let bins = vec![0.0, 1.0, 2.0];
/// let ee = ErgodicEnsemble::new(observations, bins, Units::Bits, None).unwrap();
/// assert!(ee.complexity() >= 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ErgodicEnsemble {
    observations: Groups,
    bins: Vec<f64>,
    units: Units,
    boost: f64,
    histograms: Vec<Vec<u64>>,
    ergodic_histogram: Vec<f64>,
    measures: MeasureSet,
    obs_counts: ObsCounts,
    chi2_test: Option<ContingencyResult>,
}

impl ErgodicEnsemble {
    /// Builds a snapshot from observation groups and bin edges.
    ///
    /// `boost` is the effective sample-size scale for the `tau2` statistic;
    /// `None` defaults it to the mean observation count across groups.
    ///
    /// # Errors
    ///
    /// A bin-configuration error if there are fewer than 2 bins, the edges
    /// are not strictly increasing, or they do not cover the observed range
    /// (the top edge is inclusive of the observed maximum); an
    /// input-validity error if no group holds any observation.
    #[expect(clippy::cast_precision_loss)]
    pub fn new(
        observations: impl Into<Groups>,
        bins: Vec<f64>,
        units: Units,
        boost: Option<f64>,
    ) -> Result<Self, EnsembleError> {
        let observations = observations.into();

        if bins.len() < 3 {
            return Err(BinError::TooFewBins { edges: bins.len() }.into());
        }
        if bins.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(BinError::NotIncreasing.into());
        }

        let groups = observations.groups();
        let occupied: Vec<&[f64]> = groups.iter().copied().filter(|g| !g.is_empty()).collect();
        if occupied.is_empty() {
            return Err(EnsembleError::NoObservations);
        }

        let mut values = occupied.iter().flat_map(|group| group.iter().copied());
        let first = values.next().ok_or(EnsembleError::NoObservations)?;
        let (observed_min, observed_max) =
            values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let (low, high) = (bins[0], bins[bins.len() - 1]);
        if observed_min < low || observed_max > high {
            return Err(BinError::RangeNotCovered {
                low,
                high,
                observed_min,
                observed_max,
            }
            .into());
        }

        let histograms: Vec<Vec<u64>> =
            occupied.iter().map(|group| histogram(group, &bins)).collect();
        let ergodic_histogram = mean_histogram(&histograms);
        let obs_counts = ObsCounts::from_groups(&groups);
        let boost = boost.unwrap_or(obs_counts.mean);

        let counts: Vec<Vec<f64>> = histograms
            .iter()
            .map(|hist| hist.iter().map(|&c| c as f64).collect())
            .collect();
        let measures = measures(&counts, units, boost)?;
        let chi2_test = chi2::chi2_contingency(&histograms);

        Ok(Self {
            observations,
            bins,
            units,
            boost,
            histograms,
            ergodic_histogram,
            measures,
            obs_counts,
            chi2_test,
        })
    }

    /// Per-group histograms over the shared edges; empty groups excluded.
    #[must_use]
    pub fn histograms(&self) -> &[Vec<u64>] {
        &self.histograms
    }

    /// The mean (not sum) of all group histograms: equal-weight pooling.
    #[must_use]
    pub fn ergodic_histogram(&self) -> &[f64] {
        &self.ergodic_histogram
    }

    /// The full measure bundle of this snapshot.
    #[must_use]
    pub fn measures(&self) -> &MeasureSet {
        &self.measures
    }

    /// Shannon entropy of each occupied group.
    #[must_use]
    pub fn entropies(&self) -> &[f64] {
        &self.measures.entropies
    }

    /// The average (mean) ensemble entropy.
    #[must_use]
    pub fn ensemble(&self) -> f64 {
        self.measures.ensemble
    }

    /// The entropy of the ergodic (pooled) distribution.
    #[must_use]
    pub fn ergodic(&self) -> f64 {
        self.measures.ergodic
    }

    /// Gap between ergodic and mean ensemble entropy.
    #[must_use]
    pub fn divergence(&self) -> f64 {
        self.measures.divergence
    }

    /// The ergodicity-breaking score, `sqrt(divergence)`.
    #[must_use]
    pub fn complexity(&self) -> f64 {
        self.measures.complexity
    }

    /// Fast divergence-based heterogeneity statistic.
    #[must_use]
    pub fn tau2(&self) -> f64 {
        self.measures.tau2
    }

    /// Upper-tail p-value of [`tau2`](Self::tau2).
    #[must_use]
    pub fn tau2p(&self) -> f64 {
        self.measures.tau2p
    }

    /// Number of occupied ensembles.
    #[must_use]
    pub fn ensemble_count(&self) -> usize {
        self.histograms.len()
    }

    /// `(min, mean, max)` sample count across all groups.
    #[must_use]
    pub fn obs_counts(&self) -> ObsCounts {
        self.obs_counts
    }

    /// Exact two-way contingency chi-squared test over the
    /// ensembles × bins histogram table.
    ///
    /// `None` when the table is degenerate (e.g. a bin total of zero);
    /// this is an expected edge case, not an error.
    #[must_use]
    pub fn chi2_test(&self) -> Option<ContingencyResult> {
        self.chi2_test
    }

    /// Heuristic noise-floor comparison for the observed complexity.
    #[must_use]
    pub fn noise_check(&self) -> NoiseCheck {
        let mean = self.obs_counts.mean;
        let noise_threshold = 1.0 / mean;
        let spread_threshold = std::f64::consts::SQRT_2 / mean;
        NoiseCheck {
            noise_threshold,
            spread_threshold,
            above_noise: self.complexity() > noise_threshold,
            above_spread: self.complexity() > spread_threshold,
        }
    }

    /// Complexity squashed into `[0, 1)` for display.
    ///
    /// Uses `tanh`: monotonic, and with derivative 1 at the origin it is
    /// the identity near zero.
    #[must_use]
    pub fn bounded_complexity(&self) -> f64 {
        self.complexity().tanh()
    }

    /// The bin edges this snapshot was histogrammed on.
    #[must_use]
    pub fn bins(&self) -> &[f64] {
        &self.bins
    }

    /// The entropy unit in use.
    #[must_use]
    pub fn units(&self) -> Units {
        self.units
    }

    /// The `tau2` sample-size scale in use.
    #[must_use]
    pub fn boost(&self) -> f64 {
        self.boost
    }

    /// The observation groups this snapshot owns.
    #[must_use]
    pub fn observations(&self) -> &Groups {
        &self.observations
    }

    /// Display labels, one per group.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.observations.labels()
    }

    /// Human-readable statistics block.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{:.1}% ergodic complexity\n\
             {:.1}% bounded complexity\n\
             {:.3} ({:.3}) average ensemble (ergodic) {}\n\
             From {} ensembles\n\
             With {} bins from {} to {}.\n",
            self.complexity() * 100.0,
            self.bounded_complexity() * 100.0,
            self.ensemble(),
            self.ergodic(),
            self.units,
            self.ensemble_count(),
            self.bins.len() - 1,
            self.bins[0],
            self.bins[self.bins.len() - 1],
        )
    }
}

impl ObsCounts {
    #[expect(clippy::cast_precision_loss)]
    fn from_groups(groups: &[&[f64]]) -> Self {
        let counts: Vec<usize> = groups.iter().map(|group| group.len()).collect();
        let min = counts.iter().copied().min().unwrap_or(0);
        let max = counts.iter().copied().max().unwrap_or(0);
        let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
        Self { min, mean, max }
    }
}

/// Counts `values` into the bins defined by `edges`.
///
/// Bins are half-open `[edges[i], edges[i+1])` except the last, which also
/// includes the top edge, matching the planner's coverage contract.
fn histogram(values: &[f64], edges: &[f64]) -> Vec<u64> {
    let bin_count = edges.len() - 1;
    let mut counts = vec![0_u64; bin_count];
    for &value in values {
        let idx = edges.partition_point(|&edge| edge <= value);
        // idx == 0 cannot happen: coverage was validated up front
        let idx = (idx - 1).min(bin_count - 1);
        counts[idx] += 1;
    }
    counts
}

#[expect(clippy::cast_precision_loss)]
fn mean_histogram(histograms: &[Vec<u64>]) -> Vec<f64> {
    let n = histograms.len() as f64;
    let bin_count = histograms.first().map_or(0, Vec::len);
    (0..bin_count)
        .map(|bin| histograms.iter().map(|hist| hist[bin] as f64).sum::<f64>() / n)
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg64;

    use crate::bins::edges_from_range;

    use super::*;

    fn snapshot() -> ErgodicEnsemble {
        let observations = vec![vec![0.0, 0.0, 1.0, 0.0], vec![0.0, 1.0, 1.0]];
        ErgodicEnsemble::new(observations, vec![0.0, 1.0, 2.0], Units::Bits, None).unwrap()
    }

    #[test]
    fn histograms_and_pooling() {
        let ee = snapshot();
        assert_eq!(ee.histograms(), [vec![3, 1], vec![1, 2]]);
        assert_eq!(ee.ergodic_histogram(), [2.0, 1.5]);
        assert_eq!(ee.ensemble_count(), 2);
    }

    #[test]
    fn measures_match_the_engine_on_the_histogram_table() {
        let ee = snapshot();
        let expected = measures(
            &[vec![3.0, 1.0], vec![1.0, 2.0]],
            Units::Bits,
            ee.obs_counts().mean,
        )
        .unwrap();
        assert_eq!(ee.measures(), &expected);
        assert_abs_diff_eq!(ee.complexity(), ee.divergence().sqrt(), epsilon = 1e-15);
    }

    #[test]
    fn obs_counts_span_the_groups() {
        let ee = snapshot();
        assert_eq!(
            ee.obs_counts(),
            ObsCounts {
                min: 3,
                mean: 3.5,
                max: 4
            }
        );
        // default boost is the mean count
        assert_abs_diff_eq!(ee.boost(), 3.5, epsilon = 1e-15);
    }

    #[test]
    fn top_edge_is_inclusive() {
        let ee = ErgodicEnsemble::new(
            vec![vec![0.0, 2.0], vec![1.0, 2.0]],
            vec![0.0, 1.0, 2.0],
            Units::Bits,
            None,
        )
        .unwrap();
        assert_eq!(ee.histograms(), [vec![1, 1], vec![0, 2]]);
    }

    #[test]
    fn empty_groups_are_excluded_from_histograms() {
        let observations = vec![vec![0.5], vec![], vec![1.5]];
        let ee =
            ErgodicEnsemble::new(observations, vec![0.0, 1.0, 2.0], Units::Bits, None).unwrap();
        assert_eq!(ee.ensemble_count(), 2);
        // obs_counts still sees every group
        assert_eq!(ee.obs_counts().min, 0);
    }

    #[test]
    fn labelled_input_keeps_labels() {
        let observations = vec![
            ("UK".to_string(), vec![0.0, 0.0, 1.0]),
            ("US".to_string(), vec![0.0, 1.0]),
        ];
        let ee =
            ErgodicEnsemble::new(observations, vec![0.0, 1.0, 2.0], Units::Bits, None).unwrap();
        assert_eq!(ee.labels(), ["UK", "US"]);
    }

    #[test]
    fn construction_validates_bins() {
        let observations = vec![vec![0.0, 1.0], vec![1.0, 2.0]];
        assert_eq!(
            ErgodicEnsemble::new(observations.clone(), vec![0.0, 2.5], Units::Bits, None),
            Err(BinError::TooFewBins { edges: 2 }.into())
        );
        assert_eq!(
            ErgodicEnsemble::new(observations.clone(), vec![0.0, 2.0, 1.0], Units::Bits, None),
            Err(BinError::NotIncreasing.into())
        );
        assert_eq!(
            ErgodicEnsemble::new(observations, vec![0.0, 0.75, 1.5], Units::Bits, None),
            Err(BinError::RangeNotCovered {
                low: 0.0,
                high: 1.5,
                observed_min: 0.0,
                observed_max: 2.0
            }
            .into())
        );
    }

    #[test]
    fn all_empty_groups_fail() {
        assert_eq!(
            ErgodicEnsemble::new(
                vec![Vec::<f64>::new(), Vec::new()],
                vec![0.0, 1.0, 2.0],
                Units::Bits,
                None
            ),
            Err(EnsembleError::NoObservations)
        );
    }

    #[test]
    fn chi2_test_is_none_for_a_degenerate_table() {
        // all observations land in the first bin: second bin total is zero
        let ee = ErgodicEnsemble::new(
            vec![vec![0.1, 0.2], vec![0.3]],
            vec![0.0, 1.0, 2.0],
            Units::Bits,
            None,
        )
        .unwrap();
        assert!(ee.chi2_test().is_none());
    }

    #[test]
    fn chi2_test_agrees_with_the_fast_statistic_direction() {
        let ee = ErgodicEnsemble::new(
            vec![vec![0.5; 50], vec![1.5; 50]],
            vec![0.0, 1.0, 2.0],
            Units::Bits,
            None,
        )
        .unwrap();
        let exact = ee.chi2_test().unwrap();
        assert!(exact.p_value < 1e-6);
        assert!(ee.tau2p() < 1e-6);
    }

    #[test]
    fn noise_check_flags() {
        // disjoint groups of 2 observations: complexity 1, mean count 2
        let distinct = ErgodicEnsemble::new(
            vec![vec![0.5, 0.5], vec![1.5, 1.5]],
            vec![0.0, 1.0, 2.0],
            Units::Bits,
            None,
        )
        .unwrap();
        let check = distinct.noise_check();
        assert_abs_diff_eq!(check.noise_threshold, 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(check.spread_threshold, std::f64::consts::SQRT_2 / 2.0, epsilon = 1e-15);
        assert!(check.above_noise);
        assert!(check.above_spread);

        let identical = ErgodicEnsemble::new(
            vec![vec![0.5, 1.5], vec![0.5, 1.5]],
            vec![0.0, 1.0, 2.0],
            Units::Bits,
            None,
        )
        .unwrap();
        let check = identical.noise_check();
        assert!(!check.above_noise);
        assert!(!check.above_spread);
    }

    #[test]
    fn bounded_complexity_is_a_gentle_squash() {
        let ee = snapshot();
        let bounded = ee.bounded_complexity();
        assert!((0.0..1.0).contains(&bounded));
        assert!(bounded <= ee.complexity());
        // identity near zero
        assert_abs_diff_eq!(0.001_f64.tanh(), 0.001, epsilon = 1e-6);
    }

    #[test]
    fn identical_distributions_have_negligible_complexity() {
        let mut rng = Pcg64::seed_from_u64(0x1968_0800);
        let observations: Vec<Vec<f64>> = (0..10)
            .map(|_| (0..100_000).map(|_| rng.random_range(0.0..10.0)).collect())
            .collect();
        let bins = edges_from_range(&observations, Some(5), None, None).unwrap();
        let ee = ErgodicEnsemble::new(observations, bins, Units::Bits, None).unwrap();
        assert_abs_diff_eq!(ee.complexity(), 0.0, epsilon = 0.01);
    }

    #[test]
    fn summary_mentions_the_headline_numbers() {
        let summary = snapshot().summary();
        assert!(summary.contains("ergodic complexity"));
        assert!(summary.contains("From 2 ensembles"));
        assert!(summary.contains("With 2 bins"));
    }
}

//! Combination of per-ensemble distributions into the named measure bundle.

use crate::{
    chi2,
    entropy::{EntropyError, Units, shannon_entropy},
};

/// The measure bundle for one snapshot of grouped distributions.
///
/// Field order is canonical: `ensemble, ergodic, divergence, complexity,
/// tau2, tau2p, entropies`. [`MeasureSet::NAMES`] enumerates the scalar
/// measures in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureSet {
    /// Mean of the per-ensemble entropies: the average within-group
    /// uncertainty.
    pub ensemble: f64,
    /// Entropy of the equally-weighted pooled distribution.
    pub ergodic: f64,
    /// `ergodic - ensemble`, clamped at 0 from below.
    pub divergence: f64,
    /// `sqrt(divergence)`: the ergodicity-breaking score.
    pub complexity: f64,
    /// `boost · divergence · (ensemble_count - 1)`, a fast proxy for a
    /// contingency chi-squared statistic.
    pub tau2: f64,
    /// Upper-tail chi-squared p-value of `tau2`.
    pub tau2p: f64,
    /// Shannon entropy of each ensemble, in input order.
    pub entropies: Vec<f64>,
}

impl MeasureSet {
    /// Scalar measure names in canonical order.
    pub const NAMES: [&'static str; 6] = [
        "ensemble",
        "ergodic",
        "divergence",
        "complexity",
        "tau2",
        "tau2p",
    ];

    /// Looks up a scalar measure by its canonical name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "ensemble" => Some(self.ensemble),
            "ergodic" => Some(self.ergodic),
            "divergence" => Some(self.divergence),
            "complexity" => Some(self.complexity),
            "tau2" => Some(self.tau2),
            "tau2p" => Some(self.tau2p),
            _ => None,
        }
    }

    /// The scalar measures as `(name, value)` pairs in canonical order.
    #[must_use]
    pub fn scalars(&self) -> [(&'static str, f64); 6] {
        [
            ("ensemble", self.ensemble),
            ("ergodic", self.ergodic),
            ("divergence", self.divergence),
            ("complexity", self.complexity),
            ("tau2", self.tau2),
            ("tau2p", self.tau2p),
        ]
    }
}

/// Error for invalid sets of per-ensemble distributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum MeasureError {
    /// The set of distributions was empty.
    #[display("no ensembles supplied")]
    NoEnsembles,
    /// Groups must share one bin layout to be pooled elementwise.
    #[display("ensemble pmfs have mismatched bin counts: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },
    /// A group could not be turned into a distribution.
    #[display("{_0}")]
    #[from]
    Entropy(EntropyError),
}

/// Combines per-ensemble pmfs (or raw count groups, normalized first) into
/// a [`MeasureSet`].
///
/// Every group is weighted equally regardless of its mass: the pooled
/// "ergodic" distribution is the elementwise mean of the normalized pmfs,
/// not a merge of raw counts. By Jensen's inequality the pooled entropy
/// then dominates the mean entropy, so the divergence is non-negative up to
/// floating drift (and clamped against it).
///
/// `boost` is an effective sample-size scale for the `tau2` statistic; its
/// calibration is a deployment choice. The p-value uses
/// `dof = (bin_count - 1)·(ensemble_count - 1)`, matching a two-way
/// contingency test over the same ensembles × bins table.
///
/// # Errors
///
/// * [`MeasureError::NoEnsembles`] on empty input
/// * [`MeasureError::LengthMismatch`] if groups have unequal bin counts
/// * [`MeasureError::Entropy`] if a group has zero total mass
///
/// # Examples
///
/// ```
/// use ergodic_core::{Units, measures};
///
/// let mms = measures(&[vec![0.0, 1.0], vec![1.0, 0.0]], Units::Bits, 2000.0).unwrap();
/// assert_eq!(mms.complexity, 1.0);
/// assert_eq!(mms.tau2, 2000.0);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn measures(pmfs: &[Vec<f64>], units: Units, boost: f64) -> Result<MeasureSet, MeasureError> {
    let Some(first) = pmfs.first() else {
        return Err(MeasureError::NoEnsembles);
    };
    let bin_count = first.len();
    for pmf in pmfs {
        if pmf.len() != bin_count {
            return Err(MeasureError::LengthMismatch {
                expected: bin_count,
                found: pmf.len(),
            });
        }
    }

    let mut normalised = Vec::with_capacity(pmfs.len());
    for pmf in pmfs {
        let sum = pmf.iter().sum::<f64>();
        if sum <= 0.0 {
            return Err(EntropyError::ZeroMass.into());
        }
        normalised.push(pmf.iter().map(|v| v / sum).collect::<Vec<f64>>());
    }

    let entropies = normalised
        .iter()
        .map(|pmf| shannon_entropy(pmf, false, units))
        .collect::<Result<Vec<f64>, _>>()?;

    let n = normalised.len() as f64;
    let ensemble = entropies.iter().sum::<f64>() / n;

    let pooled: Vec<f64> = (0..bin_count)
        .map(|bin| normalised.iter().map(|pmf| pmf[bin]).sum::<f64>() / n)
        .collect();
    let ergodic = shannon_entropy(&pooled, false, units)?;

    let divergence = (ergodic - ensemble).max(0.0);
    let complexity = divergence.sqrt();

    let tau2 = boost * divergence * (n - 1.0);
    let dof = bin_count.saturating_sub(1) * normalised.len().saturating_sub(1);
    let tau2p = chi2::chi2_survival(tau2, dof);

    Ok(MeasureSet {
        ensemble,
        ergodic,
        divergence,
        complexity,
        tau2,
        tau2p,
        entropies,
    })
}

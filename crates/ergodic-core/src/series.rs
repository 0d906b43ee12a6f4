//! Time-indexed aggregation of snapshots.

use crate::{
    bins::{BinError, edges_from_observations},
    ensemble::{EnsembleError, ErgodicEnsemble},
    entropy::Units,
};

/// Error raised when a series cannot be constructed.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SeriesError {
    /// The step list was empty.
    #[display("series has no steps")]
    Empty,
    /// A supplied x axis must match the number of steps.
    #[display("x axis has {x_len} values for {steps} steps")]
    AxisLengthMismatch { x_len: usize, steps: usize },
    /// The shared bin edges could not be derived.
    #[display("{_0}")]
    #[from]
    Bin(BinError),
    /// A per-step snapshot could not be built.
    #[display("{_0}")]
    #[from]
    Ensemble(EnsembleError),
}

/// One time series per measure, in canonical order, each of length `steps`.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureSeries {
    pub ensemble: Vec<f64>,
    pub ergodic: Vec<f64>,
    pub divergence: Vec<f64>,
    pub complexity: Vec<f64>,
    pub tau2: Vec<f64>,
    pub tau2p: Vec<f64>,
}

impl MeasureSeries {
    fn from_steps(steps: &[ErgodicEnsemble]) -> Self {
        Self {
            ensemble: steps.iter().map(ErgodicEnsemble::ensemble).collect(),
            ergodic: steps.iter().map(ErgodicEnsemble::ergodic).collect(),
            divergence: steps.iter().map(ErgodicEnsemble::divergence).collect(),
            complexity: steps.iter().map(ErgodicEnsemble::complexity).collect(),
            tau2: steps.iter().map(ErgodicEnsemble::tau2).collect(),
            tau2p: steps.iter().map(ErgodicEnsemble::tau2p).collect(),
        }
    }

    /// Looks up one measure's series by its canonical name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        match name {
            "ensemble" => Some(&self.ensemble),
            "ergodic" => Some(&self.ergodic),
            "divergence" => Some(&self.divergence),
            "complexity" => Some(&self.complexity),
            "tau2" => Some(&self.tau2),
            "tau2p" => Some(&self.tau2p),
            _ => None,
        }
    }

    /// The series as `(name, values)` pairs in canonical order.
    #[must_use]
    pub fn by_name(&self) -> [(&'static str, &[f64]); 6] {
        [
            ("ensemble", &self.ensemble),
            ("ergodic", &self.ergodic),
            ("divergence", &self.divergence),
            ("complexity", &self.complexity),
            ("tau2", &self.tau2),
            ("tau2p", &self.tau2p),
        ]
    }
}

/// One scalar per measure, in canonical order; produced by the series
/// summaries [`ErgodicSeries::peak`] and [`ErgodicSeries::trend`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureSummary {
    pub ensemble: f64,
    pub ergodic: f64,
    pub divergence: f64,
    pub complexity: f64,
    pub tau2: f64,
    pub tau2p: f64,
}

impl MeasureSummary {
    fn map(series: &MeasureSeries, f: impl Fn(&[f64]) -> f64) -> Self {
        Self {
            ensemble: f(&series.ensemble),
            ergodic: f(&series.ergodic),
            divergence: f(&series.divergence),
            complexity: f(&series.complexity),
            tau2: f(&series.tau2),
            tau2p: f(&series.tau2p),
        }
    }

    /// The summary as `(name, value)` pairs in canonical order.
    #[must_use]
    pub fn by_name(&self) -> [(&'static str, f64); 6] {
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

/// An ordered sequence of `(x, ErgodicEnsemble)` pairs tracking every
/// measure across an ordered sequence of steps.
///
/// Built once, from either raw per-step observation groups (one shared
/// bin-edge set is derived from the pooled cross-step observations) or a
/// caller-supplied list of pre-built snapshots; exactly one of the two
/// construction paths is used per instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ErgodicSeries {
    x: Vec<f64>,
    ensembles: Vec<ErgodicEnsemble>,
    entropies: Vec<Vec<f64>>,
    series: MeasureSeries,
}

impl ErgodicSeries {
    /// Builds a series from raw per-step observation groups.
    ///
    /// All steps are histogrammed on one shared edge set derived from the
    /// pooled observations, so per-step entropies are comparable.
    ///
    /// # Errors
    ///
    /// [`SeriesError::Empty`] for an empty step list,
    /// [`SeriesError::AxisLengthMismatch`] when `x` does not match, or the
    /// underlying bin/snapshot error.
    pub fn from_observations(
        x: Option<Vec<f64>>,
        observations: Vec<Vec<Vec<f64>>>,
        units: Units,
        boost: Option<f64>,
    ) -> Result<Self, SeriesError> {
        if observations.is_empty() {
            return Err(SeriesError::Empty);
        }

        let pooled: Vec<Vec<f64>> = observations.iter().flatten().cloned().collect();
        let bins = edges_from_observations(&pooled)?;

        let ensembles = observations
            .into_iter()
            .map(|step| ErgodicEnsemble::new(step, bins.clone(), units, boost))
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_ensembles(x, ensembles)
    }

    /// Builds a series from pre-built snapshots.
    ///
    /// `x` defaults to `0..steps` when not supplied.
    ///
    /// # Errors
    ///
    /// [`SeriesError::Empty`] for an empty snapshot list or
    /// [`SeriesError::AxisLengthMismatch`] when `x` does not match.
    #[expect(clippy::cast_precision_loss)]
    pub fn from_ensembles(
        x: Option<Vec<f64>>,
        ensembles: Vec<ErgodicEnsemble>,
    ) -> Result<Self, SeriesError> {
        if ensembles.is_empty() {
            return Err(SeriesError::Empty);
        }

        let steps = ensembles.len();
        let x = match x {
            Some(x) if x.len() != steps => {
                return Err(SeriesError::AxisLengthMismatch {
                    x_len: x.len(),
                    steps,
                });
            }
            Some(x) => x,
            None => (0..steps).map(|i| i as f64).collect(),
        };

        let entropies = ensembles
            .iter()
            .map(|ee| ee.entropies().to_vec())
            .collect();
        let series = MeasureSeries::from_steps(&ensembles);

        Ok(Self {
            x,
            ensembles,
            entropies,
            series,
        })
    }

    /// The x coordinate of each step.
    #[must_use]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// The per-step snapshots, in order.
    #[must_use]
    pub fn ensembles(&self) -> &[ErgodicEnsemble] {
        &self.ensembles
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ensembles.len()
    }

    /// Always false: construction rejects empty step lists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ensembles.is_empty()
    }

    /// The per-step entropy vectors stacked into a
    /// `(steps × ensembles_per_step)` matrix.
    #[must_use]
    pub fn entropies(&self) -> &[Vec<f64>] {
        &self.entropies
    }

    /// Every measure as a time series of length `steps`.
    #[must_use]
    pub fn measures(&self) -> &MeasureSeries {
        &self.series
    }

    /// One measure's series by canonical name.
    #[must_use]
    pub fn measure(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name)
    }

    /// Per-measure peak: the maximum over steps.
    ///
    /// Together with [`trend`](Self::trend) (the mean) this guarantees
    /// `peak ≥ trend` for every measure.
    #[must_use]
    pub fn peak(&self) -> MeasureSummary {
        MeasureSummary::map(&self.series, |values| {
            values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        })
    }

    /// Per-measure trend: the arithmetic mean over steps.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn trend(&self) -> MeasureSummary {
        MeasureSummary::map(&self.series, |values| {
            values.iter().sum::<f64>() / values.len() as f64
        })
    }

    /// Step indices that are strict local maxima of the complexity series.
    ///
    /// Boundary steps compare against their single neighbour, so a 2-step
    /// rising series yields `[1]`. Plateaus produce no peak.
    #[must_use]
    pub fn peaks(&self) -> Vec<usize> {
        let complexity = &self.series.complexity;
        let last = complexity.len() - 1;
        (0..complexity.len())
            .filter(|&i| {
                let rises = i == 0 || complexity[i] > complexity[i - 1];
                let falls = i == last || complexity[i] > complexity[i + 1];
                rises && falls
            })
            .collect()
    }
}

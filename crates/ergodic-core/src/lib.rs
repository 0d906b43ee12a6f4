//! Ergodicity-breaking complexity measures for grouped observations.
//!
//! Quantifies whether a population split into sub-groups ("ensembles")
//! behaves like a single pooled ("ergodic") process, using information
//! theory rather than classical hypothesis tests. Each ensemble is
//! histogrammed on a common support; the gap between the entropy of the
//! equally-weighted pooled distribution and the mean per-ensemble entropy
//! (non-negative by Jensen's inequality) is the divergence, and its square
//! root is the headline complexity score.
//!
//! # Modules
//!
//! - [`entropy`]: the Shannon-entropy primitive
//! - [`bins`]: bin-edge planning over raw grouped observations
//! - [`measures`]: combination of per-ensemble pmfs into the measure bundle
//! - [`chi2`]: chi-squared significance support
//! - [`observations`]: positional vs. labelled group input
//! - [`ensemble`]: the single-snapshot aggregate
//! - [`series`]: time-indexed aggregation of snapshots
//!
//! # Examples
//!
//! ```
//! use ergodic_core::{ErgodicEnsemble, Units, edges_from_observations};
//!
//! let observations = vec![
//!     ("UK".to_string(), vec![2.0, 3.0, 3.0, 4.0]),
//!     ("US".to_string(), vec![1.0, 1.0, 2.0, 1.0]),
//! ];
//! let groups: Vec<Vec<f64>> = observations.iter().map(|(_, g)| g.clone()).collect();
//! let bins = edges_from_observations(&groups).unwrap();
//!
//! let ee = ErgodicEnsemble::new(observations, bins, Units::Bits, None).unwrap();
//! assert!(ee.divergence() >= 0.0);
//! assert_eq!(ee.complexity(), ee.divergence().sqrt());
//! ```

pub use self::{
    bins::*, chi2::*, ensemble::*, entropy::*, measures::*, observations::*, series::*,
};

pub mod bins;
pub mod chi2;
pub mod ensemble;
pub mod entropy;
pub mod measures;
pub mod observations;
pub mod series;

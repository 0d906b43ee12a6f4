//! Display-facing tabular export for the ergodic core.
//!
//! Plotting and reporting live behind this seam: the core produces plain
//! numeric structures, this crate reshapes them into serializable rows,
//! and whatever renders them is somebody else's business. The core never
//! imports this crate.

use ergodic_core::{ErgodicEnsemble, ErgodicSeries};
use serde::{Deserialize, Serialize};

/// One raw observation in long format: its group label and its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRow {
    pub group: String,
    pub value: f64,
}

/// One pooled observation; a single-column table of the merged sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PooledRow {
    pub value: f64,
}

/// One series step: its x coordinate and every scalar measure, columns in
/// the canonical measure order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepRow {
    pub x: f64,
    pub ensemble: f64,
    pub ergodic: f64,
    pub divergence: f64,
    pub complexity: f64,
    pub tau2: f64,
    pub tau2p: f64,
}

/// Long-format `(group label, value)` rows for one snapshot, one row per
/// raw observation. Anonymous groups get positional labels.
#[must_use]
pub fn observation_rows(ensemble: &ErgodicEnsemble) -> Vec<ObservationRow> {
    let observations = ensemble.observations();
    let labels = observations.labels();
    labels
        .into_iter()
        .zip(observations.groups())
        .flat_map(|(group, values)| {
            values
                .iter()
                .map(move |&value| ObservationRow {
                    group: group.clone(),
                    value,
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// The pooled sample of one snapshot as a single-column table, in group
/// order.
#[must_use]
pub fn pooled_rows(ensemble: &ErgodicEnsemble) -> Vec<PooledRow> {
    ensemble
        .observations()
        .groups()
        .into_iter()
        .flatten()
        .map(|&value| PooledRow { value })
        .collect()
}

/// Row-per-step table for a series: `x` plus every scalar measure.
#[must_use]
pub fn series_rows(series: &ErgodicSeries) -> Vec<StepRow> {
    series
        .x()
        .iter()
        .zip(series.ensembles())
        .map(|(&x, step)| {
            let measures = step.measures();
            StepRow {
                x,
                ensemble: measures.ensemble,
                ergodic: measures.ergodic,
                divergence: measures.divergence,
                complexity: measures.complexity,
                tau2: measures.tau2,
                tau2p: measures.tau2p,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use ergodic_core::Units;

    use super::*;

    fn snapshot() -> ErgodicEnsemble {
        let observations = vec![
            ("UK".to_string(), vec![0.0, 0.0, 1.0, 0.0]),
            ("US".to_string(), vec![0.0, 1.0, 1.0]),
        ];
        ErgodicEnsemble::new(observations, vec![0.0, 1.0, 2.0], Units::Bits, None).unwrap()
    }

    fn series() -> ErgodicSeries {
        let observations = vec![
            vec![vec![0.5, 0.5], vec![0.5, 0.5]],
            vec![vec![0.5, 0.5], vec![1.5, 1.5]],
        ];
        ErgodicSeries::from_observations(None, observations, Units::Bits, None).unwrap()
    }

    #[test]
    fn observation_rows_are_one_per_raw_value() {
        let rows = observation_rows(&snapshot());
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0], ObservationRow { group: "UK".to_string(), value: 0.0 });
        assert_eq!(rows[6], ObservationRow { group: "US".to_string(), value: 1.0 });
        assert_eq!(rows.iter().filter(|row| row.group == "US").count(), 3);
    }

    #[test]
    fn anonymous_groups_get_positional_labels() {
        let ee = ErgodicEnsemble::new(
            vec![vec![0.5], vec![1.5]],
            vec![0.0, 1.0, 2.0],
            Units::Bits,
            None,
        )
        .unwrap();
        let rows = observation_rows(&ee);
        assert_eq!(rows[0].group, "0");
        assert_eq!(rows[1].group, "1");
    }

    #[test]
    fn pooled_rows_merge_every_group() {
        let rows = pooled_rows(&snapshot());
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0].value, 0.0);
        assert_eq!(rows[6].value, 1.0);
    }

    #[test]
    fn series_rows_carry_one_step_each() {
        let series = series();
        let rows = series_rows(&series);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].x, 0.0);
        assert_eq!(rows[1].x, 1.0);
        assert_eq!(rows[0].complexity, 0.0);
        assert_eq!(rows[1].complexity, series.measures().complexity[1]);
    }

    #[test]
    fn step_rows_serialize_with_canonical_columns() {
        let rows = series_rows(&series());
        let value = serde_json::to_value(&rows[1]).unwrap();
        let object = value.as_object().unwrap();
        for column in ["x", "ensemble", "ergodic", "divergence", "complexity", "tau2", "tau2p"] {
            assert!(object.contains_key(column), "missing column {column}");
        }
        assert_eq!(object.len(), 7);

        let back: StepRow = serde_json::from_value(value).unwrap();
        assert_eq!(back, rows[1]);
    }
}

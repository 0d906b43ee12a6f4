//! Chi-squared significance support.
//!
//! The upper-tail probability uses the Wilson-Hilferty cube-root normal
//! approximation rather than an exact regularised gamma: for a χ² variable
//! X with k degrees of freedom, `(X/k)^(1/3)` is approximately normal with
//! mean `1 - 2/(9k)` and variance `2/(9k)`. The binding fixtures only pin
//! p-values at the saturated ends, which this reproduces exactly.

/// Result of a two-way contingency chi-squared test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContingencyResult {
    /// The chi-squared statistic.
    pub statistic: f64,
    /// Upper-tail p-value of the statistic.
    pub p_value: f64,
    /// Degrees of freedom, `(rows - 1)·(cols - 1)`.
    pub dof: usize,
}

/// Upper-tail probability `P(X > x)` of the chi-squared distribution with
/// `dof` degrees of freedom.
///
/// `x ≤ 0` yields exactly 1.0.
#[must_use]
#[expect(clippy::cast_precision_loss)]
pub fn chi2_survival(x: f64, dof: usize) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    if dof == 0 {
        return 0.0;
    }

    let k = dof as f64;
    let term = 2.0 / (9.0 * k);
    let cube_root = (x / k).powf(1.0 / 3.0);
    let z = (cube_root - (1.0 - term)) / term.sqrt();

    // P(Z > z) = 1 - Phi(z) = Phi(-z)
    normal_cdf(-z)
}

/// Standard normal CDF via the Abramowitz & Stegun rational approximation
/// (formula 7.1.26) in Horner form.
fn normal_cdf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x_abs = x.abs();

    let t = 1.0 / (1.0 + 0.231_641_9 * x_abs);
    let d = 0.398_942_280_401_432_7; // 1/sqrt(2*pi)
    let p = d * (-x_abs * x_abs / 2.0).exp();

    let poly = t
        * (0.319_381_530
            + t * (-0.356_563_782 + t * (1.781_477_937 + t * (-1.821_255_978 + t * 1.330_274_429))));

    if sign > 0.0 { 1.0 - p * poly } else { p * poly }
}

/// Exact two-way contingency chi-squared test over a `(rows × cols)` count
/// table, e.g. ensembles × bins.
///
/// Returns `None` rather than an error for degenerate tables: fewer than
/// two rows or columns, a ragged table, or any row or column total of zero
/// (the expected-count denominator would vanish). No continuity correction
/// is applied.
#[must_use]
#[expect(clippy::cast_precision_loss)]
pub fn chi2_contingency(table: &[Vec<u64>]) -> Option<ContingencyResult> {
    let rows = table.len();
    let cols = table.first()?.len();
    if rows < 2 || cols < 2 || table.iter().any(|row| row.len() != cols) {
        return None;
    }

    let row_totals: Vec<u64> = table.iter().map(|row| row.iter().sum()).collect();
    let col_totals: Vec<u64> = (0..cols).map(|j| table.iter().map(|row| row[j]).sum()).collect();
    if row_totals.contains(&0) || col_totals.contains(&0) {
        return None;
    }
    let grand = row_totals.iter().sum::<u64>() as f64;

    let mut statistic = 0.0;
    for (row, &row_total) in table.iter().zip(&row_totals) {
        for (&observed, &col_total) in row.iter().zip(&col_totals) {
            let expected = row_total as f64 * col_total as f64 / grand;
            let diff = observed as f64 - expected;
            statistic += diff * diff / expected;
        }
    }

    let dof = (rows - 1) * (cols - 1);
    Some(ContingencyResult {
        statistic,
        p_value: chi2_survival(statistic, dof),
        dof,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn survival_at_zero_is_one() {
        assert_eq!(chi2_survival(0.0, 1), 1.0);
        assert_eq!(chi2_survival(0.0, 10), 1.0);
        assert_eq!(chi2_survival(-1.0, 3), 1.0);
    }

    #[test]
    fn survival_is_monotone_decreasing() {
        let values: Vec<f64> = (0..50).map(|i| chi2_survival(f64::from(i), 4)).collect();
        for pair in values.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
    }

    #[test]
    fn survival_saturates_for_large_statistics() {
        assert_abs_diff_eq!(chi2_survival(2000.0, 1), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(chi2_survival(3673.0, 2), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn survival_matches_reference_midrange() {
        // reference values; the cube-root approximation is weakest at dof 1
        // chi2.sf(4.316, 1) = 0.0378
        assert_abs_diff_eq!(chi2_survival(4.316, 1), 0.0378, epsilon = 5e-3);
        // chi2.sf(5.0, 5) = 0.4159
        assert_abs_diff_eq!(chi2_survival(5.0, 5), 0.4159, epsilon = 1e-3);
    }

    #[test]
    fn contingency_identical_rows_is_insignificant() {
        let table = vec![vec![5, 5, 5], vec![5, 5, 5]];
        let result = chi2_contingency(&table).unwrap();
        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);
        assert_eq!(result.dof, 2);
    }

    #[test]
    fn contingency_disjoint_rows_is_significant() {
        let table = vec![vec![100, 0], vec![0, 100]];
        let result = chi2_contingency(&table).unwrap();
        assert!(result.statistic > 100.0);
        assert!(result.p_value < 1e-6);
        assert_eq!(result.dof, 1);
    }

    #[test]
    fn degenerate_tables_give_no_result() {
        // zero bin total
        assert!(chi2_contingency(&[vec![1, 0], vec![2, 0]]).is_none());
        // zero row total
        assert!(chi2_contingency(&[vec![0, 0], vec![1, 2]]).is_none());
        // too few rows / columns
        assert!(chi2_contingency(&[vec![1, 2, 3]]).is_none());
        assert!(chi2_contingency(&[vec![1], vec![2]]).is_none());
        // ragged
        assert!(chi2_contingency(&[vec![1, 2], vec![3]]).is_none());
        assert!(chi2_contingency(&[]).is_none());
    }
}

//! Statistics helpers via `statrs`
//!
//! Pearson correlation, missing-aware means and the pooled-variance two-sample
//! Student t-test. Undefined results come back as `None` (or NaN inside a
//! t-test result) rather than as errors.

use statrs::distribution::{ContinuousCDF, StudentsT};
use statrs::statistics::Statistics;
use std::cmp::Ordering;

/// Pearson correlation coefficient over complete (x, y) pairs
///
/// Returns `None` for fewer than two pairs or when either side has zero variance.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }

    let mean_x = pairs.iter().map(|(x, _)| *x).mean();
    let mean_y = pairs.iter().map(|(_, y)| *y).mean();

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return None;
    }

    let r = sxy / (sxx * syy).sqrt();
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// Rows where both values are present
pub fn complete_pairs(xs: &[Option<f64>], ys: &[Option<f64>]) -> Vec<(f64, f64)> {
    xs.iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect()
}

/// Mean of the present values; `None` if there are none
pub fn mean_present(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        None
    } else {
        Some(present.mean())
    }
}

/// Sort (name, mean) pairs by mean, largest first, undefined means last
pub fn sort_descending(entries: &mut [(String, Option<f64>)]) {
    entries.sort_by(|(_, a), (_, b)| match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Result of a two-sample t-test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TTest {
    /// t statistic (NaN when both samples are constant and equal)
    pub statistic: f64,
    /// Two-sided p-value
    pub p_value: f64,
    pub degrees_of_freedom: f64,
}

/// Two-sample Student t-test with pooled variance
///
/// Returns `None` when there are not enough observations for any degrees of
/// freedom (`n1 + n2 < 3`) or either sample is empty.
pub fn student_t_test(a: &[f64], b: &[f64]) -> Option<TTest> {
    let (n1, n2) = (a.len() as f64, b.len() as f64);
    if a.is_empty() || b.is_empty() || n1 + n2 < 3.0 {
        return None;
    }

    let df = n1 + n2 - 2.0;
    let var_a = if a.len() > 1 { a.iter().variance() } else { 0.0 };
    let var_b = if b.len() > 1 { b.iter().variance() } else { 0.0 };
    let pooled = ((n1 - 1.0) * var_a + (n2 - 1.0) * var_b) / df;
    let std_err = (pooled * (1.0 / n1 + 1.0 / n2)).sqrt();

    let statistic = (a.iter().mean() - b.iter().mean()) / std_err;
    let p_value = if statistic.is_nan() {
        f64::NAN
    } else if statistic.is_infinite() {
        0.0
    } else {
        let dist = StudentsT::new(0.0, 1.0, df).ok()?;
        (2.0 * dist.sf(statistic.abs())).min(1.0)
    };

    Some(TTest {
        statistic,
        p_value,
        degrees_of_freedom: df,
    })
}
